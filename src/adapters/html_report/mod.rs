//! HTML report adapter implementing ReportPort.
//!
//! Renders the forecast page through the tag template engine. The built-in
//! template carries an inline chart script; a custom template string can be
//! supplied instead, typically loaded from `template_path` in config.

pub mod default_template;

use crate::domain::aggregate::DailyFlow;
use crate::domain::error::ForecastError;
use crate::domain::report::{build_context, ReportOptions};
use crate::ports::report_port::ReportPort;
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub struct HtmlReportAdapter {
    template: Option<String>,
}

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self { template: None }
    }

    pub fn with_template(template: String) -> Self {
        Self {
            template: Some(template),
        }
    }

    fn template(&self) -> &str {
        self.template
            .as_deref()
            .unwrap_or_else(|| default_template::template())
    }
}

impl Default for HtmlReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for HtmlReportAdapter {
    fn render(
        &self,
        flows: &BTreeMap<NaiveDate, DailyFlow>,
        options: &ReportOptions,
    ) -> Result<String, ForecastError> {
        let ctx = build_context(flows, options, chrono::Local::now().naive_local());
        crate::template::render(self.template(), &ctx).map_err(ForecastError::from)
    }
}
