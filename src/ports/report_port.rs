//! Report generation port trait.

use crate::domain::aggregate::DailyFlow;
use crate::domain::error::ForecastError;
use crate::domain::report::ReportOptions;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Port for rendering forecast reports.
pub trait ReportPort {
    fn render(
        &self,
        flows: &BTreeMap<NaiveDate, DailyFlow>,
        options: &ReportOptions,
    ) -> Result<String, ForecastError>;

    /// Default implementation: render, create parent directories, write the file.
    fn write(
        &self,
        flows: &BTreeMap<NaiveDate, DailyFlow>,
        options: &ReportOptions,
        output_path: &str,
    ) -> Result<(), ForecastError> {
        let html = self.render(flows, options)?;
        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, html)?;
        Ok(())
    }
}
