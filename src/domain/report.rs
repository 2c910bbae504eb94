//! Forecast report assembly.
//!
//! Pulls transactions through a [`TransactionPort`], aggregates them per day
//! and fills the template context the report templates expect: `REPORTNAME`,
//! `TODAY`, `GRAND`, `HTMLSCALE` and the `CONTENTS` loop of
//! `DATE`/`WITHDRAWAL`/`DEPOSIT` rows.

use crate::domain::aggregate::{aggregate_by_day, DailyFlow};
use crate::domain::date_range::DateRange;
use crate::domain::error::ForecastError;
use crate::domain::transaction::Transaction;
use crate::ports::transaction_port::TransactionPort;
use crate::template::{Context, Row};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

pub const DEFAULT_TITLE: &str = "Forecast";
pub const DEFAULT_HTML_SCALE: i64 = 100;

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    /// Body font-size percentage.
    pub html_scale: i64,
    pub range: DateRange,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            html_scale: DEFAULT_HTML_SCALE,
            range: DateRange::default(),
        }
    }
}

/// Ranged fetch when both bounds are set, full scan otherwise.
pub fn fetch_transactions(
    port: &dyn TransactionPort,
    range: &DateRange,
) -> Result<Vec<Transaction>, ForecastError> {
    match (range.start, range.end) {
        (Some(start), Some(end)) => port.fetch_range(start, end),
        _ => port.fetch_all(),
    }
}

/// Fill the template context for a set of daily flows.
pub fn build_context(
    flows: &BTreeMap<NaiveDate, DailyFlow>,
    options: &ReportOptions,
    generated_at: NaiveDateTime,
) -> Context {
    let mut contents = Vec::with_capacity(flows.len());
    for (date, flow) in flows {
        let mut row = Row::new();
        row.set("DATE", date.format("%Y-%m-%d").to_string());
        row.set("WITHDRAWAL", format!("{:.2}", flow.withdrawal));
        row.set("DEPOSIT", format!("{:.2}", flow.deposit));
        contents.push(row);
    }

    let mut ctx = Context::new();
    ctx.set_text("REPORTNAME", options.title.clone());
    ctx.set_text(
        "TODAY",
        generated_at
            .format("Report Generated %Y-%m-%d %H:%M:%S")
            .to_string(),
    );
    ctx.set_text("GRAND", flows.len().to_string());
    ctx.set_text("HTMLSCALE", options.html_scale.to_string());
    ctx.set_loop("CONTENTS", contents);
    ctx
}

/// Full pipeline: fetch, aggregate, render.
pub fn generate(
    port: &dyn TransactionPort,
    options: &ReportOptions,
    template: &str,
) -> Result<String, ForecastError> {
    let transactions = fetch_transactions(port, &options.range)?;
    let flows = aggregate_by_day(&transactions);
    let ctx = build_context(&flows, options, chrono::Local::now().naive_local());
    crate::template::render(template, &ctx).map_err(ForecastError::from)
}

/// Report body for an embedding viewer: template syntax errors become the
/// report text, anything else a generic failure message.
pub fn html_text(port: &dyn TransactionPort, options: &ReportOptions, template: &str) -> String {
    match generate(port, options, template) {
        Ok(html) => html,
        Err(ForecastError::TemplateSyntax(e)) => e.to_string(),
        Err(e) => format!("report generation failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::{TransStatus, TransType};
    use chrono::NaiveDate;

    struct FixedPort {
        transactions: Vec<Transaction>,
        fail: bool,
    }

    impl TransactionPort for FixedPort {
        fn fetch_range(
            &self,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<Transaction>, ForecastError> {
            if self.fail {
                return Err(ForecastError::Database {
                    reason: "down".into(),
                });
            }
            Ok(self
                .transactions
                .iter()
                .filter(|t| t.date >= start && t.date <= end)
                .cloned()
                .collect())
        }

        fn fetch_all(&self) -> Result<Vec<Transaction>, ForecastError> {
            if self.fail {
                return Err(ForecastError::Database {
                    reason: "down".into(),
                });
            }
            Ok(self.transactions.clone())
        }

        fn date_span(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ForecastError> {
            Ok(None)
        }
    }

    fn txn(date: &str, txn_type: TransType, amount: f64) -> Transaction {
        Transaction {
            id: 0,
            account_id: 1,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            txn_type,
            amount,
            status: TransStatus::Unreconciled,
            payee: String::new(),
        }
    }

    fn sample_port() -> FixedPort {
        FixedPort {
            transactions: vec![
                txn("2024-01-02", TransType::Withdrawal, 40.0),
                txn("2024-01-02", TransType::Deposit, 100.0),
                txn("2024-01-05", TransType::Withdrawal, 9.5),
                txn("2024-02-01", TransType::Deposit, 1.0),
            ],
            fail: false,
        }
    }

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap()
    }

    #[test]
    fn context_carries_all_keys() {
        let port = sample_port();
        let flows = aggregate_by_day(&port.transactions);
        let options = ReportOptions::default();
        let ctx = build_context(&flows, &options, stamp());

        let tpl = "<TMPL_VAR REPORTNAME>|<TMPL_VAR TODAY>|<TMPL_VAR GRAND>|<TMPL_VAR HTMLSCALE>";
        let out = crate::template::render(tpl, &ctx).unwrap();
        assert_eq!(out, "Forecast|Report Generated 2024-03-01 12:30:00|3|100");
    }

    #[test]
    fn contents_rows_are_formatted() {
        let port = sample_port();
        let flows = aggregate_by_day(&port.transactions);
        let ctx = build_context(&flows, &ReportOptions::default(), stamp());

        let tpl = "<TMPL_LOOP NAME=CONTENTS><TMPL_VAR DATE>=<TMPL_VAR WITHDRAWAL>/<TMPL_VAR DEPOSIT>;</TMPL_LOOP>";
        let out = crate::template::render(tpl, &ctx).unwrap();
        assert_eq!(
            out,
            "2024-01-02=40.00/100.00;2024-01-05=9.50/0.00;2024-02-01=0.00/1.00;"
        );
    }

    #[test]
    fn bounded_range_uses_ranged_fetch() {
        let port = sample_port();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveDate::from_ymd_opt(2024, 1, 31),
        );
        let fetched = fetch_transactions(&port, &range).unwrap();
        assert_eq!(fetched.len(), 3);
    }

    #[test]
    fn unbounded_range_fetches_all() {
        let port = sample_port();
        let fetched = fetch_transactions(&port, &DateRange::default()).unwrap();
        assert_eq!(fetched.len(), 4);
    }

    #[test]
    fn half_bounded_range_fetches_all() {
        let port = sample_port();
        let range = DateRange::new(NaiveDate::from_ymd_opt(2024, 1, 3), None);
        let fetched = fetch_transactions(&port, &range).unwrap();
        assert_eq!(fetched.len(), 4);
    }

    #[test]
    fn generate_renders_template() {
        let port = sample_port();
        let out = generate(&port, &ReportOptions::default(), "<TMPL_VAR GRAND> days").unwrap();
        assert_eq!(out, "3 days");
    }

    #[test]
    fn html_text_returns_syntax_error_message() {
        let port = sample_port();
        let out = html_text(&port, &ReportOptions::default(), "<TMPL_LOOP NAME=X>oops");
        assert!(out.contains("template syntax error"));
        assert!(out.contains("unclosed"));
    }

    #[test]
    fn html_text_returns_generic_message_on_fetch_failure() {
        let port = FixedPort {
            transactions: vec![],
            fail: true,
        };
        let out = html_text(&port, &ReportOptions::default(), "<TMPL_VAR GRAND>");
        assert!(out.starts_with("report generation failed"));
    }
}
