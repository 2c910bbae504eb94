//! Configuration validation.
//!
//! Checks all report config fields before any data is touched.

use crate::domain::error::ForecastError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_report_config(config: &dyn ConfigPort) -> Result<(), ForecastError> {
    validate_title(config)?;
    validate_html_font_size(config)?;
    validate_range(config)?;
    Ok(())
}

fn validate_title(config: &dyn ConfigPort) -> Result<(), ForecastError> {
    if let Some(title) = config.get_string("report", "title") {
        if title.trim().is_empty() {
            return Err(ForecastError::ConfigInvalid {
                section: "report".to_string(),
                key: "title".to_string(),
                reason: "title must not be empty".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_html_font_size(config: &dyn ConfigPort) -> Result<(), ForecastError> {
    let value = config.get_int("report", "html_font_size", 100);
    if !(10..=400).contains(&value) {
        return Err(ForecastError::ConfigInvalid {
            section: "report".to_string(),
            key: "html_font_size".to_string(),
            reason: "html_font_size must be between 10 and 400".to_string(),
        });
    }
    Ok(())
}

fn validate_range(config: &dyn ConfigPort) -> Result<(), ForecastError> {
    let start_str = config.get_string("range", "start_date");
    let end_str = config.get_string("range", "end_date");

    let start = match start_str.as_deref() {
        Some(s) => Some(parse_date(s, "start_date")?),
        None => None,
    };
    let end = match end_str.as_deref() {
        Some(s) => Some(parse_date(s, "end_date")?),
        None => None,
    };

    match (start, end) {
        (Some(start), Some(end)) => {
            if start > end {
                return Err(ForecastError::ConfigInvalid {
                    section: "range".to_string(),
                    key: "start_date".to_string(),
                    reason: "start_date must not be after end_date".to_string(),
                });
            }
        }
        (Some(_), None) => {
            return Err(ForecastError::ConfigMissing {
                section: "range".to_string(),
                key: "end_date".to_string(),
            });
        }
        (None, Some(_)) => {
            return Err(ForecastError::ConfigMissing {
                section: "range".to_string(),
                key: "start_date".to_string(),
            });
        }
        (None, None) => {}
    }
    Ok(())
}

fn parse_date(value: &str, key: &str) -> Result<NaiveDate, ForecastError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ForecastError::ConfigInvalid {
        section: "range".to_string(),
        key: key.to_string(),
        reason: "invalid date format (expected YYYY-MM-DD)".to_string(),
    })
}
