//! Core domain types and logic.

pub mod transaction;
pub mod date_range;
pub mod aggregate;
pub mod report;
pub mod config_validation;
pub mod error;
