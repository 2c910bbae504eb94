pub mod file_config_adapter;
pub mod csv_adapter;
pub mod html_report;

#[cfg(feature = "sqlite")]
pub mod sqlite_adapter;
