//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report::{default_template, HtmlReportAdapter};
use crate::domain::aggregate::aggregate_by_day;
use crate::domain::config_validation::validate_report_config;
use crate::domain::date_range::DateRange;
use crate::domain::error::ForecastError;
use crate::domain::report::{self, ReportOptions};
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;
use crate::ports::transaction_port::TransactionPort;

#[derive(Parser, Debug)]
#[command(name = "finforecast", about = "Daily cash-flow forecast reports")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the forecast report
    Report {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
        #[arg(long)]
        title: Option<String>,
    },
    /// Import transactions from a CSV ledger into the database
    Import {
        #[arg(short, long)]
        config: PathBuf,
        file: PathBuf,
    },
    /// Show the stored date span and transaction count
    Info {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate configuration and any custom template
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Report {
            config,
            output,
            start_date,
            end_date,
            title,
        } => run_report(
            &config,
            output.as_ref(),
            start_date.as_deref(),
            end_date.as_deref(),
            title.as_deref(),
        ),
        Command::Import { config, file } => run_import(&config, &file),
        Command::Info { config } => run_info(&config),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = ForecastError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn run_report(
    config_path: &PathBuf,
    output_path: Option<&PathBuf>,
    start_override: Option<&str>,
    end_override: Option<&str>,
    title_override: Option<&str>,
) -> ExitCode {
    // Stage 1: Load config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Validate report config
    if let Err(e) = validate_report_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 3: Build report options, CLI overrides win over config
    let mut options = match build_report_options(&adapter) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if let Some(title) = title_override {
        options.title = title.to_string();
    }
    if start_override.is_some() || end_override.is_some() {
        if start_override.is_none() || end_override.is_none() {
            eprintln!("error: --start-date and --end-date must be given together");
            return ExitCode::from(2);
        }
        let start = match parse_cli_date(start_override, "--start-date") {
            Ok(d) => d,
            Err(code) => return code,
        };
        let end = match parse_cli_date(end_override, "--end-date") {
            Ok(d) => d,
            Err(code) => return code,
        };
        options.range = DateRange::new(start, end);
    }

    // Stage 4: Resolve template
    let template_path = adapter.get_string("report", "template_path");
    let template_content: String;
    let template: &str = match template_path {
        Some(ref path) => {
            template_content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    eprintln!("error: failed to read template {}: {}", path, e);
                    return ExitCode::from(1);
                }
            };
            &template_content
        }
        None => default_template::template(),
    };

    let output = output_path
        .cloned()
        .unwrap_or_else(|| PathBuf::from("forecast.html"));

    // Stages 5-7: Transaction store dependent pipeline
    if let Some(csv_path) = adapter.get_string("csv", "path") {
        let port = CsvAdapter::new(PathBuf::from(csv_path));
        return run_report_pipeline(&port, &options, template, &output);
    }

    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::sqlite_adapter::SqliteAdapter;

        let port = match SqliteAdapter::from_config(&adapter) {
            Ok(a) => a,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        run_report_pipeline(&port, &options, template, &output)
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = (&options, template, &output);
        eprintln!("error: sqlite feature is required when no csv path is configured");
        ExitCode::from(1)
    }
}

pub fn run_report_pipeline(
    port: &dyn TransactionPort,
    options: &ReportOptions,
    template: &str,
    output: &PathBuf,
) -> ExitCode {
    // Stage 5: Fetch and aggregate
    let transactions = match report::fetch_transactions(port, &options.range) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let flows = aggregate_by_day(&transactions);

    eprintln!(
        "Aggregated {} transactions into {} days",
        transactions.len(),
        flows.len()
    );

    // Stage 6: Render
    let report_adapter = HtmlReportAdapter::with_template(template.to_string());
    let html = match report_adapter.render(&flows, options) {
        Ok(html) => html,
        Err(ForecastError::TemplateSyntax(e)) => {
            eprintln!("error: {}", e.display_with_context(template));
            return (&ForecastError::TemplateSyntax(e)).into();
        }
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 7: Write
    let output_str = output.display().to_string();
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("error: failed to create {}: {}", parent.display(), e);
                return ExitCode::from(1);
            }
        }
    }
    match fs::write(output, &html) {
        Ok(()) => {
            eprintln!("Report written to: {}", output_str);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write report: {e}");
            ExitCode::from(1)
        }
    }
}

pub fn build_report_options(adapter: &dyn ConfigPort) -> Result<ReportOptions, ForecastError> {
    let title = adapter
        .get_string("report", "title")
        .unwrap_or_else(|| report::DEFAULT_TITLE.to_string());
    let html_scale = adapter.get_int("report", "html_font_size", report::DEFAULT_HTML_SCALE);

    let start = parse_config_date(adapter, "start_date")?;
    let end = parse_config_date(adapter, "end_date")?;

    Ok(ReportOptions {
        title,
        html_scale,
        range: DateRange::new(start, end),
    })
}

fn parse_config_date(
    adapter: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, ForecastError> {
    match adapter.get_string("range", key) {
        Some(value) => NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ForecastError::ConfigInvalid {
                section: "range".into(),
                key: key.into(),
                reason: "invalid date format (expected YYYY-MM-DD)".into(),
            }),
        None => Ok(None),
    }
}

fn parse_cli_date(value: Option<&str>, flag: &str) -> Result<Option<NaiveDate>, ExitCode> {
    match value {
        Some(s) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(d) => Ok(Some(d)),
            Err(_) => {
                eprintln!("error: {} expects YYYY-MM-DD, got {}", flag, s);
                Err(ExitCode::from(2))
            }
        },
        None => Ok(None),
    }
}

fn run_import(config_path: &PathBuf, file: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::sqlite_adapter::SqliteAdapter;

        let source = CsvAdapter::new(file.clone());
        let transactions = match source.fetch_all() {
            Ok(t) => t,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        let adapter = match SqliteAdapter::from_config(&config) {
            Ok(a) => a,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

        if let Err(e) = adapter.initialize_schema() {
            eprintln!("error: {e}");
            return (&e).into();
        }
        if let Err(e) = adapter.insert_transactions(&transactions) {
            eprintln!("error: {e}");
            return (&e).into();
        }

        eprintln!(
            "Imported {} transactions from {}",
            transactions.len(),
            file.display()
        );
        ExitCode::SUCCESS
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = (config, file);
        eprintln!("error: sqlite feature is required for import");
        ExitCode::from(1)
    }
}

fn run_info(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let span = if let Some(csv_path) = config.get_string("csv", "path") {
        CsvAdapter::new(PathBuf::from(csv_path)).date_span()
    } else {
        #[cfg(feature = "sqlite")]
        {
            use crate::adapters::sqlite_adapter::SqliteAdapter;

            match SqliteAdapter::from_config(&config) {
                Ok(a) => a.date_span(),
                Err(e) => {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
            }
        }

        #[cfg(not(feature = "sqlite"))]
        {
            eprintln!("error: sqlite feature is required when no csv path is configured");
            return ExitCode::from(1);
        }
    };

    match span {
        Ok(Some((min_date, max_date, count))) => {
            println!("{} transactions, {} to {}", count, min_date, max_date);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("no transactions found");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match validate_report_config(&adapter) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    if let Some(path) = adapter.get_string("report", "template_path") {
        eprintln!("Checking template: {}", path);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("error: failed to read template {}: {}", path, e);
                return ExitCode::from(1);
            }
        };
        if let Err(e) = crate::template::parse(&content) {
            eprintln!("  error: {}", e.display_with_context(&content));
            return (&ForecastError::from(e)).into();
        }
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
