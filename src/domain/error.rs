//! Domain error types.

/// A template syntax error with position information.
#[derive(Debug, Clone, thiserror::Error)]
#[error("template syntax error at position {position}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub position: usize,
}

impl SyntaxError {
    /// Format the error with the offending line and a caret under the error
    /// position.
    pub fn display_with_context(&self, input: &str) -> String {
        let position = self.position.min(input.len());
        let line_start = input[..position].rfind('\n').map_or(0, |i| i + 1);
        let line_end = input[line_start..]
            .find('\n')
            .map_or(input.len(), |i| line_start + i);
        let line = &input[line_start..line_end];
        let column = input[line_start..position].chars().count();
        let caret = " ".repeat(column) + "^";
        format!("{line}\n{caret}\n{err}", err = self)
    }
}

/// Top-level error type for finforecast.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    TemplateSyntax(#[from] SyntaxError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ForecastError> for std::process::ExitCode {
    fn from(err: &ForecastError) -> Self {
        let code: u8 = match err {
            ForecastError::Io(_) => 1,
            ForecastError::ConfigParse { .. }
            | ForecastError::ConfigMissing { .. }
            | ForecastError::ConfigInvalid { .. } => 2,
            ForecastError::Database { .. } | ForecastError::DatabaseQuery { .. } => 3,
            ForecastError::TemplateSyntax(_) => 4,
        };
        std::process::ExitCode::from(code)
    }
}
