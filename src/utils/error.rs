use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreemapError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Source error: {message}")]
    SourceError { message: String },

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Source,
    Processing,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TreemapError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TreemapError::ConfigError { .. }
            | TreemapError::MissingConfigError { .. }
            | TreemapError::InvalidConfigValueError { .. }
            | TreemapError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            TreemapError::HttpError(_) | TreemapError::SourceError { .. } => {
                ErrorCategory::Source
            }
            TreemapError::CsvError(_)
            | TreemapError::SerializationError(_)
            | TreemapError::ProcessingError { .. } => ErrorCategory::Processing,
            TreemapError::IoError(_) | TreemapError::RenderError { .. } => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路錯誤通常可以重試
            TreemapError::HttpError(_) => ErrorSeverity::Medium,
            TreemapError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the command line flags or the TOML file against the documented keys"
                    .to_string()
            }
            ErrorCategory::Source => {
                "Verify the input path or endpoint is reachable and returns a JSON array or CSV"
                    .to_string()
            }
            ErrorCategory::Processing => {
                "Inspect the input data for malformed rows or unexpected JSON shapes".to_string()
            }
            ErrorCategory::Output => {
                "Make sure the output directory exists and is writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TreemapError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            TreemapError::MissingConfigError { field } => {
                format!("Setting '{}' is required but was not provided", field)
            }
            TreemapError::HttpError(e) => format!("Could not fetch fund data: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TreemapError>;
