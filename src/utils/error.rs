use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Markup parsing error: {message}")]
    ParseError { message: String },

    #[error("Store request failed with status {status}: {message}")]
    StoreError { status: u16, message: String },

    #[error("Notification failed: {message}")]
    NotificationError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl TrackerError {
    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            TrackerError::Http(_) => "Could not reach a remote service".to_string(),
            TrackerError::StoreError { status, .. } => {
                format!("The seats database rejected the request (HTTP {})", status)
            }
            TrackerError::NotificationError { .. } => {
                "The failure alert could not be delivered".to_string()
            }
            TrackerError::ConfigError { .. }
            | TrackerError::ConfigValidationError { .. }
            | TrackerError::MissingConfigError { .. }
            | TrackerError::InvalidConfigValueError { .. } => {
                format!("Configuration problem: {}", self)
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TrackerError::Http(_) => "Check network connectivity and the configured URLs",
            TrackerError::StoreError { .. } => {
                "Verify SUPABASE_URL, SUPABASE_KEY and the table's row-level security policies"
            }
            TrackerError::NotificationError { .. } => {
                "Verify HANDLER_EMAIL, HANDLER_PASSWORD, DEST_EMAIL and the SMTP relay settings"
            }
            TrackerError::MissingConfigError { .. } => {
                "Set the missing environment variable or add it to the config file"
            }
            TrackerError::ConfigError { .. }
            | TrackerError::ConfigValidationError { .. }
            | TrackerError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again"
            }
            TrackerError::ParseError { .. } => "The catalog markup may have changed",
            TrackerError::IoError(_) | TrackerError::SerializationError(_) => {
                "Run again with SEAT_TRACKER_VERBOSE=1 for details"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
