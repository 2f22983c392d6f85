use thiserror::Error;

/// Errors raised while capturing form data
#[derive(Debug, Error)]
pub enum CaptureError {
    /// A mapping names an attribute kind the extractor does not know
    #[error("Unexpected attribute: {0}")]
    UnexpectedAttribute(String),

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Failed to read element: {0}")]
    ElementRead(String),

    #[error("Failed to attach change listener: {0}")]
    ListenerFailed(String),

    #[error("Failed to load mappings: {0}")]
    MappingLoad(String),

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Script evaluation failed: {0}")]
    ScriptFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CaptureError {
    /// Whether this error comes from a malformed mapping rather than the page
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, CaptureError::UnexpectedAttribute(_))
    }
}

pub type Result<T> = std::result::Result<T, CaptureError>;
