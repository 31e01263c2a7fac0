use thiserror::Error;

/// worklens error types
#[derive(Error, Debug)]
pub enum WorklensError {
    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Report extraction failed
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Failures of a single report extraction call.
///
/// Every variant except `Configuration` can be fixed by resubmitting,
/// usually with shorter input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// No API credential available
    #[error("API key not found; set GEMINI_API_KEY (or API_KEY) or add api_key to the config file")]
    Configuration,

    /// The service answered without any usable text
    #[error("the AI service returned empty content")]
    EmptyResponse,

    /// The reply JSON ends mid-string or mid-object
    #[error("the AI reply was cut off because the input is too large; try submitting fewer days at a time")]
    TruncatedResponse,

    /// Any other JSON or shape failure
    #[error("the AI reply is not valid report JSON: {0}")]
    MalformedResponse(String),

    /// Valid reply, but it contained no day records
    #[error("no daily report could be recognized in the input")]
    NoResults,

    /// Transport failure or non-success HTTP status
    #[error("request to the AI service failed: {0}")]
    Request(String),
}

impl ExtractError {
    /// Whether the user can recover by resubmitting
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Configuration)
    }
}

/// Result type alias for worklens
pub type Result<T> = std::result::Result<T, WorklensError>;
