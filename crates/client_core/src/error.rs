use thiserror::Error;

pub const VALIDATION_MESSAGE: &str = "Please enter a review text";
pub const ANALYZE_FALLBACK_MESSAGE: &str = "Failed to analyze review";
pub const HISTORY_FALLBACK_MESSAGE: &str = "Failed to fetch reviews";

/// The request never produced an HTTP response (DNS, refused connection, broken body stream).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        Self::new(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Please enter a review text")]
    Validation,
    #[error("a review submission is already in flight")]
    AlreadySubmitting,
    #[error("{0}")]
    Transport(String),
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("failed to encode request body: {0}")]
    Encode(String),
    #[error("malformed response body: {0}")]
    Decode(String),
    #[error("history response superseded by a newer request")]
    Superseded,
}

impl ClientError {
    /// Text shown to the user after a failed submission. Decode details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::Encode(_) | Self::Decode(_) => ANALYZE_FALLBACK_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<TransportError> for ClientError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value.message)
    }
}
