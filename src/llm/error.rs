//! LLM error types

use thiserror::Error;

/// LLM error with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct LlmError {
    pub kind: LlmErrorKind,
    pub message: String,
}

impl LlmError {
    pub fn new(kind: LlmErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Timeout, message)
    }

    pub fn http(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Http, message)
    }

    pub fn missing_content(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::MissingContent, message)
    }

    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::InvalidBody, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Unknown, message)
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmErrorKind {
    /// Connection refused or reset
    Network,
    /// The backend did not answer within the deadline
    Timeout,
    /// Non-success HTTP status
    Http,
    /// Success status but no `choices[0].message.content` in the body
    MissingContent,
    /// Success status but the body is not JSON
    InvalidBody,
    Unknown,
}

impl LlmErrorKind {
    /// Transport-level failures: the backend was never reached or never answered
    pub fn is_unreachable(self) -> bool {
        matches!(self, Self::Network | Self::Timeout)
    }

    /// Failures that indicate a backend speaking the wrong protocol
    pub fn is_critical(self) -> bool {
        matches!(self, Self::MissingContent | Self::InvalidBody)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Http => "http",
            Self::MissingContent => "missing_content",
            Self::InvalidBody => "invalid_body",
            Self::Unknown => "unknown",
        }
    }
}
