//! Per-item result status attribute.

use std::fmt;

/// The `status` attribute on a per-item result element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultStatus {
    Success,
    /// Offers exist but are not yet available; see the summary's available time.
    ActiveButTooSoonForProcessing,
    ClientError,
    ServiceError,
    Other(String),
}

impl ResultStatus {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "Success" => ResultStatus::Success,
            "ActiveButTooSoonForProcessing" => ResultStatus::ActiveButTooSoonForProcessing,
            "ClientError" => ResultStatus::ClientError,
            "ServiceError" => ResultStatus::ServiceError,
            other => ResultStatus::Other(other.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        *self == ResultStatus::Success
    }

    pub fn is_too_soon(&self) -> bool {
        *self == ResultStatus::ActiveButTooSoonForProcessing
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultStatus::Success => write!(f, "Success"),
            ResultStatus::ActiveButTooSoonForProcessing => write!(f, "ActiveButTooSoonForProcessing"),
            ResultStatus::ClientError => write!(f, "ClientError"),
            ResultStatus::ServiceError => write!(f, "ServiceError"),
            ResultStatus::Other(s) => write!(f, "{}", s),
        }
    }
}
