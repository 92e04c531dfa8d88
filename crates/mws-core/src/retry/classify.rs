//! Map decoded faults onto the three error classes.

use std::fmt;

use crate::fault::{FaultCode, FaultRecord};

/// Outcome of classifying a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Provider-side throttling or a transient server failure; resend after backoff.
    Retryable,
    /// The request itself is wrong or unauthorized; resending cannot help.
    Fatal,
    /// Code outside the documented set. The controller aborts on it.
    Unknown,
}

impl ErrorClass {
    pub fn is_retryable(self) -> bool {
        self == ErrorClass::Retryable
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorClass::Retryable => write!(f, "retryable"),
            ErrorClass::Fatal => write!(f, "fatal"),
            ErrorClass::Unknown => write!(f, "unknown"),
        }
    }
}

/// Class of a single fault code.
pub fn classify_code(code: &FaultCode) -> ErrorClass {
    match code {
        FaultCode::InternalError | FaultCode::QuotaExceeded | FaultCode::RequestThrottled => {
            ErrorClass::Retryable
        }
        FaultCode::InputStreamDisconnected
        | FaultCode::InvalidParameterValue
        | FaultCode::AccessDenied
        | FaultCode::InvalidAccessKeyId
        | FaultCode::SignatureDoesNotMatch
        | FaultCode::InvalidAddress => ErrorClass::Fatal,
        FaultCode::Other(_) => ErrorClass::Unknown,
    }
}

/// Classify a fault record by its first fault. A record with no faults is Unknown.
pub fn classify(fault: &FaultRecord) -> ErrorClass {
    fault
        .first()
        .map_or(ErrorClass::Unknown, |f| classify_code(&f.code))
}
