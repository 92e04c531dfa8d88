//! Decoded remote faults.
//!
//! The provider answers a rejected request with an `<ErrorResponse>` document
//! carrying one or more `<Error>` elements and a request id. Codes are mapped
//! onto the closed [`FaultCode`] enumeration so classification is a total match.

mod parse;

use std::fmt;

pub use parse::{decode_fault, is_fault};

/// Error codes documented for the Products and Reports sections.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FaultCode {
    InputStreamDisconnected,
    InvalidParameterValue,
    AccessDenied,
    InvalidAccessKeyId,
    SignatureDoesNotMatch,
    InvalidAddress,
    InternalError,
    QuotaExceeded,
    RequestThrottled,
    /// Any code outside the documented set, kept verbatim.
    Other(String),
}

impl FaultCode {
    /// All documented codes.
    pub const KNOWN: [FaultCode; 9] = [
        FaultCode::InputStreamDisconnected,
        FaultCode::InvalidParameterValue,
        FaultCode::AccessDenied,
        FaultCode::InvalidAccessKeyId,
        FaultCode::SignatureDoesNotMatch,
        FaultCode::InvalidAddress,
        FaultCode::InternalError,
        FaultCode::QuotaExceeded,
        FaultCode::RequestThrottled,
    ];

    pub fn parse(code: &str) -> Self {
        match code.trim() {
            "InputStreamDisconnected" => FaultCode::InputStreamDisconnected,
            "InvalidParameterValue" => FaultCode::InvalidParameterValue,
            "AccessDenied" => FaultCode::AccessDenied,
            "InvalidAccessKeyId" => FaultCode::InvalidAccessKeyId,
            "SignatureDoesNotMatch" => FaultCode::SignatureDoesNotMatch,
            "InvalidAddress" => FaultCode::InvalidAddress,
            "InternalError" => FaultCode::InternalError,
            "QuotaExceeded" => FaultCode::QuotaExceeded,
            "RequestThrottled" => FaultCode::RequestThrottled,
            other => FaultCode::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FaultCode::InputStreamDisconnected => "InputStreamDisconnected",
            FaultCode::InvalidParameterValue => "InvalidParameterValue",
            FaultCode::AccessDenied => "AccessDenied",
            FaultCode::InvalidAccessKeyId => "InvalidAccessKeyId",
            FaultCode::SignatureDoesNotMatch => "SignatureDoesNotMatch",
            FaultCode::InvalidAddress => "InvalidAddress",
            FaultCode::InternalError => "InternalError",
            FaultCode::QuotaExceeded => "QuotaExceeded",
            FaultCode::RequestThrottled => "RequestThrottled",
            FaultCode::Other(code) => code,
        }
    }

    /// HTTP status the provider documents for this code.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            FaultCode::InputStreamDisconnected | FaultCode::InvalidParameterValue => Some(400),
            FaultCode::AccessDenied => Some(401),
            FaultCode::InvalidAccessKeyId | FaultCode::SignatureDoesNotMatch => Some(403),
            FaultCode::InvalidAddress => Some(404),
            FaultCode::InternalError => Some(500),
            FaultCode::QuotaExceeded | FaultCode::RequestThrottled => Some(503),
            FaultCode::Other(_) => None,
        }
    }
}

impl fmt::Display for FaultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `<Error>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    /// `Sender` or `Server`.
    pub kind: String,
    pub code: FaultCode,
    pub message: String,
    pub detail: Option<String>,
    /// Item the error refers to, when the provider names one.
    pub sku: Option<String>,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(sku) = &self.sku {
            write!(f, " (SKU {})", sku)?;
        }
        Ok(())
    }
}

/// A whole fault response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultRecord {
    pub faults: Vec<Fault>,
    pub request_id: Option<String>,
}

impl FaultRecord {
    /// The fault classification and retry decisions act on.
    pub fn first(&self) -> Option<&Fault> {
        self.faults.first()
    }
}

impl fmt::Display for FaultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.faults.is_empty() {
            write!(f, "empty fault")?;
        }
        for (i, fault) in self.faults.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", fault)?;
        }
        if let Some(id) = &self.request_id {
            write!(f, " [request {}]", id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrips_every_known_code() {
        for code in FaultCode::KNOWN.iter() {
            assert_eq!(&FaultCode::parse(code.as_str()), code);
            assert!(code.http_status().is_some());
        }
    }

    #[test]
    fn unknown_code_is_kept_verbatim() {
        let code = FaultCode::parse("RequestExpired");
        assert_eq!(code, FaultCode::Other("RequestExpired".into()));
        assert_eq!(code.to_string(), "RequestExpired");
        assert_eq!(code.http_status(), None);
    }

    #[test]
    fn record_display_lists_faults_and_request_id() {
        let record = FaultRecord {
            faults: vec![Fault {
                kind: "Sender".into(),
                code: FaultCode::AccessDenied,
                message: "Access denied".into(),
                detail: None,
                sku: None,
            }],
            request_id: Some("req-1".into()),
        };
        assert_eq!(record.to_string(), "AccessDenied: Access denied [request req-1]");
    }
}
