//! Error taxonomy shared by the batcher, limiter, controller and transport.
//!
//! Only a fault classified as retryable is handled inside the controller;
//! everything else in here reaches the caller unchanged.

use std::time::Duration;

use thiserror::Error;

use crate::fault::FaultRecord;
use crate::retry::ErrorClass;

/// Top-level error returned by a call.
#[derive(Debug, Error)]
pub enum MwsError {
    /// Network or IO failure while fetching. Never classified, never retried.
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
    /// Payload could not be decoded (fault or result shape). Not retried.
    #[error("decode: {0}")]
    Decode(#[from] DecodeError),
    /// The call was aborted: fatal/unknown fault, exhausted retries or cancellation.
    #[error(transparent)]
    Terminal(#[from] TerminalError),
    /// Bad batch size or operation definition. Surfaced before anything is sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The blocking task running a call panicked or was dropped.
    #[error("call task failed: {0}")]
    TaskFailed(String),
    /// Local file IO (report download).
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl MwsError {
    /// The remote fault behind this error, if the call ended on one.
    pub fn fault(&self) -> Option<&FaultRecord> {
        match self {
            MwsError::Terminal(t) => t.fault(),
            _ => None,
        }
    }
}

/// Failure of the signed fetch itself.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    Endpoint { endpoint: String, reason: String },
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    #[error("request signing failed: {0}")]
    Signing(String),
    /// Non-2xx status with nothing to decode.
    #[error("HTTP {status} with empty body")]
    EmptyResponse { status: u32 },
    /// Non-2xx status whose body is not an MWS fault document (proxy or
    /// load balancer error page).
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u32, body: String },
}

/// Payload did not match the expected XML shape.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{what}: payload is not valid UTF-8")]
    Utf8 { what: &'static str },
    #[error("{what}: {source}")]
    Xml {
        what: &'static str,
        #[source]
        source: quick_xml::DeError,
    },
    #[error("{what}: invalid {field} value {value:?}")]
    Field {
        what: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("{what}: missing {field}")]
    Missing {
        what: &'static str,
        field: &'static str,
    },
    /// `<ErrorResponse>` without a single `<Error>` element.
    #[error("fault payload carries no <Error> elements")]
    EmptyFault,
}

/// Terminal outcome of a call. Always carries the originating fault or reason.
#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("{operation}: chunk {chunk} aborted on {class} fault: {fault}")]
    Fault {
        operation: &'static str,
        chunk: usize,
        class: ErrorClass,
        fault: FaultRecord,
    },
    #[error("{operation}: chunk {chunk} still throttled after {retries} retries ({elapsed:?} elapsed): {last_fault}")]
    RetriesExhausted {
        operation: &'static str,
        chunk: usize,
        retries: u32,
        elapsed: Duration,
        last_fault: FaultRecord,
    },
    #[error("{operation}: cancelled before chunk {chunk} completed")]
    Cancelled { operation: &'static str, chunk: usize },
}

impl TerminalError {
    pub fn fault(&self) -> Option<&FaultRecord> {
        match self {
            TerminalError::Fault { fault, .. } => Some(fault),
            TerminalError::RetriesExhausted { last_fault, .. } => Some(last_fault),
            TerminalError::Cancelled { .. } => None,
        }
    }
}
