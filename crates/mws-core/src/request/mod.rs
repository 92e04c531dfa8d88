//! Building, signing and sending requests.
//!
//! The retry controller only sees the [`Fetch`] trait: hand it an operation and
//! its parameters, get the raw response body back. [`CurlTransport`] is the
//! production implementation; tests substitute scripted fetchers.

mod params;
mod sign;
mod transport;

pub use params::chunk_params;
pub use sign::{aws_encode, Endpoint, Signer};
pub use transport::CurlTransport;

use crate::error::TransportError;
use crate::operation::Operation;

/// Signed HTTP fetch of one request.
///
/// Returns the body for any HTTP status; fault payloads arrive with 4xx/5xx
/// and are decoded by the caller.
pub trait Fetch: Send + Sync {
    fn fetch(&self, op: &Operation, params: &[(String, String)]) -> Result<Vec<u8>, TransportError>;
}

impl<F: Fetch + ?Sized> Fetch for std::sync::Arc<F> {
    fn fetch(&self, op: &Operation, params: &[(String, String)]) -> Result<Vec<u8>, TransportError> {
        (**self).fetch(op, params)
    }
}
