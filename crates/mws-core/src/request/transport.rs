//! Blocking GET over libcurl.

use std::time::Duration;

use tracing::debug;

use crate::config::{Credentials, MwsConfig};
use crate::error::TransportError;
use crate::fault;
use crate::operation::Operation;

use super::sign::{Endpoint, Signer};
use super::Fetch;

/// Signs each request and performs it with a fresh curl Easy handle.
///
/// Runs in the current thread; call from `spawn_blocking` if used from async code.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    signer: Signer,
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl CurlTransport {
    pub fn new(signer: Signer, connect_timeout: Duration, request_timeout: Duration) -> Self {
        Self {
            signer,
            connect_timeout,
            request_timeout,
        }
    }

    pub fn from_config(cfg: &MwsConfig, credentials: Credentials) -> Result<Self, TransportError> {
        let endpoint = Endpoint::parse(&cfg.endpoint)?;
        Ok(Self::new(
            Signer::new(credentials, endpoint),
            cfg.connect_timeout(),
            cfg.request_timeout(),
        ))
    }

    fn get(&self, url: &str) -> Result<(u32, Vec<u8>), TransportError> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.request_timeout)?;
        easy.useragent(concat!("mws-core/", env!("CARGO_PKG_VERSION")))?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        Ok((code, body))
    }
}

/// First line of an error body, bounded for log and error output.
fn excerpt(body: &[u8]) -> String {
    const MAX: usize = 200;
    let text = String::from_utf8_lossy(body);
    let line = text.trim().lines().next().unwrap_or("");
    match line.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &line[..cut]),
        None => line.to_string(),
    }
}

impl Fetch for CurlTransport {
    fn fetch(&self, op: &Operation, params: &[(String, String)]) -> Result<Vec<u8>, TransportError> {
        let url = self.signer.signed_url(op, params)?;
        let (status, body) = self.get(&url)?;
        debug!(operation = op.name, status, bytes = body.len(), "response received");
        if (200..300).contains(&status) {
            return Ok(body);
        }
        if body.is_empty() {
            return Err(TransportError::EmptyResponse { status });
        }
        // Faults arrive with 4xx/5xx and are classified by the caller.
        if !fault::is_fault(&body) {
            return Err(TransportError::HttpStatus {
                status,
                body: excerpt(&body),
            });
        }
        Ok(body)
    }
}
