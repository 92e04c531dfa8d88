//! Signature Version 2 query signing (HMAC-SHA256).
//!
//! Every request carries the common parameters (`Action`, `AWSAccessKeyId`,
//! `SellerId`, `SignatureVersion`, `SignatureMethod`, `Version`, `Timestamp`)
//! plus the operation's own. The canonical query is the parameters sorted by
//! key bytes and percent-encoded per RFC 3986; the signature covers
//! `GET\n<host>\n<path>\n<canonical query>`.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::form_urlencoded::byte_serialize;
use url::Url;

use crate::config::Credentials;
use crate::error::TransportError;
use crate::operation::Operation;

type HmacSha256 = Hmac<Sha256>;

/// Scheme and authority requests are sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: String,
    /// Host, plus `:port` when it is not the scheme's default.
    authority: String,
}

impl Endpoint {
    pub fn parse(endpoint: &str) -> Result<Self, TransportError> {
        let invalid = |reason: &str| TransportError::Endpoint {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        };
        let url = Url::parse(endpoint.trim()).map_err(|e| invalid(&e.to_string()))?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(invalid("scheme must be http or https"));
        }
        let host = url.host_str().ok_or_else(|| invalid("missing host"))?;
        let authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        Ok(Self {
            scheme: url.scheme().to_string(),
            authority: authority.to_ascii_lowercase(),
        })
    }

    /// Value signed as the host line.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn url(&self, path: &str, query: &str) -> String {
        format!("{}://{}{}?{}", self.scheme, self.authority, path, query)
    }
}

/// Percent-encode a parameter key or value the way the provider canonicalizes it.
///
/// Unreserved characters `A-Z a-z 0-9 - _ . ~` pass through; everything else,
/// space included, becomes `%XX`.
pub fn aws_encode(value: &str) -> String {
    byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
        .replace('*', "%2A")
        .replace("%7E", "~")
}

/// Signs requests for one seller account.
#[derive(Debug, Clone)]
pub struct Signer {
    credentials: Credentials,
    endpoint: Endpoint,
}

impl Signer {
    pub fn new(credentials: Credentials, endpoint: Endpoint) -> Self {
        Self {
            credentials,
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Full signed URL for `op` with `params`, timestamped now.
    pub fn signed_url(
        &self,
        op: &Operation,
        params: &[(String, String)],
    ) -> Result<String, TransportError> {
        let query = self.signed_query(op, params, Utc::now())?;
        Ok(self.endpoint.url(op.section.path(), &query))
    }

    /// Canonical query with `Signature` appended.
    pub fn signed_query(
        &self,
        op: &Operation,
        params: &[(String, String)],
        timestamp: DateTime<Utc>,
    ) -> Result<String, TransportError> {
        let canonical = self.canonical_query(op, params, timestamp);
        let to_sign = format!(
            "GET\n{}\n{}\n{}",
            self.endpoint.authority(),
            op.section.path(),
            canonical
        );
        let signature = self.compute_signature(&to_sign)?;
        Ok(format!("{}&Signature={}", canonical, aws_encode(&signature)))
    }

    fn canonical_query(
        &self,
        op: &Operation,
        params: &[(String, String)],
        timestamp: DateTime<Utc>,
    ) -> String {
        let creds = &self.credentials;
        let mut all: BTreeMap<String, String> = BTreeMap::new();
        all.insert("Action".into(), op.name.to_string());
        all.insert("AWSAccessKeyId".into(), creds.access_key.clone());
        all.insert("SellerId".into(), creds.seller_id.clone());
        if let Some(token) = creds.auth_token.as_ref().filter(|t| !t.is_empty()) {
            all.insert("MWSAuthToken".into(), token.clone());
        }
        all.insert("SignatureVersion".into(), "2".into());
        all.insert("SignatureMethod".into(), "HmacSHA256".into());
        all.insert("Version".into(), op.section.version().to_string());
        all.insert(
            "Timestamp".into(),
            timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        );
        for (k, v) in params {
            all.insert(k.clone(), v.clone());
        }

        all.iter()
            .map(|(k, v)| format!("{}={}", aws_encode(k), aws_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn compute_signature(&self, data: &str) -> Result<String, TransportError> {
        let mut mac = HmacSha256::new_from_slice(self.credentials.secret_key.as_bytes())
            .map_err(|e| TransportError::Signing(e.to_string()))?;
        mac.update(data.as_bytes());
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}
