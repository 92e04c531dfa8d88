//! Decode `<ErrorResponse>` payloads into FaultRecord.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;

use crate::error::DecodeError;

use super::{Fault, FaultCode, FaultRecord};

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(rename = "Error", default)]
    errors: Vec<ErrorElement>,
    #[serde(rename = "RequestID", alias = "RequestId", default)]
    request_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorElement {
    #[serde(rename = "@SKU", default)]
    sku: Option<String>,
    #[serde(rename = "Type", default)]
    kind: String,
    #[serde(rename = "Code", default)]
    code: String,
    #[serde(rename = "Message", default)]
    message: String,
    #[serde(rename = "Detail", default)]
    detail: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Decode a fault payload. Fails if the bytes are not a recognizable
/// `<ErrorResponse>` or carry no `<Error>` element.
pub fn decode_fault(payload: &[u8]) -> Result<FaultRecord, DecodeError> {
    const WHAT: &str = "ErrorResponse";
    if !is_fault(payload) {
        return Err(DecodeError::Field {
            what: WHAT,
            field: "root element",
            value: root_name(payload).unwrap_or_default(),
        });
    }
    let text = std::str::from_utf8(payload).map_err(|_| DecodeError::Utf8 { what: WHAT })?;
    let raw: ErrorResponse =
        quick_xml::de::from_str(text).map_err(|source| DecodeError::Xml { what: WHAT, source })?;
    if raw.errors.is_empty() {
        return Err(DecodeError::EmptyFault);
    }

    let faults = raw
        .errors
        .into_iter()
        .map(|e| Fault {
            kind: e.kind.trim().to_string(),
            code: FaultCode::parse(&e.code),
            message: e.message.trim().to_string(),
            detail: non_empty(e.detail),
            sku: non_empty(e.sku),
        })
        .collect();

    Ok(FaultRecord {
        faults,
        request_id: non_empty(raw.request_id),
    })
}

/// True when the payload's root element is `<ErrorResponse>`.
///
/// Only the prolog and the first element are read.
pub fn is_fault(payload: &[u8]) -> bool {
    root_name(payload).as_deref() == Some("ErrorResponse")
}

fn root_name(payload: &[u8]) -> Option<String> {
    let mut reader = Reader::from_reader(payload);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => continue,
        }
    }
}
