//! Result decoders.
//!
//! Each decoder turns one successful response body into records in response
//! order. Fault detection and decoding default to the shared `<ErrorResponse>`
//! handling in [`crate::fault`].

mod categories;
pub mod fields;
mod offers;
mod price;
mod reports;
mod status;

use serde::de::DeserializeOwned;

use crate::error::DecodeError;
use crate::fault::{self, Fault, FaultCode, FaultRecord};

pub use categories::{Category, ProductCategoriesDecoder};
pub use offers::{LowestOffer, LowestOfferListingsDecoder, Money, OfferListings, SubCondition};
pub use price::{MyOffer, MyPrice, MyPriceDecoder};
pub use reports::{
    ReportRequestInfo, ReportRequestInfoDecoder, ReportRequestListDecoder, ReportRequestPage,
};
pub use status::ResultStatus;

/// Decodes one operation's responses.
pub trait Decode {
    type Record;

    fn decode_result(&self, payload: &[u8]) -> Result<Vec<Self::Record>, DecodeError>;

    fn is_fault(&self, payload: &[u8]) -> bool {
        fault::is_fault(payload)
    }

    fn decode_fault(&self, payload: &[u8]) -> Result<FaultRecord, DecodeError> {
        fault::decode_fault(payload)
    }
}

/// Passes the response body through untouched, one record per response.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawDecoder;

impl Decode for RawDecoder {
    type Record = Vec<u8>;

    fn decode_result(&self, payload: &[u8]) -> Result<Vec<Vec<u8>>, DecodeError> {
        Ok(vec![payload.to_vec()])
    }
}

/// Deserialize a whole XML document; the root element name is not checked.
pub(crate) fn from_xml<T: DeserializeOwned>(
    what: &'static str,
    payload: &[u8],
) -> Result<T, DecodeError> {
    let text = std::str::from_utf8(payload).map_err(|_| DecodeError::Utf8 { what })?;
    quick_xml::de::from_str(text).map_err(|source| DecodeError::Xml { what, source })
}

/// Per-item `<Error>` element inside an otherwise successful response.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct RawItemError {
    #[serde(rename = "Type", default)]
    kind: Option<String>,
    #[serde(rename = "Code", default)]
    code: Option<String>,
    #[serde(rename = "Message", default)]
    message: Option<String>,
    #[serde(rename = "Detail", default)]
    detail: Option<String>,
}

impl RawItemError {
    pub(crate) fn into_fault(self, sku: Option<String>) -> Fault {
        Fault {
            kind: fields::text(self.kind).unwrap_or_default(),
            code: FaultCode::parse(self.code.as_deref().unwrap_or_default()),
            message: fields::text(self.message).unwrap_or_default(),
            detail: fields::text(self.detail),
            sku,
        }
    }
}
