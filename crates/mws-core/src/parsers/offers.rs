//! GetLowestOfferListingsForASIN / GetLowestOfferListingsForSKU.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::DecodeError;
use crate::fault::Fault;

use super::fields::{self, text};
use super::{from_xml, Decode, RawItemError, ResultStatus};

const WHAT: &str = "LowestOfferListings";

#[derive(Debug, Deserialize)]
struct AsinEnvelope {
    #[serde(rename = "GetLowestOfferListingsForASINResult", default)]
    results: Vec<RawResult>,
}

#[derive(Debug, Deserialize)]
struct SkuEnvelope {
    #[serde(rename = "GetLowestOfferListingsForSKUResult", default)]
    results: Vec<RawResult>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    #[serde(rename = "@ASIN", default)]
    asin: Option<String>,
    #[serde(rename = "@SellerSKU", default)]
    seller_sku: Option<String>,
    #[serde(rename = "@status", default)]
    status: Option<String>,
    #[serde(rename = "Product", default)]
    product: Option<RawProduct>,
    #[serde(rename = "Error", default)]
    error: Option<RawItemError>,
}

#[derive(Debug, Deserialize)]
struct RawProduct {
    #[serde(rename = "Identifiers", default)]
    identifiers: Option<RawIdentifiers>,
    #[serde(rename = "LowestOfferListings", default)]
    listings: Option<RawListings>,
    #[serde(rename = "Summary", default)]
    summary: Option<RawSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawIdentifiers {
    #[serde(rename = "MarketplaceASIN", default)]
    pub(crate) marketplace_asin: Option<RawMarketplaceAsin>,
    #[serde(rename = "SKUIdentifier", default)]
    pub(crate) sku: Option<RawSkuIdentifier>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMarketplaceAsin {
    #[serde(rename = "MarketplaceId", default)]
    pub(crate) marketplace_id: Option<String>,
    #[serde(rename = "ASIN", default)]
    pub(crate) asin: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSkuIdentifier {
    #[serde(rename = "SellerSKU", default)]
    pub(crate) seller_sku: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawListings {
    #[serde(rename = "LowestOfferListing", default)]
    items: Vec<RawListing>,
}

#[derive(Debug, Deserialize)]
struct RawListing {
    #[serde(rename = "Qualifiers", default)]
    qualifiers: Option<RawQualifiers>,
    #[serde(rename = "NumberOfOfferListingsConsidered", default)]
    considered: Option<u32>,
    #[serde(rename = "SellerFeedbackCount", default)]
    feedback_count: Option<u32>,
    #[serde(rename = "Price", default)]
    price: Option<RawPrice>,
    #[serde(rename = "MultipleOffersAtLowestPrice", default)]
    multiple_at_lowest: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawQualifiers {
    #[serde(rename = "ItemCondition", default)]
    condition: Option<String>,
    #[serde(rename = "ItemSubcondition", default)]
    sub_condition: Option<String>,
    #[serde(rename = "FulfillmentChannel", default)]
    fulfillment_channel: Option<String>,
    #[serde(rename = "ShipsDomestically", default)]
    ships_domestically: Option<String>,
    #[serde(rename = "ShippingTime", default)]
    shipping_time: Option<RawShippingTime>,
    #[serde(rename = "SellerPositiveFeedbackRating", default)]
    feedback_rating: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawShippingTime {
    #[serde(rename = "Max", default)]
    max: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPrice {
    #[serde(rename = "LandedPrice", default)]
    pub(crate) landed: Option<RawMoney>,
    #[serde(rename = "ListingPrice", default)]
    pub(crate) listing: Option<RawMoney>,
    #[serde(rename = "Shipping", default)]
    pub(crate) shipping: Option<RawMoney>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMoney {
    #[serde(rename = "CurrencyCode", default)]
    currency: Option<String>,
    #[serde(rename = "Amount", default)]
    amount: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSummary {
    #[serde(rename = "TotalOfferCount", default)]
    total_offer_count: Option<u32>,
    #[serde(rename = "OffersAvailableTime", default)]
    offers_available_time: Option<String>,
}

/// An amount in integer minor units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money {
    pub cents: i64,
    pub currency: Option<String>,
}

impl Money {
    pub(crate) fn decode(
        what: &'static str,
        field: &'static str,
        raw: Option<RawMoney>,
    ) -> Result<Option<Money>, DecodeError> {
        let Some(raw) = raw else {
            return Ok(None);
        };
        let Some(amount) = text(raw.amount) else {
            return Ok(None);
        };
        Ok(Some(Money {
            cents: fields::parse_cents(what, field, &amount)?,
            currency: text(raw.currency),
        }))
    }
}

/// Item sub-condition, ranked best first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubCondition {
    New,
    Mint,
    VeryGood,
    Good,
    Other(String),
}

impl SubCondition {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "New" => SubCondition::New,
            "Mint" => SubCondition::Mint,
            "VeryGood" => SubCondition::VeryGood,
            "Good" => SubCondition::Good,
            other => SubCondition::Other(other.to_string()),
        }
    }

    /// 1 for New through 5 for anything below Good.
    pub fn rank(&self) -> u8 {
        match self {
            SubCondition::New => 1,
            SubCondition::Mint => 2,
            SubCondition::VeryGood => 3,
            SubCondition::Good => 4,
            SubCondition::Other(_) => 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowestOffer {
    pub condition: Option<String>,
    pub sub_condition: SubCondition,
    pub fulfillment_channel: Option<String>,
    pub ships_domestically: bool,
    pub max_shipping_days: Option<u32>,
    /// Upper bound of the seller's positive feedback range.
    pub positive_feedback_pct: Option<u8>,
    pub feedback_count: u32,
    pub listings_considered: Option<u32>,
    pub landed_price: Option<Money>,
    pub listing_price: Option<Money>,
    pub shipping: Option<Money>,
    pub multiple_offers_at_lowest_price: bool,
}

/// Lowest offers for one requested ASIN or SKU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferListings {
    /// ASIN or SellerSKU as requested.
    pub id: String,
    pub status: ResultStatus,
    pub asin: Option<String>,
    pub seller_sku: Option<String>,
    pub marketplace_id: Option<String>,
    pub offers: Vec<LowestOffer>,
    pub total_offer_count: Option<u32>,
    /// Set when the status is `ActiveButTooSoonForProcessing`.
    pub offers_available_time: Option<DateTime<Utc>>,
    /// Item-level error; the rest of the response is unaffected.
    pub error: Option<Fault>,
}

/// Which identifier the request used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowestOfferListingsDecoder {
    Asin,
    Sku,
}

impl Decode for LowestOfferListingsDecoder {
    type Record = OfferListings;

    fn decode_result(&self, payload: &[u8]) -> Result<Vec<OfferListings>, DecodeError> {
        let results = match self {
            LowestOfferListingsDecoder::Asin => from_xml::<AsinEnvelope>(WHAT, payload)?.results,
            LowestOfferListingsDecoder::Sku => from_xml::<SkuEnvelope>(WHAT, payload)?.results,
        };
        results.into_iter().map(convert_result).collect()
    }
}

fn convert_result(raw: RawResult) -> Result<OfferListings, DecodeError> {
    let status = ResultStatus::parse(raw.status.as_deref().unwrap_or_default());
    let attr_asin = text(raw.asin);
    let attr_sku = text(raw.seller_sku);
    let id = attr_asin.clone().or_else(|| attr_sku.clone()).unwrap_or_default();
    let error = raw.error.map(|e| e.into_fault(attr_sku.clone()));

    let mut record = OfferListings {
        id,
        status,
        asin: attr_asin,
        seller_sku: attr_sku,
        marketplace_id: None,
        offers: Vec::new(),
        total_offer_count: None,
        offers_available_time: None,
        error,
    };

    let Some(product) = raw.product else {
        return Ok(record);
    };
    if let Some(ids) = product.identifiers {
        if let Some(m) = ids.marketplace_asin {
            record.marketplace_id = text(m.marketplace_id);
            record.asin = text(m.asin).or(record.asin);
        }
        if let Some(s) = ids.sku {
            record.seller_sku = text(s.seller_sku).or(record.seller_sku);
        }
    }
    if let Some(listings) = product.listings {
        record.offers = listings
            .items
            .into_iter()
            .map(convert_listing)
            .collect::<Result<_, _>>()?;
    }
    if let Some(summary) = product.summary {
        record.total_offer_count = summary.total_offer_count;
        if record.status.is_too_soon() {
            record.offers_available_time = fields::parse_opt_timestamp(
                WHAT,
                "OffersAvailableTime",
                summary.offers_available_time.as_deref(),
            )?;
        }
    }
    Ok(record)
}

fn convert_listing(raw: RawListing) -> Result<LowestOffer, DecodeError> {
    let q = raw.qualifiers.unwrap_or_default();
    let sub = text(q.sub_condition);
    let max_days = q
        .shipping_time
        .and_then(|t| t.max)
        .as_deref()
        .and_then(fields::parse_max_shipping_days);

    let (landed, listing, shipping) = match raw.price {
        Some(p) => (
            Money::decode(WHAT, "LandedPrice", p.landed)?,
            Money::decode(WHAT, "ListingPrice", p.listing)?,
            Money::decode(WHAT, "Shipping", p.shipping)?,
        ),
        None => (None, None, None),
    };

    Ok(LowestOffer {
        condition: text(q.condition),
        sub_condition: SubCondition::parse(sub.as_deref().unwrap_or_default()),
        fulfillment_channel: text(q.fulfillment_channel),
        ships_domestically: q.ships_domestically.as_deref().is_some_and(fields::parse_bool),
        max_shipping_days: max_days,
        positive_feedback_pct: q
            .feedback_rating
            .as_deref()
            .and_then(fields::parse_feedback_rating),
        feedback_count: raw.feedback_count.unwrap_or(0),
        listings_considered: raw.considered,
        landed_price: landed,
        listing_price: listing,
        shipping,
        multiple_offers_at_lowest_price: raw
            .multiple_at_lowest
            .as_deref()
            .is_some_and(fields::parse_bool),
    })
}
