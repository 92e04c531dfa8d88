//! GetMyPriceForSKU.

use serde::Deserialize;

use crate::error::DecodeError;
use crate::fault::Fault;

use super::fields::text;
use super::offers::{RawIdentifiers, RawMoney, RawPrice};
use super::{from_xml, Decode, Money, RawItemError, ResultStatus};

const WHAT: &str = "GetMyPriceForSKU";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "GetMyPriceForSKUResult", default)]
    results: Vec<RawResult>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
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
    #[serde(rename = "Offers", default)]
    offers: Option<RawOffers>,
}

#[derive(Debug, Deserialize)]
struct RawOffers {
    #[serde(rename = "Offer", default)]
    items: Vec<RawOffer>,
}

#[derive(Debug, Deserialize)]
struct RawOffer {
    #[serde(rename = "BuyingPrice", default)]
    buying_price: Option<RawPrice>,
    #[serde(rename = "RegularPrice", default)]
    regular_price: Option<RawMoney>,
    #[serde(rename = "FulfillmentChannel", default)]
    fulfillment_channel: Option<String>,
    #[serde(rename = "ItemCondition", default)]
    condition: Option<String>,
    #[serde(rename = "ItemSubCondition", default)]
    sub_condition: Option<String>,
    #[serde(rename = "SellerId", default)]
    seller_id: Option<String>,
    #[serde(rename = "SellerSKU", default)]
    seller_sku: Option<String>,
}

/// One of the seller's own offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MyOffer {
    /// Listing price plus shipping.
    pub landed_price: Option<Money>,
    /// Current price including promotions, excluding shipping.
    pub listing_price: Option<Money>,
    pub shipping: Option<Money>,
    /// Price excluding promotions and shipping.
    pub regular_price: Option<Money>,
    pub fulfillment_channel: Option<String>,
    pub condition: Option<String>,
    pub sub_condition: Option<String>,
    pub seller_id: Option<String>,
    pub seller_sku: Option<String>,
}

impl MyOffer {
    /// Currency of the regular price, falling back to the buying price.
    pub fn currency(&self) -> Option<&str> {
        [&self.regular_price, &self.listing_price, &self.landed_price]
            .into_iter()
            .flatten()
            .find_map(|m| m.currency.as_deref())
    }
}

/// Price information for one requested SKU. An SKU without an offer listing
/// has no offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MyPrice {
    pub seller_sku: String,
    pub status: ResultStatus,
    pub asin: Option<String>,
    pub marketplace_id: Option<String>,
    pub offers: Vec<MyOffer>,
    pub error: Option<Fault>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MyPriceDecoder;

impl Decode for MyPriceDecoder {
    type Record = MyPrice;

    fn decode_result(&self, payload: &[u8]) -> Result<Vec<MyPrice>, DecodeError> {
        from_xml::<Envelope>(WHAT, payload)?
            .results
            .into_iter()
            .map(convert_result)
            .collect()
    }
}

fn convert_result(raw: RawResult) -> Result<MyPrice, DecodeError> {
    let sku = text(raw.seller_sku);
    let mut record = MyPrice {
        seller_sku: sku.clone().unwrap_or_default(),
        status: ResultStatus::parse(raw.status.as_deref().unwrap_or_default()),
        asin: None,
        marketplace_id: None,
        offers: Vec::new(),
        error: raw.error.map(|e| e.into_fault(sku)),
    };
    let Some(product) = raw.product else {
        return Ok(record);
    };
    if let Some(m) = product.identifiers.and_then(|ids| ids.marketplace_asin) {
        record.asin = text(m.asin);
        record.marketplace_id = text(m.marketplace_id);
    }
    if let Some(offers) = product.offers {
        record.offers = offers
            .items
            .into_iter()
            .map(convert_offer)
            .collect::<Result<_, _>>()?;
    }
    Ok(record)
}

fn convert_offer(raw: RawOffer) -> Result<MyOffer, DecodeError> {
    let (landed, listing, shipping) = match raw.buying_price {
        Some(p) => (
            Money::decode(WHAT, "LandedPrice", p.landed)?,
            Money::decode(WHAT, "ListingPrice", p.listing)?,
            Money::decode(WHAT, "Shipping", p.shipping)?,
        ),
        None => (None, None, None),
    };
    Ok(MyOffer {
        landed_price: landed,
        listing_price: listing,
        shipping,
        regular_price: Money::decode(WHAT, "RegularPrice", raw.regular_price)?,
        fulfillment_channel: text(raw.fulfillment_channel),
        condition: text(raw.condition),
        sub_condition: text(raw.sub_condition),
        seller_id: text(raw.seller_id),
        seller_sku: text(raw.seller_sku),
    })
}
