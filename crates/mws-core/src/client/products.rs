//! Products section helpers.

use crate::clock::Clock;
use crate::control::CancelToken;
use crate::error::{DecodeError, MwsError};
use crate::operation::{
    GET_COMPETITIVE_PRICING_FOR_ASIN, GET_LOWEST_OFFER_LISTINGS_FOR_ASIN,
    GET_LOWEST_OFFER_LISTINGS_FOR_SKU, GET_LOWEST_PRICED_OFFERS_FOR_SKU,
    GET_MATCHING_PRODUCT_FOR_ID, GET_MY_PRICE_FOR_SKU, GET_PRODUCT_CATEGORIES_FOR_SKU,
};
use crate::parsers::{
    Category, LowestOfferListingsDecoder, MyPrice, MyPriceDecoder, OfferListings,
    ProductCategoriesDecoder, RawDecoder,
};
use crate::request::Fetch;

use super::MwsClient;

/// Identifier kinds accepted by `GetMatchingProductForId`.
pub const ID_TYPES: [&str; 7] = ["ASIN", "GCID", "SellerSKU", "UPC", "EAN", "ISBN", "JAN"];

/// Conditions accepted by `GetLowestPricedOffersForSKU`.
pub const ITEM_CONDITIONS: [&str; 5] = ["New", "Used", "Collectible", "Refurbished", "Club"];

impl<F: Fetch, C: Clock> MwsClient<F, C> {
    pub fn lowest_offer_listings_for_asin<T: AsRef<str>>(
        &self,
        asins: &[T],
    ) -> Result<Vec<OfferListings>, MwsError> {
        self.submit_batch(
            &GET_LOWEST_OFFER_LISTINGS_FOR_ASIN,
            asins,
            &LowestOfferListingsDecoder::Asin,
        )
    }

    pub fn lowest_offer_listings_for_sku<T: AsRef<str>>(
        &self,
        skus: &[T],
    ) -> Result<Vec<OfferListings>, MwsError> {
        self.submit_batch(
            &GET_LOWEST_OFFER_LISTINGS_FOR_SKU,
            skus,
            &LowestOfferListingsDecoder::Sku,
        )
    }

    pub fn my_price_for_sku<T: AsRef<str>>(&self, skus: &[T]) -> Result<Vec<MyPrice>, MwsError> {
        self.submit_batch(&GET_MY_PRICE_FOR_SKU, skus, &MyPriceDecoder)
    }

    /// Categories of one SKU, each with its parent chain.
    pub fn product_categories_for_sku(&self, sku: &str) -> Result<Vec<Category>, MwsError> {
        self.submit_batch(&GET_PRODUCT_CATEGORIES_FOR_SKU, &[sku], &ProductCategoriesDecoder)
    }

    /// Raw response bodies, one per chunk.
    pub fn competitive_pricing_for_asin<T: AsRef<str>>(
        &self,
        asins: &[T],
    ) -> Result<Vec<Vec<u8>>, MwsError> {
        self.submit_batch(&GET_COMPETITIVE_PRICING_FOR_ASIN, asins, &RawDecoder)
    }

    /// Raw response bodies, one per chunk. `id_type` is one of [`ID_TYPES`].
    pub fn matching_product_for_id<T: AsRef<str>>(
        &self,
        id_type: &str,
        ids: &[T],
    ) -> Result<Vec<Vec<u8>>, MwsError> {
        if !ID_TYPES.contains(&id_type) {
            return Err(MwsError::InvalidInput(format!("unknown IdType {:?}", id_type)));
        }
        let extra = [("IdType".to_string(), id_type.to_string())];
        self.submit_batch_with_cancel(
            &GET_MATCHING_PRODUCT_FOR_ID,
            ids,
            &extra,
            &RawDecoder,
            &CancelToken::new(),
        )
        .map(|outcome| outcome.records)
    }

    /// Raw response body for one SKU. `condition` is one of [`ITEM_CONDITIONS`].
    pub fn lowest_priced_offers_for_sku(&self, sku: &str, condition: &str) -> Result<Vec<u8>, MwsError> {
        if !ITEM_CONDITIONS.contains(&condition) {
            return Err(MwsError::InvalidInput(format!(
                "unknown ItemCondition {:?}",
                condition
            )));
        }
        let extra = [("ItemCondition".to_string(), condition.to_string())];
        self.submit_batch_with_cancel(
            &GET_LOWEST_PRICED_OFFERS_FOR_SKU,
            &[sku],
            &extra,
            &RawDecoder,
            &CancelToken::new(),
        )?
        .records
        .pop()
        .ok_or(MwsError::Decode(DecodeError::Missing {
            what: "GetLowestPricedOffersForSKU",
            field: "response body",
        }))
    }
}
