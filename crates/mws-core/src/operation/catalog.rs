//! Documented throttling limits for the operations this client speaks.

use super::{ApiSection, ItemParam, ItemUnit, Operation};

/// Bulk limit used for the lowest-offer-listing lookups.
const OFFER_LISTING_BULK_LIMIT: usize = 18;

pub const GET_LOWEST_OFFER_LISTINGS_FOR_ASIN: Operation = Operation {
    name: "GetLowestOfferListingsForASIN",
    section: ApiSection::Products,
    unit: ItemUnit::PerItem,
    max_batch: OFFER_LISTING_BULK_LIMIT,
    restore_rate: 10.0,
    hourly_quota: 36_000,
    item_param: ItemParam::Indexed("ASINList.ASIN"),
};

pub const GET_LOWEST_OFFER_LISTINGS_FOR_SKU: Operation = Operation {
    name: "GetLowestOfferListingsForSKU",
    section: ApiSection::Products,
    unit: ItemUnit::PerItem,
    max_batch: OFFER_LISTING_BULK_LIMIT,
    restore_rate: 10.0,
    hourly_quota: 36_000,
    item_param: ItemParam::Indexed("SellerSKUList.SellerSKU"),
};

pub const GET_COMPETITIVE_PRICING_FOR_ASIN: Operation = Operation {
    name: "GetCompetitivePricingForASIN",
    section: ApiSection::Products,
    unit: ItemUnit::PerItem,
    max_batch: 20,
    restore_rate: 10.0,
    hourly_quota: 36_000,
    item_param: ItemParam::Indexed("ASINList.ASIN"),
};

pub const GET_MATCHING_PRODUCT_FOR_ID: Operation = Operation {
    name: "GetMatchingProductForId",
    section: ApiSection::Products,
    unit: ItemUnit::PerItem,
    max_batch: 5,
    restore_rate: 5.0,
    hourly_quota: 18_000,
    item_param: ItemParam::Indexed("IdList.Id"),
};

pub const GET_MY_PRICE_FOR_SKU: Operation = Operation {
    name: "GetMyPriceForSKU",
    section: ApiSection::Products,
    unit: ItemUnit::PerItem,
    max_batch: 20,
    restore_rate: 10.0,
    hourly_quota: 36_000,
    item_param: ItemParam::Indexed("SellerSKUList.SellerSKU"),
};

pub const GET_LOWEST_PRICED_OFFERS_FOR_SKU: Operation = Operation {
    name: "GetLowestPricedOffersForSKU",
    section: ApiSection::Products,
    unit: ItemUnit::PerItem,
    max_batch: 1,
    restore_rate: 5.0,
    hourly_quota: 200,
    item_param: ItemParam::Single("SellerSKU"),
};

// One request every five seconds.
pub const GET_PRODUCT_CATEGORIES_FOR_SKU: Operation = Operation {
    name: "GetProductCategoriesForSKU",
    section: ApiSection::Products,
    unit: ItemUnit::PerRequest,
    max_batch: 1,
    restore_rate: 0.2,
    hourly_quota: 720,
    item_param: ItemParam::Single("SellerSKU"),
};

pub const REQUEST_REPORT: Operation = Operation {
    name: "RequestReport",
    section: ApiSection::Reports,
    unit: ItemUnit::PerRequest,
    max_batch: 1,
    restore_rate: 1.0 / 60.0,
    hourly_quota: 60,
    item_param: ItemParam::None,
};

pub const GET_REPORT_REQUEST_LIST: Operation = Operation {
    name: "GetReportRequestList",
    section: ApiSection::Reports,
    unit: ItemUnit::PerRequest,
    max_batch: 1,
    restore_rate: 1.0 / 45.0,
    hourly_quota: 80,
    item_param: ItemParam::None,
};

pub const GET_REPORT: Operation = Operation {
    name: "GetReport",
    section: ApiSection::Reports,
    unit: ItemUnit::PerRequest,
    max_batch: 1,
    restore_rate: 1.0 / 60.0,
    hourly_quota: 60,
    item_param: ItemParam::None,
};

/// Every operation known to the client.
pub static CATALOG: &[&Operation] = &[
    &GET_LOWEST_OFFER_LISTINGS_FOR_ASIN,
    &GET_LOWEST_OFFER_LISTINGS_FOR_SKU,
    &GET_COMPETITIVE_PRICING_FOR_ASIN,
    &GET_MATCHING_PRODUCT_FOR_ID,
    &GET_MY_PRICE_FOR_SKU,
    &GET_LOWEST_PRICED_OFFERS_FOR_SKU,
    &GET_PRODUCT_CATEGORIES_FOR_SKU,
    &REQUEST_REPORT,
    &GET_REPORT_REQUEST_LIST,
    &GET_REPORT,
];
