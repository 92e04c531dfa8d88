//! Remote operation definitions.
//!
//! An [`Operation`] is immutable and describes how the provider throttles one
//! call family: whether the quota counts requests or items, how fast it
//! restores, how many items fit in one request, and how those items are
//! encoded as query parameters.

mod catalog;

use std::time::Duration;

use crate::error::MwsError;

pub use catalog::{
    CATALOG, GET_COMPETITIVE_PRICING_FOR_ASIN, GET_LOWEST_OFFER_LISTINGS_FOR_ASIN,
    GET_LOWEST_OFFER_LISTINGS_FOR_SKU, GET_LOWEST_PRICED_OFFERS_FOR_SKU,
    GET_MATCHING_PRODUCT_FOR_ID, GET_MY_PRICE_FOR_SKU, GET_PRODUCT_CATEGORIES_FOR_SKU,
    GET_REPORT, GET_REPORT_REQUEST_LIST, REQUEST_REPORT,
};

/// Unit the provider's quota is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemUnit {
    /// Every request costs one unit regardless of how many items it carries.
    PerRequest,
    /// Every item in a request costs one unit.
    PerItem,
}

/// API section an operation lives under; determines path and `Version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiSection {
    Products,
    Reports,
}

impl ApiSection {
    pub fn path(self) -> &'static str {
        match self {
            ApiSection::Products => "/Products/2011-10-01",
            ApiSection::Reports => "/Reports/2009-01-01",
        }
    }

    /// Last path segment, sent as the `Version` parameter.
    pub fn version(self) -> &'static str {
        let path = self.path();
        path.rsplit('/').next().unwrap_or(path)
    }
}

/// How chunk items become request parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemParam {
    /// `Prefix.1=a&Prefix.2=b...`
    Indexed(&'static str),
    /// A single `Key=a`; only valid with a max batch of 1.
    Single(&'static str),
    /// The operation takes no item list.
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub name: &'static str,
    pub section: ApiSection,
    pub unit: ItemUnit,
    pub max_batch: usize,
    /// Units restored per second.
    pub restore_rate: f64,
    /// Units allowed per rolling hour.
    pub hourly_quota: u32,
    pub item_param: ItemParam,
}

impl Operation {
    /// Find a catalog entry by its remote `Action` name.
    pub fn lookup(name: &str) -> Option<&'static Operation> {
        CATALOG.iter().copied().find(|op| op.name == name)
    }

    /// Reject definitions the limiter cannot work with.
    pub fn validate(&self) -> Result<(), MwsError> {
        if self.name.trim().is_empty() {
            return Err(MwsError::InvalidInput("operation has no name".into()));
        }
        if self.max_batch == 0 {
            return Err(MwsError::InvalidInput(format!(
                "{}: max batch size must be positive",
                self.name
            )));
        }
        if !(self.restore_rate.is_finite() && self.restore_rate > 0.0) {
            return Err(MwsError::InvalidInput(format!(
                "{}: restore rate must be positive, got {}",
                self.name, self.restore_rate
            )));
        }
        if self.hourly_quota == 0 {
            return Err(MwsError::InvalidInput(format!(
                "{}: hourly quota must be positive",
                self.name
            )));
        }
        if matches!(self.item_param, ItemParam::Single(_)) && self.max_batch != 1 {
            return Err(MwsError::InvalidInput(format!(
                "{}: single-item parameter requires a max batch of 1",
                self.name
            )));
        }
        Ok(())
    }

    /// Quota units consumed by a request carrying `items` items.
    pub fn units_for(&self, items: usize) -> u32 {
        match self.unit {
            ItemUnit::PerRequest => 1,
            ItemUnit::PerItem => u32::try_from(items.max(1)).unwrap_or(u32::MAX),
        }
    }

    /// Time the provider needs to restore `units` units.
    pub fn restore_time(&self, units: u32) -> Duration {
        let nanos = (f64::from(units) * 1e9 / self.restore_rate).round();
        if nanos.is_finite() && nanos > 0.0 {
            Duration::from_nanos(nanos as u64)
        } else {
            Duration::ZERO
        }
    }
}
