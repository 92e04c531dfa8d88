//! Encode chunk items as request parameters.

use crate::operation::{ItemParam, Operation};

/// Parameters carrying `items` for `op`, numbered from 1 for indexed lists.
pub fn chunk_params<T: AsRef<str>>(op: &Operation, items: &[T]) -> Vec<(String, String)> {
    match op.item_param {
        ItemParam::Indexed(prefix) => items
            .iter()
            .enumerate()
            .map(|(i, item)| (format!("{}.{}", prefix, i + 1), item.as_ref().to_string()))
            .collect(),
        ItemParam::Single(key) => items
            .first()
            .map(|item| vec![(key.to_string(), item.as_ref().to_string())])
            .unwrap_or_default(),
        ItemParam::None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{
        GET_LOWEST_OFFER_LISTINGS_FOR_ASIN, GET_PRODUCT_CATEGORIES_FOR_SKU, REQUEST_REPORT,
    };

    #[test]
    fn indexed_params_are_one_based_and_ordered() {
        let params = chunk_params(&GET_LOWEST_OFFER_LISTINGS_FOR_ASIN, &["B001", "B002"]);
        assert_eq!(
            params,
            vec![
                ("ASINList.ASIN.1".to_string(), "B001".to_string()),
                ("ASINList.ASIN.2".to_string(), "B002".to_string()),
            ]
        );
    }

    #[test]
    fn single_param_uses_plain_key() {
        let params = chunk_params(&GET_PRODUCT_CATEGORIES_FOR_SKU, &["SKU-9"]);
        assert_eq!(params, vec![("SellerSKU".to_string(), "SKU-9".to_string())]);
    }

    #[test]
    fn operations_without_items_add_nothing() {
        assert!(chunk_params(&REQUEST_REPORT, &["ignored"]).is_empty());
    }
}
