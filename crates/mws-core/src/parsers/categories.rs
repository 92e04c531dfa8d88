//! GetProductCategoriesForSKU.

use serde::Deserialize;

use crate::error::DecodeError;

use super::fields::text;
use super::{from_xml, Decode};

const WHAT: &str = "GetProductCategoriesForSKU";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "GetProductCategoriesForSKUResult", default)]
    result: Option<RawResult>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    #[serde(rename = "Self", default)]
    categories: Vec<RawCategory>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    #[serde(rename = "ProductCategoryId", default)]
    id: Option<String>,
    #[serde(rename = "ProductCategoryName", default)]
    name: Option<String>,
    #[serde(rename = "Parent", default)]
    parent: Option<Box<RawCategory>>,
}

/// A category and its chain of parents up to the marketplace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub parent: Option<Box<Category>>,
}

impl Category {
    /// This category followed by each parent, nearest first.
    pub fn lineage(&self) -> impl Iterator<Item = &Category> {
        std::iter::successors(Some(self), |c| c.parent.as_deref())
    }

    /// Category names from the root down to this one, joined with `" > "`.
    pub fn path(&self) -> String {
        let mut names: Vec<&str> = self.lineage().map(|c| c.name.as_str()).collect();
        names.reverse();
        names.join(" > ")
    }
}

impl From<RawCategory> for Category {
    fn from(raw: RawCategory) -> Self {
        Category {
            id: text(raw.id).unwrap_or_default(),
            name: text(raw.name).unwrap_or_default(),
            parent: raw.parent.map(|p| Box::new(Category::from(*p))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProductCategoriesDecoder;

impl Decode for ProductCategoriesDecoder {
    type Record = Category;

    fn decode_result(&self, payload: &[u8]) -> Result<Vec<Category>, DecodeError> {
        let envelope: Envelope = from_xml(WHAT, payload)?;
        Ok(envelope
            .result
            .map(|r| r.categories.into_iter().map(Category::from).collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"<?xml version="1.0"?>
<GetProductCategoriesForSKUResponse xmlns="http://mws.amazonservices.com/schema/Products/2011-10-01">
  <GetProductCategoriesForSKUResult>
    <Self>
      <ProductCategoryId>271581011</ProductCategoryId>
      <ProductCategoryName>Men's</ProductCategoryName>
      <Parent>
        <ProductCategoryId>271578011</ProductCategoryId>
        <ProductCategoryName>Department</ProductCategoryName>
        <Parent>
          <ProductCategoryId>1036682</ProductCategoryId>
          <ProductCategoryName>Apparel</ProductCategoryName>
        </Parent>
      </Parent>
    </Self>
    <Self>
      <ProductCategoryId>15706661</ProductCategoryId>
      <ProductCategoryName>Gifts</ProductCategoryName>
    </Self>
  </GetProductCategoriesForSKUResult>
  <ResponseMetadata><RequestId>fbce5b62-67cc-4ab8-86f3-EXAMPLE22e4e</RequestId></ResponseMetadata>
</GetProductCategoriesForSKUResponse>"#;

    #[test]
    fn decodes_nested_parents() {
        let cats = ProductCategoriesDecoder
            .decode_result(RESPONSE.as_bytes())
            .unwrap();
        assert_eq!(cats.len(), 2);
        let ids: Vec<&str> = cats[0].lineage().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["271581011", "271578011", "1036682"]);
        assert_eq!(cats[0].path(), "Apparel > Department > Men's");
        assert!(cats[1].parent.is_none());
        assert_eq!(cats[1].path(), "Gifts");
    }

    #[test]
    fn empty_result_has_no_categories() {
        let xml = "<GetProductCategoriesForSKUResponse><GetProductCategoriesForSKUResult/></GetProductCategoriesForSKUResponse>";
        assert!(ProductCategoriesDecoder
            .decode_result(xml.as_bytes())
            .unwrap()
            .is_empty());
    }
}
