use crate::domain::product::{lenient_price, ProductId};
use serde::Deserialize;

/// Upstream envelope: `{ "data": [ { ..., "listings": [ ... ] } ] }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub data: Option<Vec<CatalogEntry>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogEntry {
    #[serde(default, rename = "_id")]
    pub id: Option<ProductId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub spec_category: Option<String>,
    #[serde(default)]
    pub listings: Option<Vec<CatalogListing>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogListing {
    #[serde(default, rename = "_id")]
    pub id: Option<ProductId>,
    #[serde(default, deserialize_with = "lenient_price::deserialize")]
    pub price: u64,
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default)]
    pub product_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}
