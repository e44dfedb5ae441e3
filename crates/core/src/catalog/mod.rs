pub mod provider;
pub mod types;

use crate::catalog::provider::CatalogSource;
use crate::catalog::types::{CatalogEntry, CatalogResponse};
use crate::domain::product::{Product, ProductId};
use std::fmt;

const UNKNOWN_PRODUCT: &str = "Unknown Product";
const UNKNOWN_STORE: &str = "Unknown Store";
const NO_LINK: &str = "#";

/// Why the live catalog was replaced by the sample products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    Transport(String),
    HttpStatus(u16),
    Decode(String),
    EmptyData,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Transport(detail) => write!(f, "catalog request failed: {detail}"),
            FallbackReason::HttpStatus(status) => write!(f, "catalog returned HTTP {status}"),
            FallbackReason::Decode(detail) => write!(f, "catalog response not decodable: {detail}"),
            FallbackReason::EmptyData => f.write_str("catalog returned no entries"),
        }
    }
}

impl std::error::Error for FallbackReason {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOrigin {
    Live,
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub origin: CatalogOrigin,
}

impl Catalog {
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, CatalogOrigin::Fallback(_))
    }
}

/// Load the catalog, degrading to [`fallback_products`] on any failure.
///
/// Never fails. Each call hits the source again; nothing is cached.
pub async fn fetch_all_products(source: &dyn CatalogSource) -> Catalog {
    match load_catalog(source).await {
        Ok(products) => {
            tracing::debug!(
                source = source.source_name(),
                products_len = products.len(),
                "catalog loaded"
            );
            Catalog {
                products,
                origin: CatalogOrigin::Live,
            }
        }
        Err(reason) => {
            tracing::warn!(
                source = source.source_name(),
                reason = %reason,
                "catalog unavailable; using fallback sample products"
            );
            Catalog {
                products: fallback_products(),
                origin: CatalogOrigin::Fallback(reason),
            }
        }
    }
}

/// Fetch and flatten without the fallback substitution.
pub async fn load_catalog(source: &dyn CatalogSource) -> Result<Vec<Product>, FallbackReason> {
    let response = source.fetch_catalog().await?;
    flatten_catalog(response)
}

/// Turn nested entries into one [`Product`] per listing.
///
/// An empty or missing `data` array is a fallback condition. Entries without listings
/// simply contribute nothing, so a non-empty envelope may still flatten to zero products.
pub fn flatten_catalog(response: CatalogResponse) -> Result<Vec<Product>, FallbackReason> {
    let entries = response.data.unwrap_or_default();
    if entries.is_empty() {
        return Err(FallbackReason::EmptyData);
    }

    let mut out = Vec::new();
    for entry in entries {
        flatten_entry(entry, &mut out);
    }
    Ok(out)
}

fn flatten_entry(entry: CatalogEntry, out: &mut Vec<Product>) {
    let CatalogEntry {
        id: entry_id,
        title,
        category,
        description,
        spec_category,
        listings,
    } = entry;

    let name = non_empty(title).unwrap_or_else(|| UNKNOWN_PRODUCT.to_string());
    let description = non_empty(description).or_else(|| non_empty(spec_category));

    for listing in listings.unwrap_or_default() {
        let id = listing
            .id
            .filter(|id| !is_blank_id(id))
            .or_else(|| entry_id.clone().filter(|id| !is_blank_id(id)))
            .unwrap_or_else(|| ProductId::Text(format!("listing-{}", out.len())));

        out.push(Product {
            id,
            name: name.clone(),
            price: listing.price,
            shop: non_empty(listing.store).unwrap_or_else(|| UNKNOWN_STORE.to_string()),
            product_link: non_empty(listing.product_url).unwrap_or_else(|| NO_LINK.to_string()),
            image_url: listing.image_url,
            category: category.clone(),
            description: description.clone(),
        });
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn is_blank_id(id: &ProductId) -> bool {
    matches!(id, ProductId::Text(s) if s.is_empty())
}

/// Sample products served whenever the live catalog cannot be used.
pub fn fallback_products() -> Vec<Product> {
    let sample = |id: &str, name: &str, price: u64, category: &str, description: &str| Product {
        id: ProductId::from(id),
        name: name.to_string(),
        price,
        shop: "Nova Store".to_string(),
        product_link: NO_LINK.to_string(),
        image_url: None,
        category: Some(category.to_string()),
        description: Some(description.to_string()),
    };

    vec![
        sample(
            "mock-1",
            "iPhone 15 Pro",
            1_200_000,
            "phones",
            "Latest iPhone with Titanium design",
        ),
        sample(
            "mock-2",
            "HP Pavilion Laptop",
            450_000,
            "laptops",
            "Powerful laptop for everyday use",
        ),
        sample(
            "mock-3",
            "Logitech Wireless Mouse",
            15_000,
            "accessories",
            "Comfortable wireless mouse",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::provider::HttpCatalogClient;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpCatalogClient {
        HttpCatalogClient::new(server.uri(), "/products/all", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn flattens_each_listing_into_a_product() {
        let response: CatalogResponse = serde_json::from_value(json!({
            "data": [
                {
                    "_id": "p1",
                    "title": "Mama Gold Rice 50kg",
                    "category": "groceries",
                    "description": "Long grain parboiled rice",
                    "listings": [
                        {"_id": "l1", "price": 78000, "store": "Jumia", "product_url": "https://j/1", "image_url": "https://img/1"},
                        {"_id": "l2", "price": "75500", "store": "Konga", "product_url": "https://k/1"}
                    ]
                },
                {
                    "_id": "p2",
                    "title": "",
                    "spec_category": "Audio",
                    "listings": [
                        {"price": null}
                    ]
                },
                {
                    "_id": "p3",
                    "title": "Orphan"
                }
            ]
        }))
        .unwrap();

        let products = flatten_catalog(response).unwrap();
        assert_eq!(products.len(), 3);

        assert_eq!(products[0].id, ProductId::from("l1"));
        assert_eq!(products[0].name, "Mama Gold Rice 50kg");
        assert_eq!(products[0].price, 78_000);
        assert_eq!(products[0].shop, "Jumia");
        assert_eq!(products[0].image_url.as_deref(), Some("https://img/1"));
        assert_eq!(products[0].category.as_deref(), Some("groceries"));

        assert_eq!(products[1].price, 75_500);
        assert_eq!(products[1].shop, "Konga");
        assert_eq!(products[1].image_url, None);
        assert_eq!(products[1].description.as_deref(), Some("Long grain parboiled rice"));

        assert_eq!(products[2].id, ProductId::from("p2"));
        assert_eq!(products[2].name, "Unknown Product");
        assert_eq!(products[2].price, 0);
        assert_eq!(products[2].shop, "Unknown Store");
        assert_eq!(products[2].product_link, "#");
        assert_eq!(products[2].description.as_deref(), Some("Audio"));
    }

    #[test]
    fn empty_data_is_a_fallback_condition() {
        let empty: CatalogResponse = serde_json::from_value(json!({"data": []})).unwrap();
        assert_eq!(flatten_catalog(empty), Err(FallbackReason::EmptyData));

        let missing: CatalogResponse = serde_json::from_value(json!({"ok": true})).unwrap();
        assert_eq!(flatten_catalog(missing), Err(FallbackReason::EmptyData));
    }

    #[test]
    fn entries_without_listings_flatten_to_nothing() {
        let response: CatalogResponse =
            serde_json::from_value(json!({"data": [{"_id": "p1", "title": "Lonely"}]})).unwrap();
        assert_eq!(flatten_catalog(response), Ok(vec![]));
    }

    #[tokio::test]
    async fn http_500_returns_the_three_sample_products() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/all"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let catalog = fetch_all_products(&client_for(&server)).await;
        assert_eq!(catalog.origin, CatalogOrigin::Fallback(FallbackReason::HttpStatus(500)));

        let summary: Vec<_> = catalog
            .products
            .iter()
            .map(|p| (p.name.as_str(), p.price))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("iPhone 15 Pro", 1_200_000),
                ("HP Pavilion Laptop", 450_000),
                ("Logitech Wireless Mouse", 15_000),
            ]
        );
    }

    #[tokio::test]
    async fn live_catalog_is_flattened() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "_id": "p1",
                    "title": "Bluetooth Speaker",
                    "category": "audio",
                    "listings": [{"_id": "l1", "price": 25000, "store": "Slot", "product_url": "https://slot/1"}]
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let catalog = fetch_all_products(&client_for(&server)).await;
        assert_eq!(catalog.origin, CatalogOrigin::Live);
        assert_eq!(catalog.products.len(), 1);
        assert_eq!(catalog.products[0].shop, "Slot");
    }

    #[tokio::test]
    async fn malformed_body_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let catalog = fetch_all_products(&client_for(&server)).await;
        assert!(matches!(
            catalog.origin,
            CatalogOrigin::Fallback(FallbackReason::Decode(_))
        ));
        assert_eq!(catalog.products, fallback_products());
    }

    #[tokio::test]
    async fn empty_envelope_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let catalog = fetch_all_products(&client_for(&server)).await;
        assert_eq!(catalog.origin, CatalogOrigin::Fallback(FallbackReason::EmptyData));
        assert_eq!(catalog.products.len(), 3);
    }

    #[tokio::test]
    async fn unreachable_host_falls_back() {
        let client =
            HttpCatalogClient::new("http://127.0.0.1:9", "/products/all", Duration::from_secs(2))
                .unwrap();
        let catalog = fetch_all_products(&client).await;
        assert!(matches!(
            catalog.origin,
            CatalogOrigin::Fallback(FallbackReason::Transport(_))
        ));
    }
}
