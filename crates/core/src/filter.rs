//! Keyword matching between free text and catalog products.
//!
//! Both entry points are pure and keep catalog order.

use crate::domain::product::Product;

pub const MIN_KEYWORD_CHARS: usize = 2;
pub const MAX_GIFT_MATCHES: usize = 10;

/// Products whose name, category or shop contains any whitespace-separated keyword
/// of `query` (case-insensitive). Keywords shorter than two characters are ignored;
/// when none remain nothing matches.
pub fn find_relevant_products<'a>(query: &str, products: &'a [Product]) -> Vec<&'a Product> {
    let keywords = shopping_keywords(query);
    if keywords.is_empty() {
        return Vec::new();
    }

    products
        .iter()
        .filter(|product| {
            let name = product.name.to_lowercase();
            let category = lowercase_or_empty(product.category.as_deref());
            let shop = product.shop.to_lowercase();
            keywords.iter().any(|k| {
                name.contains(k.as_str()) || category.contains(k.as_str()) || shop.contains(k.as_str())
            })
        })
        .collect()
}

/// Gift candidates: any comma-separated interest found in name, category or
/// description, priced at or below `max_price`. At most [`MAX_GIFT_MATCHES`], first
/// matches in catalog order.
pub fn filter_gifts<'a>(interests: &str, max_price: u64, products: &'a [Product]) -> Vec<&'a Product> {
    let segments = interest_segments(interests);

    products
        .iter()
        .filter(|product| {
            let name = product.name.to_lowercase();
            let category = lowercase_or_empty(product.category.as_deref());
            let description = lowercase_or_empty(product.description.as_deref());
            let matches_interest = segments.iter().any(|s| {
                name.contains(s.as_str())
                    || category.contains(s.as_str())
                    || description.contains(s.as_str())
            });
            matches_interest && product.price <= max_price
        })
        .take(MAX_GIFT_MATCHES)
        .collect()
}

fn shopping_keywords(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|k| k.chars().count() >= MIN_KEYWORD_CHARS)
        .map(str::to_string)
        .collect()
}

// Empty segments are kept: they match every product, same as an empty substring.
fn interest_segments(interests: &str) -> Vec<String> {
    interests
        .to_lowercase()
        .split(',')
        .map(|s| s.trim().to_string())
        .collect()
}

fn lowercase_or_empty(value: Option<&str>) -> String {
    value.map(str::to_lowercase).unwrap_or_default()
}
