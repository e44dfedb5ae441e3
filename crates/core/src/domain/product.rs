use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Display-only identifier. Upstream ids are sometimes strings, sometimes numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Text(String),
    Number(i64),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Text(s) => f.write_str(s),
            ProductId::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        ProductId::Text(value.to_string())
    }
}

/// One purchasable offer: a catalog entry paired with a single vendor listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: u64,
    pub shop: String,
    pub product_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Best-effort conversion of a loosely typed price into whole currency units.
///
/// Numbers are truncated toward zero, numeric strings are parsed, negatives clamp
/// to zero and anything else (null, objects, garbage strings) counts as zero.
pub fn coerce_price(value: &Value) -> u64 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Some(0.0)
            } else {
                s.parse::<f64>().ok()
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    match raw {
        Some(v) if v.is_finite() && v > 0.0 => v.trunc() as u64,
        _ => 0,
    }
}

/// Serde adapter for price fields that arrive as numbers, strings or not at all.
pub mod lenient_price {
    use super::coerce_price;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().map(coerce_price).unwrap_or(0))
    }
}
