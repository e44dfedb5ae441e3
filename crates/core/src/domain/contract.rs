use crate::domain::product::lenient_price;
use crate::domain::recommendation::{Recommendation, RecommendationSet};
use serde::Deserialize;

/// Raw model output. Every field is optional: nothing the model says about money is
/// trusted, it is recomputed in [`LlmRecommendationSet::validate_and_into_set`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmRecommendationSet {
    #[serde(default)]
    pub recommendations: Option<Vec<LlmRecommendation>>,
    #[serde(default)]
    pub total_cost: Option<serde_json::Value>,
    #[serde(default)]
    pub remaining_budget: Option<serde_json::Value>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmRecommendation {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_price::deserialize")]
    pub price: u64,
    #[serde(default)]
    pub shop: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl LlmRecommendationSet {
    /// Enforce the budget ceiling over the model's list.
    ///
    /// Items are visited in the order the model returned them. An item is kept when the
    /// running total plus its price stays within `budget`; a rejected item does not stop
    /// the scan, later cheaper items may still fit. `total_cost` and `remaining_budget`
    /// are recomputed from the kept items.
    pub fn validate_and_into_set(self, budget: u64) -> RecommendationSet {
        let mut total: u64 = 0;
        let mut kept = Vec::new();

        for item in self.recommendations.unwrap_or_default() {
            let Some(next) = total.checked_add(item.price) else {
                continue;
            };
            if next <= budget {
                total = next;
                kept.push(item.into_recommendation());
            }
        }

        RecommendationSet {
            recommendations: kept,
            total_cost: total,
            remaining_budget: budget - total,
            summary: self.summary.unwrap_or_default(),
        }
    }
}

impl LlmRecommendation {
    fn into_recommendation(self) -> Recommendation {
        Recommendation {
            name: self.name.unwrap_or_default(),
            price: self.price,
            shop: self.shop.unwrap_or_default(),
            link: self.link.unwrap_or_default(),
            image: self.image.filter(|s| !s.trim().is_empty()),
            reason: self.reason.unwrap_or_default(),
        }
    }
}
