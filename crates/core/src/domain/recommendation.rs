use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub price: u64,
    pub shop: String,
    pub link: String,
    pub image: Option<String>,
    pub reason: String,
}

/// Validated recommendations. `total_cost` is always the sum of the included prices
/// and never exceeds the requested budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub recommendations: Vec<Recommendation>,
    pub total_cost: u64,
    pub remaining_budget: u64,
    pub summary: String,
}

/// What callers receive: either a validated set or a bare `{ "error": ... }` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecommendationOutcome {
    Failed { error: String },
    Ok(RecommendationSet),
}

impl RecommendationOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, RecommendationOutcome::Failed { .. })
    }

    pub fn into_set(self) -> Option<RecommendationSet> {
        match self {
            RecommendationOutcome::Ok(set) => Some(set),
            RecommendationOutcome::Failed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failed_outcome_serializes_to_error_key_only() {
        let outcome = RecommendationOutcome::Failed {
            error: "Failed to optimize budget.".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"error": "Failed to optimize budget."})
        );
    }

    #[test]
    fn ok_outcome_serializes_flat() {
        let outcome = RecommendationOutcome::Ok(RecommendationSet {
            recommendations: vec![],
            total_cost: 0,
            remaining_budget: 5000,
            summary: "nothing fits".to_string(),
        });
        let v = serde_json::to_value(&outcome).unwrap();
        assert_eq!(v["remaining_budget"], 5000);
        assert!(v.get("error").is_none());
    }
}
