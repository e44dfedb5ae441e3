pub mod prompt;

use crate::domain::product::Product;
use crate::domain::recommendation::{RecommendationOutcome, RecommendationSet};
use crate::engine::prompt::ContextProduct;
use crate::filter;
use crate::llm::{json, ChatCompletionClient, CompletionInput};
use std::sync::Arc;

/// Most products handed to the model in budget mode.
pub const BUDGET_CONTEXT_LIMIT: usize = 50;
/// Catalog sample used when filtering finds nothing.
pub const FALLBACK_SAMPLE_SIZE: usize = 20;

pub const BUDGET_ERROR: &str = "Failed to optimize budget.";
pub const GIFT_ERROR: &str = "Failed to find gift recommendations.";

#[derive(Clone)]
pub struct RecommendationEngine {
    llm: Arc<dyn ChatCompletionClient>,
}

impl RecommendationEngine {
    pub fn new(llm: Arc<dyn ChatCompletionClient>) -> Self {
        Self { llm }
    }

    pub fn provider_name(&self) -> &'static str {
        self.llm.provider_name()
    }

    pub async fn get_budget_optimization(
        &self,
        budget: u64,
        shopping_list: &str,
        catalog: &[Product],
    ) -> RecommendationOutcome {
        match self.try_budget_optimization(budget, shopping_list, catalog).await {
            Ok(set) => RecommendationOutcome::Ok(set),
            Err(err) => {
                tracing::error!(budget, error = %format!("{err:#}"), "error during budget optimization");
                RecommendationOutcome::Failed {
                    error: BUDGET_ERROR.to_string(),
                }
            }
        }
    }

    pub async fn get_gift_recommendations(
        &self,
        interests: &str,
        budget: u64,
        catalog: &[Product],
    ) -> RecommendationOutcome {
        match self.try_gift_recommendations(interests, budget, catalog).await {
            Ok(set) => RecommendationOutcome::Ok(set),
            Err(err) => {
                tracing::error!(budget, error = %format!("{err:#}"), "error during gift recommendation");
                RecommendationOutcome::Failed {
                    error: GIFT_ERROR.to_string(),
                }
            }
        }
    }

    /// Same as [`Self::get_budget_optimization`] but hands the failure back to the caller.
    pub async fn try_budget_optimization(
        &self,
        budget: u64,
        shopping_list: &str,
        catalog: &[Product],
    ) -> anyhow::Result<RecommendationSet> {
        let context = budget_context(shopping_list, catalog);
        tracing::debug!(budget, context_len = context.len(), "budget context prepared");

        let input = CompletionInput {
            system: prompt::budget_system_prompt(budget, shopping_list, &context)?,
            user: prompt::budget_user_prompt(shopping_list),
        };
        self.complete_and_validate(input, budget).await
    }

    pub async fn try_gift_recommendations(
        &self,
        interests: &str,
        budget: u64,
        catalog: &[Product],
    ) -> anyhow::Result<RecommendationSet> {
        let context = gift_context(interests, budget, catalog);
        tracing::debug!(budget, context_len = context.len(), "gift context prepared");

        let input = CompletionInput {
            system: prompt::gift_system_prompt(budget, interests, &context)?,
            user: prompt::gift_user_prompt(interests),
        };
        self.complete_and_validate(input, budget).await
    }

    async fn complete_and_validate(
        &self,
        input: CompletionInput,
        budget: u64,
    ) -> anyhow::Result<RecommendationSet> {
        let content = self.llm.complete_json(input).await?;
        let raw = json::parse_recommendation_set(&content)?;
        let proposed = raw.recommendations.as_ref().map_or(0, Vec::len);

        let set = raw.validate_and_into_set(budget);
        if set.recommendations.len() < proposed {
            tracing::info!(
                budget,
                proposed,
                kept = set.recommendations.len(),
                total_cost = set.total_cost,
                "dropped recommendations exceeding budget"
            );
        }
        Ok(set)
    }
}

/// Relevant products, or a catalog sample when nothing matched, capped for the prompt.
pub fn budget_context(shopping_list: &str, catalog: &[Product]) -> Vec<ContextProduct> {
    let relevant = filter::find_relevant_products(shopping_list, catalog);
    let candidates: Vec<&Product> = if relevant.is_empty() {
        catalog.iter().take(FALLBACK_SAMPLE_SIZE).collect()
    } else {
        relevant
    };

    candidates
        .into_iter()
        .take(BUDGET_CONTEXT_LIMIT)
        .map(ContextProduct::from)
        .collect()
}

pub fn gift_context(interests: &str, budget: u64, catalog: &[Product]) -> Vec<ContextProduct> {
    let candidates = filter::filter_gifts(interests, budget, catalog);
    if candidates.is_empty() {
        return catalog
            .iter()
            .take(FALLBACK_SAMPLE_SIZE)
            .map(ContextProduct::from)
            .collect();
    }

    candidates.into_iter().map(ContextProduct::from).collect()
}
