use crate::domain::contract::LlmRecommendationSet;
use anyhow::Context;

pub fn extract_json(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        // Remove Markdown fences (```json ... ``` or ``` ... ```).
        let mut inner = trimmed;
        if let Some(after_first) = inner.splitn(2, '\n').nth(1) {
            inner = after_first;
        }
        if let Some(end) = inner.rfind("```") {
            inner = &inner[..end];
        }
        return Some(inner.trim().to_string());
    }

    // Best-effort extraction: first '{' to last '}'.
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(trimmed[start..=end].trim().to_string())
}

/// Parse completion content into the raw model contract. Empty content reads as `{}`.
pub fn parse_recommendation_set(text: &str) -> anyhow::Result<LlmRecommendationSet> {
    if text.trim().is_empty() {
        return Ok(LlmRecommendationSet::default());
    }

    let json_str = extract_json(text).unwrap_or_else(|| text.trim().to_string());
    serde_json::from_str::<LlmRecommendationSet>(&json_str)
        .with_context(|| format!("LLM output is not valid JSON for recommendation schema: {json_str}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_json_handles_fenced_blocks() {
        let body = "{\"a\":1}";
        let fenced = format!("```json\n{body}\n```\n");
        assert_eq!(extract_json(&fenced), Some(body.to_string()));
    }

    #[test]
    fn extract_json_falls_back_to_braces() {
        let s = "Here you go: {\"a\":1} enjoy";
        assert_eq!(extract_json(s), Some("{\"a\":1}".to_string()));
    }

    #[test]
    fn empty_content_reads_as_empty_object() {
        let parsed = parse_recommendation_set("   ").unwrap();
        assert!(parsed.recommendations.is_none());
        assert!(parsed.summary.is_none());
    }

    #[test]
    fn parses_recommendation_payload() {
        let text = json!({
            "recommendations": [
                {"name": "JBL Go 3", "price": 25000, "shop": "Slot", "link": "https://slot/1", "image": "https://img/1", "reason": "loud"}
            ],
            "total_cost": 25000,
            "remaining_budget": 25000,
            "summary": "One speaker"
        })
        .to_string();

        let parsed = parse_recommendation_set(&text).unwrap();
        let items = parsed.recommendations.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].price, 25_000);
        assert_eq!(items[0].shop.as_deref(), Some("Slot"));
    }

    #[test]
    fn rejects_non_json_content() {
        assert!(parse_recommendation_set("sorry, I cannot help with that").is_err());
    }

    #[test]
    fn rejects_wrong_shape() {
        assert!(parse_recommendation_set("{\"recommendations\": \"none\"}").is_err());
    }
}
