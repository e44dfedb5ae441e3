use crate::domain::product::Product;
use anyhow::Context;
use serde::Serialize;

/// The slice of a product the model gets to see.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextProduct {
    pub name: String,
    pub price: u64,
    pub shop: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&Product> for ContextProduct {
    fn from(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            price: p.price,
            shop: p.shop.clone(),
            link: p.product_link.clone(),
            image: p.image_url.clone(),
        }
    }
}

const RESPONSE_SHAPE: &str = r#"{
         "recommendations": [
           { "name": "...", "price": 0, "shop": "...", "link": "...", "image": "...", "reason": "..." }
         ],
         "total_cost": 0,
         "remaining_budget": 0,
         "summary": "..."
       }"#;

/// `12345678` -> `₦12,345,678`.
pub fn format_naira(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    out.push('₦');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn budget_system_prompt(
    budget: u64,
    shopping_list: &str,
    context: &[ContextProduct],
) -> anyhow::Result<String> {
    let ceiling = format_naira(budget);
    let context_json =
        serde_json::to_string(context).context("failed to serialize budget context products")?;

    Ok([
        "You are a \"Nigerian Market Expert\" shopping assistant.".to_string(),
        "Your goal is to help users stay under their budget while getting the best value for their shopping list based ONLY on the provided products.".to_string(),
        String::new(),
        format!("CRITICAL: The \"total_cost\" MUST NOT EXCEED {ceiling}."),
        format!("If the shopping list items exceed the budget, you MUST prioritize the most essential items or suggest fewer items to stay within {ceiling}."),
        String::new(),
        format!("Budget: {ceiling}"),
        format!("User's Shopping List: {shopping_list}"),
        String::new(),
        "Available Products (Context):".to_string(),
        context_json,
        String::new(),
        "Instructions:".to_string(),
        "1. Analyze the shopping list and find the best combination of items from the provided context.".to_string(),
        "2. YOU MUST ONLY USE PRODUCTS FROM THE PROVIDED CONTEXT. DO NOT MAKE UP PRODUCTS.".to_string(),
        "3. YOU MUST USE THE EXACT \"link\", \"image\", and \"shop\" PROVIDED IN THE CONTEXT for each recommendation.".to_string(),
        "4. If an exact item isn't available, suggest the closest alternative from the context.".to_string(),
        format!("5. Calculate the total cost and ensure it's strictly <= {ceiling}."),
        format!("6. Provide the result in a clean JSON format:\n       {RESPONSE_SHAPE}"),
        "7. Act as a Market Intelligence expert: list specific prices and compare vendors to find the absolute most cost-effective deal.".to_string(),
        "8. Be witty and helpful, like a seasoned trader in Balogun or Ariaria market.".to_string(),
    ]
    .join("\n"))
}

pub fn budget_user_prompt(shopping_list: &str) -> String {
    format!("Please optimize my shopping list: {shopping_list}")
}

pub fn gift_system_prompt(
    budget: u64,
    interests: &str,
    context: &[ContextProduct],
) -> anyhow::Result<String> {
    let ceiling = format_naira(budget);
    let context_json =
        serde_json::to_string(context).context("failed to serialize gift context products")?;

    Ok([
        "You are a \"Nigerian Market Expert\" gift personal shopper.".to_string(),
        "Your goal is to find the perfect gifts based on the recipient's interests while staying strictly under the budget and using ONLY the provided products.".to_string(),
        String::new(),
        format!("CRITICAL: The total price of suggested gifts (if multiple are suggested as a set) or each individual choice MUST NOT EXCEED {ceiling}."),
        format!("NEVER recommend anything that would cause the user to overspend their {ceiling}."),
        String::new(),
        format!("Budget: {ceiling}"),
        format!("Recipient Interests: {interests}"),
        String::new(),
        "Available Products (Context):".to_string(),
        context_json,
        String::new(),
        "Instructions:".to_string(),
        "1. Select the most relevant products from the context that match the recipient's interests.".to_string(),
        "2. YOU MUST ONLY USE PRODUCTS FROM THE PROVIDED CONTEXT. DO NOT MAKE UP PRODUCTS.".to_string(),
        "3. Curate a list of 3-5 unique gift options.".to_string(),
        format!("4. For each gift, explain why it's a great choice for someone interested in {interests}."),
        "5. YOU MUST USE THE EXACT \"link\", \"image\", and \"shop\" PROVIDED IN THE CONTEXT for each product.".to_string(),
        format!("6. Ensure the total cost (if they bought all or suggested sets) stays within the budget of {ceiling}."),
        format!("7. Provide the result in a clean JSON format:\n       {RESPONSE_SHAPE}"),
        "8. Act as a Personal Market Shopper: Compare available vendors and prices to find the best gift deal.".to_string(),
        "9. Maintain a helpful, savvy \"market expert\" persona (friendly and persuasive).".to_string(),
    ]
    .join("\n"))
}

pub fn gift_user_prompt(interests: &str) -> String {
    format!("Find me the best gifts for someone interested in: {interests}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::ProductId;

    #[test]
    fn formats_currency_with_grouping() {
        assert_eq!(format_naira(0), "₦0");
        assert_eq!(format_naira(999), "₦999");
        assert_eq!(format_naira(10_000), "₦10,000");
        assert_eq!(format_naira(1_200_000), "₦1,200,000");
        assert_eq!(format_naira(123_456_789), "₦123,456,789");
    }

    #[test]
    fn context_product_projects_minimal_fields() {
        let p = Product {
            id: ProductId::from("x"),
            name: "Rice".to_string(),
            price: 3000,
            shop: "Jumia".to_string(),
            product_link: "https://j/rice".to_string(),
            image_url: None,
            category: Some("groceries".to_string()),
            description: Some("long grain".to_string()),
        };
        let v = serde_json::to_value(ContextProduct::from(&p)).unwrap();
        assert_eq!(
            v,
            serde_json::json!({"name": "Rice", "price": 3000, "shop": "Jumia", "link": "https://j/rice"})
        );
    }

    #[test]
    fn budget_prompt_embeds_ceiling_list_and_context() {
        let context = vec![ContextProduct {
            name: "Rice".to_string(),
            price: 3000,
            shop: "Jumia".to_string(),
            link: "https://j/rice".to_string(),
            image: Some("https://img/rice".to_string()),
        }];
        let prompt = budget_system_prompt(10_000, "rice, beans", &context).unwrap();

        assert!(prompt.contains("Nigerian Market Expert"));
        assert!(prompt.contains("MUST NOT EXCEED ₦10,000"));
        assert!(prompt.contains("User's Shopping List: rice, beans"));
        assert!(prompt.contains(r#"[{"name":"Rice","price":3000,"shop":"Jumia","link":"https://j/rice","image":"https://img/rice"}]"#));
        assert!(prompt.contains("DO NOT MAKE UP PRODUCTS"));
        assert!(prompt.contains("\"remaining_budget\": 0"));
    }

    #[test]
    fn gift_prompt_mentions_interests_and_persona() {
        let prompt = gift_system_prompt(50_000, "football, music", &[]).unwrap();
        assert!(prompt.contains("gift personal shopper"));
        assert!(prompt.contains("Recipient Interests: football, music"));
        assert!(prompt.contains("overspend their ₦50,000"));
        assert!(prompt.contains("Available Products (Context):\n[]"));
        assert_eq!(
            gift_user_prompt("football, music"),
            "Find me the best gifts for someone interested in: football, music"
        );
    }
}
