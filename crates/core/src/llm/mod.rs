pub mod error;
pub mod json;
pub mod openai;

/// One system instruction plus one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionInput {
    pub system: String,
    pub user: String,
}

#[async_trait::async_trait]
pub trait ChatCompletionClient: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Request a JSON-object completion and return the first choice's raw content.
    /// An absent content field comes back as an empty string.
    async fn complete_json(&self, input: CompletionInput) -> anyhow::Result<String>;
}
