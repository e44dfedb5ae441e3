pub mod catalog;
pub mod domain;
pub mod engine;
pub mod filter;
pub mod llm;
pub mod preferences;

pub mod config {
    use anyhow::Context;

    pub const DEFAULT_CATALOG_BASE_URL: &str = "https://api.prizeless.ng/v1";

    #[derive(Debug, Clone, Default)]
    pub struct Settings {
        pub openai_api_key: Option<String>,
        pub catalog_base_url: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                openai_api_key: std::env::var("OPENAI_API_KEY")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                catalog_base_url: Some(
                    std::env::var("CATALOG_BASE_URL")
                        .ok()
                        .filter(|s| !s.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_CATALOG_BASE_URL.to_string()),
                ),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_openai_api_key(&self) -> anyhow::Result<&str> {
            self.openai_api_key
                .as_deref()
                .context("OPENAI_API_KEY is required")
        }

        pub fn require_catalog_base_url(&self) -> anyhow::Result<&str> {
            self.catalog_base_url
                .as_deref()
                .context("CATALOG_BASE_URL is required")
        }
    }
}
