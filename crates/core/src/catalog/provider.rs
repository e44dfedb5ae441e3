use crate::catalog::types::CatalogResponse;
use crate::catalog::FallbackReason;
use crate::config::Settings;
use anyhow::{Context, Result};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PATH: &str = "/products/all";

#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn fetch_catalog(&self) -> std::result::Result<CatalogResponse, FallbackReason>;
}

#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: String,
    path: String,
}

impl HttpCatalogClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_catalog_base_url()?.to_string();

        let timeout_secs = std::env::var("CATALOG_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let path = std::env::var("CATALOG_PRODUCTS_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PATH.to_string());

        Self::new(base_url, path, Duration::from_secs(timeout_secs))
    }

    pub fn new(base_url: impl Into<String>, path: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build catalog http client")?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            path: path.into(),
        })
    }

    fn url(&self) -> String {
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };

        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait::async_trait]
impl CatalogSource for HttpCatalogClient {
    fn source_name(&self) -> &'static str {
        "catalog_http_json"
    }

    async fn fetch_catalog(&self) -> std::result::Result<CatalogResponse, FallbackReason> {
        let res = self
            .http
            .get(self.url())
            .send()
            .await
            .map_err(|e| FallbackReason::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(FallbackReason::HttpStatus(status.as_u16()));
        }

        let text = res
            .text()
            .await
            .map_err(|e| FallbackReason::Transport(e.to_string()))?;

        serde_json::from_str::<CatalogResponse>(&text)
            .map_err(|e| FallbackReason::Decode(e.to_string()))
    }
}
