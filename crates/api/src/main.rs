use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use prizeless_core::catalog::provider::{CatalogSource, HttpCatalogClient};
use prizeless_core::catalog::{self, Catalog, CatalogOrigin};
use prizeless_core::domain::product::Product;
use prizeless_core::domain::recommendation::{RecommendationOutcome, RecommendationSet};
use prizeless_core::engine::{RecommendationEngine, BUDGET_ERROR, GIFT_ERROR};
use prizeless_core::filter;
use prizeless_core::llm::openai::OpenAiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = prizeless_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let catalog_source: Arc<dyn CatalogSource> = Arc::new(HttpCatalogClient::from_settings(&settings)?);

    let engine = match OpenAiClient::from_settings(&settings) {
        Ok(client) => Some(RecommendationEngine::new(Arc::new(client))),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "LLM client unavailable; starting API in degraded mode");
            None
        }
    };

    let state = AppState {
        catalog: catalog_source,
        engine,
    };

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/products", get(get_products))
        .route("/products/relevant", post(post_relevant_products))
        .route("/products/gifts", post(post_gift_products))
        .route("/recommendations/budget", post(post_budget_recommendations))
        .route("/recommendations/gifts", post(post_gift_recommendations))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    catalog: Arc<dyn CatalogSource>,
    engine: Option<RecommendationEngine>,
}

impl AppState {
    /// Caller-supplied products win; otherwise load the catalog for this request.
    async fn products_or_catalog(&self, supplied: Option<Vec<Product>>) -> Vec<Product> {
        match supplied {
            Some(products) => products,
            None => catalog::fetch_all_products(self.catalog.as_ref()).await.products,
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiCatalog {
    source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback_reason: Option<String>,
    products: Vec<Product>,
}

impl From<Catalog> for ApiCatalog {
    fn from(catalog: Catalog) -> Self {
        let (source, fallback_reason) = match catalog.origin {
            CatalogOrigin::Live => ("live", None),
            CatalogOrigin::Fallback(reason) => ("fallback", Some(reason.to_string())),
        };
        Self {
            source,
            fallback_reason,
            products: catalog.products,
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiRecommendation {
    request_id: Uuid,
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    outcome: RecommendationOutcome,
}

impl ApiRecommendation {
    fn new(outcome: RecommendationOutcome) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            outcome,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RelevantRequest {
    query: String,
    #[serde(default)]
    products: Option<Vec<Product>>,
}

#[derive(Debug, Deserialize)]
struct GiftFilterRequest {
    interests: String,
    max_price: u64,
    #[serde(default)]
    products: Option<Vec<Product>>,
}

#[derive(Debug, Deserialize)]
struct BudgetRequest {
    budget: u64,
    shopping_list: String,
    #[serde(default)]
    products: Option<Vec<Product>>,
}

#[derive(Debug, Deserialize)]
struct GiftRequest {
    interests: String,
    budget: u64,
    #[serde(default)]
    products: Option<Vec<Product>>,
}

async fn get_products(State(state): State<AppState>) -> Json<ApiCatalog> {
    Json(catalog::fetch_all_products(state.catalog.as_ref()).await.into())
}

async fn post_relevant_products(
    State(state): State<AppState>,
    Json(req): Json<RelevantRequest>,
) -> Json<Vec<Product>> {
    let products = state.products_or_catalog(req.products).await;
    let found = filter::find_relevant_products(&req.query, &products)
        .into_iter()
        .cloned()
        .collect();
    Json(found)
}

async fn post_gift_products(
    State(state): State<AppState>,
    Json(req): Json<GiftFilterRequest>,
) -> Json<Vec<Product>> {
    let products = state.products_or_catalog(req.products).await;
    let found = filter::filter_gifts(&req.interests, req.max_price, &products)
        .into_iter()
        .cloned()
        .collect();
    Json(found)
}

async fn post_budget_recommendations(
    State(state): State<AppState>,
    Json(req): Json<BudgetRequest>,
) -> Result<Json<ApiRecommendation>, StatusCode> {
    let Some(engine) = &state.engine else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let products = state.products_or_catalog(req.products).await;
    let result = engine
        .try_budget_optimization(req.budget, &req.shopping_list, &products)
        .await;

    Ok(Json(ApiRecommendation::new(into_outcome(result, BUDGET_ERROR))))
}

async fn post_gift_recommendations(
    State(state): State<AppState>,
    Json(req): Json<GiftRequest>,
) -> Result<Json<ApiRecommendation>, StatusCode> {
    let Some(engine) = &state.engine else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let products = state.products_or_catalog(req.products).await;
    let result = engine
        .try_gift_recommendations(&req.interests, req.budget, &products)
        .await;

    Ok(Json(ApiRecommendation::new(into_outcome(result, GIFT_ERROR))))
}

fn into_outcome(result: anyhow::Result<RecommendationSet>, message: &str) -> RecommendationOutcome {
    match result {
        Ok(set) => RecommendationOutcome::Ok(set),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %format!("{e:#}"), "{message}");
            RecommendationOutcome::Failed {
                error: message.to_string(),
            }
        }
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &prizeless_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
