use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prizeless_core::catalog::provider::HttpCatalogClient;
use prizeless_core::catalog::{self, CatalogOrigin};
use prizeless_core::domain::product::Product;
use prizeless_core::domain::recommendation::{RecommendationOutcome, RecommendationSet};
use prizeless_core::engine::{RecommendationEngine, BUDGET_ERROR, GIFT_ERROR};
use prizeless_core::filter;
use prizeless_core::llm::openai::OpenAiClient;
use prizeless_core::preferences::{AssistantPreferences, Theme};

#[derive(Debug, Parser)]
#[command(name = "prizeless")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List catalog products, optionally narrowed by a shopping query or gift interests.
    Products {
        #[arg(long, conflicts_with = "interests")]
        query: Option<String>,

        /// Comma-separated interests; requires --max-price.
        #[arg(long, requires = "max_price")]
        interests: Option<String>,

        #[arg(long)]
        max_price: Option<u64>,

        #[command(flatten)]
        source: ProductsSource,
    },

    /// Fit a shopping list into a budget.
    Budget {
        #[arg(long)]
        budget: u64,

        /// Free-text shopping list.
        #[arg(long)]
        list: String,

        #[command(flatten)]
        source: ProductsSource,
    },

    /// Suggest gifts for comma-separated interests within a budget.
    Gifts {
        #[arg(long)]
        interests: String,

        #[arg(long)]
        budget: u64,

        #[command(flatten)]
        source: ProductsSource,
    },

    /// Name the assistant and pick a theme, saved to a preferences file.
    Assistant {
        #[arg(long)]
        name: Option<String>,

        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,

        #[arg(long, default_value = "prizeless-preferences.json")]
        preferences: PathBuf,
    },
}

#[derive(Debug, clap::Args)]
struct ProductsSource {
    /// Read products from a JSON file instead of the catalog service.
    #[arg(long)]
    products_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = prizeless_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    match args.command {
        Command::Products {
            query,
            interests,
            max_price,
            source,
        } => {
            let products = load_products(&settings, &source).await?;
            let selected: Vec<&Product> = match (query, interests, max_price) {
                (Some(q), _, _) => filter::find_relevant_products(&q, &products),
                (None, Some(i), Some(m)) => filter::filter_gifts(&i, m, &products),
                _ => products.iter().collect(),
            };
            print_json(&selected)?;
        }
        Command::Budget {
            budget,
            list,
            source,
        } => {
            let products = load_products(&settings, &source).await?;
            let engine = engine(&settings)?;
            let result = engine.try_budget_optimization(budget, &list, &products).await;
            print_json(&into_outcome(result, BUDGET_ERROR))?;
        }
        Command::Gifts {
            interests,
            budget,
            source,
        } => {
            let products = load_products(&settings, &source).await?;
            let engine = engine(&settings)?;
            let result = engine.try_gift_recommendations(&interests, budget, &products).await;
            print_json(&into_outcome(result, GIFT_ERROR))?;
        }
        Command::Assistant {
            name,
            theme,
            preferences,
        } => {
            let prefs = update_preferences(&preferences, name.as_deref(), theme.map(Theme::from))?;
            tracing::info!(path = %preferences.display(), "saved assistant preferences");
            print_json(&prefs)?;
        }
    }

    Ok(())
}

async fn load_products(
    settings: &prizeless_core::config::Settings,
    source: &ProductsSource,
) -> anyhow::Result<Vec<Product>> {
    if let Some(path) = &source.products_file {
        return read_products_file(path);
    }

    let client = HttpCatalogClient::from_settings(settings)?;
    let catalog = catalog::fetch_all_products(&client).await;
    if let CatalogOrigin::Fallback(reason) = &catalog.origin {
        tracing::warn!(%reason, "using sample products");
    }
    Ok(catalog.products)
}

fn read_products_file(path: &Path) -> anyhow::Result<Vec<Product>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read products file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("products file {} is not a JSON product list", path.display()))
}

fn engine(settings: &prizeless_core::config::Settings) -> anyhow::Result<RecommendationEngine> {
    let client = OpenAiClient::from_settings(settings)?;
    Ok(RecommendationEngine::new(Arc::new(client)))
}

fn into_outcome(result: anyhow::Result<RecommendationSet>, message: &str) -> RecommendationOutcome {
    match result {
        Ok(set) => RecommendationOutcome::Ok(set),
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %format!("{err:#}"), "{message}");
            RecommendationOutcome::Failed {
                error: message.to_string(),
            }
        }
    }
}

fn update_preferences(
    path: &Path,
    name: Option<&str>,
    theme: Option<Theme>,
) -> anyhow::Result<AssistantPreferences> {
    let mut prefs = AssistantPreferences::load(path)?;
    if let Some(name) = name {
        prefs.assistant_name = prizeless_core::preferences::normalize_assistant_name(name);
    }
    if let Some(theme) = theme {
        prefs.theme = theme;
    }
    prefs.save(path)?;
    Ok(prefs)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{text}");
    Ok(())
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
