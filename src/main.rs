//! Fieldtalk server binary.
//!
//! Wires the configuration, experiment catalog, storage adapters, and
//! generation provider into the orchestrator and serves the HTTP API.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tracing_subscriber::EnvFilter;

use fieldtalk::adapters::catalog::YamlExperimentCatalog;
use fieldtalk::adapters::generation::{
    AnthropicConfig, AnthropicProvider, OpenAiConfig, OpenAiProvider,
};
use fieldtalk::adapters::http::api_routes;
use fieldtalk::adapters::registry::InMemorySessionRegistry;
use fieldtalk::adapters::store::{InMemoryConversationStore, JsonlConversationStore};
use fieldtalk::application::{GenerationSettings, Interviewer};
use fieldtalk::config::{AppConfig, ProviderKind};
use fieldtalk::ports::{ConversationStore, GenerationProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    config.validate()?;

    let catalog = Arc::new(YamlExperimentCatalog::load_dir(&config.experiments.dir));
    if catalog.is_empty() {
        tracing::warn!(
            dir = %config.experiments.dir.display(),
            "no experiment definitions loaded"
        );
    } else {
        tracing::info!(
            count = catalog.len(),
            dir = %config.experiments.dir.display(),
            "experiment catalog loaded"
        );
    }

    let registry = Arc::new(InMemorySessionRegistry::new());

    let store: Arc<dyn ConversationStore> = match &config.experiments.data_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "using JSONL conversation store");
            Arc::new(JsonlConversationStore::new(dir.clone()))
        }
        None => Arc::new(InMemoryConversationStore::new()),
    };

    let provider = build_provider(&config)?;
    tracing::info!(provider = provider.name(), "generation provider ready");

    let interviewer = Arc::new(
        Interviewer::new(catalog, registry, store, provider).with_settings(GenerationSettings {
            temperature: config.generation.temperature,
            max_tokens: config.generation.max_tokens,
        }),
    );

    let app = api_routes(interviewer)
        .layer(cors_layer(&config))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, "starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the CORS layer: restricted to the configured origins, permissive
/// when none are configured.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Builds the configured generation provider.
fn build_provider(
    config: &AppConfig,
) -> Result<Arc<dyn GenerationProvider>, Box<dyn std::error::Error>> {
    let generation = &config.generation;

    let provider: Arc<dyn GenerationProvider> = match generation.provider {
        ProviderKind::OpenAI => {
            let api_key = generation
                .openai_api_key
                .clone()
                .ok_or("OPENAI_API_KEY is required for the openai provider")?;
            let mut provider_config =
                OpenAiConfig::new(api_key).with_timeout(generation.timeout());
            if let Some(model) = &generation.model {
                provider_config = provider_config.with_model(model.clone());
            }
            Arc::new(OpenAiProvider::new(provider_config)?)
        }
        ProviderKind::Anthropic => {
            let api_key = generation
                .anthropic_api_key
                .clone()
                .ok_or("ANTHROPIC_API_KEY is required for the anthropic provider")?;
            let mut provider_config =
                AnthropicConfig::new(api_key).with_timeout(generation.timeout());
            if let Some(model) = &generation.model {
                provider_config = provider_config.with_model(model.clone());
            }
            Arc::new(AnthropicProvider::new(provider_config)?)
        }
    };

    Ok(provider)
}
