pub mod api; // HTTP router, endpoints, server lifecycle
pub mod config;
pub mod engine; // Rule-based symptom predictor + report analyzer
pub mod history; // In-memory assessment history
pub mod upstream; // Optional hosted-model adapter

use tracing_subscriber::EnvFilter;

use crate::api::{start_server, ApiContext, ServerError};
use crate::config::{ConfigError, ServiceConfig, UpstreamConfig};
use crate::engine::AssessmentService;
use crate::history::HistoryStore;
use crate::upstream::{ChatCompletionClient, RemoteModel, UpstreamError};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Server(#[from] ServerError),
    #[error("Failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Build the assessment service. A remote model is placed in front of the
/// local rule engine only when it is configured and its client builds.
pub fn build_service(upstream: Option<&UpstreamConfig>) -> AssessmentService {
    let Some(cfg) = upstream else {
        tracing::info!("No upstream API key configured, using local rule engine only");
        return AssessmentService::local_only();
    };

    match remote_model(cfg) {
        Ok(remote) => {
            tracing::info!(model = %cfg.model, url = %cfg.url, "Upstream model enabled");
            AssessmentService::with_remote(Box::new(remote))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Upstream client unavailable, using local rule engine only");
            AssessmentService::local_only()
        }
    }
}

fn remote_model(cfg: &UpstreamConfig) -> Result<RemoteModel<ChatCompletionClient>, UpstreamError> {
    let client = ChatCompletionClient::new(&cfg.url, &cfg.api_key, &cfg.model, cfg.timeout_secs)?;
    Ok(RemoteModel::new(client, config::UPSTREAM_MODEL_TAG))
}

pub fn run() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = ServiceConfig::from_env()?;

    // The blocking HTTP client must be created and dropped outside the async
    // runtime; `ctx` outlives the runtime below.
    let ctx = ApiContext::new(
        build_service(config.upstream.as_ref()),
        HistoryStore::new(config.history_capacity),
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let server = start_server(ctx.clone(), config.bind_addr).await?;
        tracing::info!(addr = %server.session.server_addr, "Listening");

        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {e}");
        }
        server.stop().await;
        Ok::<(), StartupError>(())
    })?;

    drop(runtime);
    drop(ctx);
    Ok(())
}
