use std::net::SocketAddr;
use std::sync::Arc;

use ethix_db::{CompanyStore, InMemoryCompanyStore, RestCompanyStore};
use ethix_llm::OpenAiClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ethix_api::config::{LogFormat, ServerConfig, StoreBackend};
use ethix_api::router::build_app_router;
use ethix_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env().unwrap_or_else(|e| panic!("Invalid configuration: {e}"));

    // --- Tracing ---
    init_tracing(config.log_format);
    tracing::info!(
        host = %config.host,
        port = %config.port,
        model = %config.model.model,
        api_key_set = config.api_key.is_some(),
        "Loaded server configuration",
    );
    if config.api_key.is_none() {
        tracing::warn!("API_KEY is not set; protected routes will answer 500");
    }

    // --- Store ---
    let store: Arc<dyn CompanyStore> = match &config.store {
        StoreBackend::Rest(rest) => {
            tracing::info!(base_url = %rest.base_url, table = %rest.table, "Using REST company store");
            Arc::new(RestCompanyStore::new(rest).expect("Failed to build store client"))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory company store; data is not persisted");
            Arc::new(InMemoryCompanyStore::new())
        }
    };

    // --- Model ---
    let model = Arc::new(
        OpenAiClient::new(config.model.clone()).expect("Failed to build model client"),
    );

    // --- App state ---
    let state = AppState::new(config.clone(), store, model);

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "ethix_api=debug,ethix_pipeline=debug,ethix_db=info,ethix_llm=info,tower_http=debug".into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
