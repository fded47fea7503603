use health_store_api::api::{self, AppState};
use health_store_api::config::AppConfig;
use health_store_api::llm::{OpenRouterClient, TextGenerator};
use health_store_api::matcher::RandomPicker;
use health_store_api::services::{ChatService, ProductService, SymptomChecker};
use health_store_api::storage::{
    ChatMessageRecord, JsonlStorage, ProductRepository, SymptomAnalysisRecord,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("🚀 Starting Health Store API Server");

    // Load configuration
    let config = AppConfig::load()?;
    info!("📋 Configuration loaded");
    info!("   - Model: {}", config.llm.model);
    info!("   - Model endpoint: {}", config.llm.base_url);
    info!("   - Server: {}:{}", config.server.host, config.server.port);

    // Initialize language model client
    let generator: Arc<dyn TextGenerator> = Arc::new(OpenRouterClient::new(&config.llm)?);
    info!("✅ Model client ready ({})", generator.model_name());

    // Initialize storage
    info!("💾 Initializing storage...");
    let products = Arc::new(ProductRepository::new(&config.storage.products_path));
    products.initialize()?;
    let analyses: Arc<JsonlStorage<SymptomAnalysisRecord>> =
        Arc::new(JsonlStorage::new(&config.storage.analyses_path));
    analyses.initialize()?;
    let chat_log: Arc<JsonlStorage<ChatMessageRecord>> =
        Arc::new(JsonlStorage::new(&config.storage.chat_log_path));
    chat_log.initialize()?;
    info!("✅ Storage ready ({} products)", products.count()?);

    // Create application state
    let state = AppState {
        products: Arc::new(ProductService::new(products.clone(), generator.clone())),
        chat: Arc::new(ChatService::new(products.clone(), generator.clone(), chat_log)),
        symptoms: Arc::new(SymptomChecker::new(
            products,
            generator,
            analyses,
            Arc::new(RandomPicker),
        )),
    };

    let app = api::router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📡 Available endpoints:");
    info!("   GET  /health           - Health check");
    info!("   GET  /products         - Search products (?query=&searchType=normal|ai)");
    info!("   POST /products         - Add a product");
    info!("   POST /products/seed    - Load sample catalog");
    info!("   POST /chat             - Chat with the assistant");
    info!("   POST /symptom-checker  - Analyze symptoms");
    info!("");
    info!("✨ Server is ready to accept requests!");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutting down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
