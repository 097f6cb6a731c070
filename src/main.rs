use std::sync::Arc;

use quote_gateway::{
    config::{Config, LogFormat},
    routes::app_router,
    services::{quotes::QuoteService, yahoo::YahooFinanceService},
    AppState,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (also reads .env)
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(config.log_format);

    tracing::info!("Using Yahoo Finance at {}", config.yahoo_base_url);
    let provider = YahooFinanceService::new(config.yahoo_base_url.clone(), config.provider_timeout)?;

    let state = AppState {
        quotes: QuoteService::new(Arc::new(provider), config.fetch_concurrency),
        list_limit: config.list_limit,
        service_name: config.service_name.clone(),
    };

    let app = app_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,quote_gateway=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
