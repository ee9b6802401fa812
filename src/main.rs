//! Labelscore HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use labelscore::cache::{FileCacheMirror, ResolutionCache};
use labelscore::config::Config;
use labelscore::gateway::{HandlerState, create_router_with_state};
use labelscore::pipeline::ScanPipeline;
use labelscore::resolver::{OpenFoodFactsClient, TieredIngredientResolver};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        external_enabled = config.external_enabled,
        persist_cache = config.persist_cache,
        "Labelscore starting"
    );

    let cache = Arc::new(ResolutionCache::with_limits(
        config.cache_max_entries,
        config.cache_ttl,
    ));

    let mut builder = TieredIngredientResolver::builder(cache)
        .cache_ttl(config.cache_ttl)
        .retry_policy(config.retry_policy())
        .external_timeout(config.external_timeout);

    if config.external_enabled {
        let client = OpenFoodFactsClient::new(config.nutrition_db_url.clone())?;
        tracing::info!(base_url = client.base_url(), "External nutrition database enabled");
        builder = builder.external(Arc::new(client));
    } else {
        tracing::warn!("External nutrition database disabled, unknown names use heuristics");
    }

    let storage_path = if config.persist_cache {
        std::fs::create_dir_all(&config.storage_path)?;
        builder = builder.mirror(Arc::new(FileCacheMirror::new(&config.storage_path)));
        Some(config.storage_path.clone())
    } else {
        None
    };

    let resolver = Arc::new(builder.build());

    tracing::info!("Hydrating resolution cache...");
    let restored = resolver.hydrate();
    tracing::info!(restored, "Hydration complete.");

    let pipeline = Arc::new(ScanPipeline::new(Arc::clone(&resolver)));
    let state = HandlerState::new(pipeline, storage_path, config.external_enabled);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal_with_dehydrate(resolver))
        .await?;

    tracing::info!("Labelscore shutdown complete");
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = std::env::var(Config::ENV_PORT)
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(client) = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    else {
        return 1;
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal_with_dehydrate(resolver: Arc<TieredIngredientResolver>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }

    tracing::info!("Dehydrating resolution cache...");
    resolver.dehydrate().await;
    tracing::info!("Dehydration complete.");
}
