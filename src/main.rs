use std::sync::Arc;

use tokio::signal;
use tracing::info;

use tavola_api::repositories::InMemoryStore;
use tavola_api::{app, config, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::load_config()?;
    config::init_tracing(&cfg.log_level, cfg.log_json);

    let store = Arc::new(InMemoryStore::new());
    let state = AppState::build(cfg.clone(), store);

    state.scheduler().spawn();

    let addr = cfg.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, environment = %cfg.environment, "tavola-api listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.ok();
    };
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
