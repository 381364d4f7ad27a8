use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use users_server::{
    config::Config,
    db,
    routes::{self, AppState},
    service::UserService,
    store::PgUserStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "users_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Config loaded");

    let pool = db::create_pool(&config.database_url, config.max_connections).await?;

    // store -> service -> handlers
    let store = Arc::new(PgUserStore::new(pool.clone()));
    let users = UserService::new(store);
    let shutdown = CancellationToken::new();
    let state = AppState::new(users, config.request_timeout, shutdown.clone());
    let app = routes::create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown, config.shutdown_grace))
        .await?;

    pool.close().await;
    tracing::info!("Server exited gracefully");

    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM. In-flight requests keep running; if they
/// have not drained after `grace`, their tokens are cancelled.
async fn shutdown_signal(token: CancellationToken, grace: std::time::Duration) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutting down server");
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        tracing::warn!("Shutdown grace elapsed, cancelling in-flight requests");
        token.cancel();
    });
}
