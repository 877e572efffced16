use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use electo_db::repositories::SessionRepo;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use electo_api::assistant::DeepSeekChat;
use electo_api::config::ServerConfig;
use electo_api::router::build_app_router;
use electo_api::state::AppState;
use electo_api::ws;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "electo_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = electo_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    electo_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    electo_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Session cleanup ---
    let cleanup_handle = spawn_session_cleanup(pool.clone());

    // --- WebSocket manager ---
    let ws_manager = Arc::new(ws::WsManager::new());

    // --- Heartbeat ---
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&ws_manager));

    // --- Event bus ---
    let event_bus = Arc::new(electo_events::EventBus::default());
    tracing::info!("Event bus created");

    // --- Assistant backend ---
    let chat_model = match &config.assistant.api_key {
        Some(api_key) => {
            tracing::info!(model = %config.assistant.model, "Assistant backend configured");
            Some(Arc::new(DeepSeekChat::new(
                api_key.clone(),
                config.assistant.base_url.clone(),
                config.assistant.model.clone(),
            )) as Arc<dyn electo_api::assistant::ChatModel>)
        }
        None => {
            tracing::warn!("DEEPSEEK_API_KEY not set; assistant endpoint will report it");
            None
        }
    };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager: Arc::clone(&ws_manager),
        event_bus: Arc::clone(&event_bus),
        chat_model,
    };

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

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Drop the event bus sender to close the broadcast channel; per-socket
    // subscriptions end as their connections close below.
    drop(event_bus);

    let ws_count = ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    ws_manager.shutdown_all().await;

    heartbeat_handle.abort();
    cleanup_handle.abort();
    tracing::info!("Background tasks stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Interval between expired-session sweeps, in seconds.
const SESSION_CLEANUP_INTERVAL_SECS: u64 = 3600;

/// Spawn the background task that deletes expired and revoked sessions so
/// the table does not grow without bound.
fn spawn_session_cleanup(pool: electo_db::DbPool) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(SESSION_CLEANUP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            match SessionRepo::cleanup_expired(&pool).await {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "Expired sessions removed"),
                Err(e) => tracing::error!(error = %e, "Session cleanup failed"),
            }
        }
    })
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
