use hostel_gate::{
    AppState,
    auth_api::{AuthServiceState, HttpAuthService},
    config::{AppConfig, Env},
    create_router,
    session::{Session, SessionHandle},
    storage::{FileStorage, StorageState},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, sets up logging, builds the session over durable storage and
/// the backend client, starts restoring the persisted session, and serves the views.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hostel_gate=debug,tower_http=info,axum=trace".into());

    // 3. Pretty logs locally, JSON in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Gateway starting in {:?} mode", config.env);

    // 4. Collaborators: durable storage and the backend's auth endpoints.
    let storage = Arc::new(FileStorage::new(config.session_file.clone())) as StorageState;
    let auth = match HttpAuthService::new(&config.api_base_url, config.api_timeout) {
        Ok(client) => Arc::new(client) as AuthServiceState,
        Err(e) => {
            tracing::error!(error = %e, "FATAL: Failed to build backend client");
            std::process::exit(1);
        }
    };
    tracing::info!(api = %config.api_base_url, session_file = %config.session_file.display(), "Collaborators ready");

    // 5. Session: restored in the background while the server comes up. Navigations that
    // arrive first are answered with the loading placeholder.
    let session: SessionHandle = Arc::new(Session::new(storage, auth));
    let restoring = session.clone();
    tokio::task::spawn_blocking(move || restoring.initialize());

    // 6. Router and Server Startup
    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState::new(session, config));

    let listener = match TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %bind_addr, error = %e, "FATAL: Failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at: http://{}/swagger-ui", bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server terminated");
    }
}
