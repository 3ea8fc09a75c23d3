use axum::{
    routing::{get, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

use database::{ensure_schema, Database, PropertyRepository};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub repo: PropertyRepository,
}

/// Assembles the application router with its routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    // The API is consumed by browser frontends served from anywhere, so
    // CORS is wide open. No credentials are involved.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/properties",
            get(handlers::list_properties).post(handlers::create_property),
        )
        .route(
            "/properties/:id",
            put(handlers::update_property).delete(handlers::delete_property),
        )
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
///
/// Builds the lazy connection pool, makes sure the schema exists, and
/// serves until the process is asked to stop. The pool is closed after
/// the listener winds down.
pub async fn run_server(settings: configuration::Settings) -> anyhow::Result<()> {
    let db = Arc::new(Database::connect_lazy(&settings.database)?);

    // A failed initialization must not take the service down: /health
    // stays reachable and data endpoints report their own storage
    // errors. The common causes (database asleep, transient network)
    // resolve themselves, and the statement is idempotent anyway.
    if let Err(err) = ensure_schema(&db).await {
        tracing::error!(error = ?err, "Schema initialization failed; continuing startup.");
    }

    let repo = PropertyRepository::new(Arc::clone(&db));
    let app_state = Arc::new(AppState { repo });
    let app = build_router(app_state);

    let addr: SocketAddr = format!("{}:{}", settings.http.host, settings.http.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("Connection pool closed. Shutdown complete.");

    Ok(())
}

/// Resolves when the process receives Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
