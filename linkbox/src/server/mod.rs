//! HTTP interface.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check with the crate version |
//! | `GET`  | `/api/bookmarks` | Every stored bookmark, `?category=` filters |
//! | `GET`  | `/api/bookmarks/{id}` | One bookmark, 404 if absent |
//! | `GET`  | `/api/categories` | Categories in use |
//! | `POST` | `/api/bookmarks` | Create one bookmark for the caller |
//! | `POST` | `/api/bookmarks/import` | Validate and store a batch for the caller |
//!
//! Errors are `{"error": "<message>"}`. Mutating routes need the `X-User-Id`
//! header and answer 401 without it. Import bodies may be up to
//! `server.import_body_limit` bytes, other bodies up to axum's 2 MB default;
//! larger bodies get 413.

pub mod caller;
pub mod error;
pub mod handlers;

use crate::application::services::{BookmarkService, ImportService};
use crate::config::{ServerOpts, DEFAULT_IMPORT_BODY_LIMIT};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Services shared by every handler
#[derive(Clone, Debug)]
pub struct AppState {
    pub bookmark_service: Arc<dyn BookmarkService>,
    pub import_service: Arc<dyn ImportService>,
}

pub fn router(state: AppState) -> Router {
    router_with_body_limit(state, DEFAULT_IMPORT_BODY_LIMIT)
}

/// Router whose import route accepts bodies up to `import_body_limit` bytes
pub fn router_with_body_limit(state: AppState, import_body_limit: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/bookmarks",
            get(handlers::list_bookmarks).post(handlers::create_bookmark),
        )
        .route("/api/bookmarks/{id}", get(handlers::get_bookmark))
        .route("/api/categories", get(handlers::list_categories))
        .route(
            "/api/bookmarks/import",
            post(handlers::import_bookmarks).layer(DefaultBodyLimit::max(import_body_limit)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind `opts.bind` and serve until Ctrl-C
pub async fn run_server(opts: &ServerOpts, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(&opts.bind).await?;
    let app = router_with_body_limit(state.clone(), opts.import_body_limit);
    serve_router(listener, app, &state, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state.clone());
    serve_router(listener, app, &state, shutdown).await
}

/// Serve a prepared router, e.g. one with a custom body limit
pub async fn serve_router<F>(
    listener: TcpListener,
    app: Router,
    state: &AppState,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(
        "linkbox server listening on http://{} (import policy: {})",
        listener.local_addr()?,
        state.import_service.policy()
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
