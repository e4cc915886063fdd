//! HTTP front end for the mood journal.
//!
//! Routes render JSON; successful form posts redirect to the listing.

pub mod error;
pub mod handlers;
pub mod identity;

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::Result;
use crate::storage::SqliteStore;
use crate::tracker::CollisionPolicy;

pub use error::ErrorResponse;
pub use identity::{CurrentUser, USER_HEADER};

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<SqliteStore>>,
    pub collision: CollisionPolicy,
}

impl AppState {
    pub fn new(store: SqliteStore, collision: CollisionPolicy) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            collision,
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/create", get(handlers::create_form).post(handlers::create))
        .route("/{id}/update", get(handlers::update_form).post(handlers::update))
        .route("/{id}/delete", post(handlers::delete))
        .route("/tracker", get(handlers::tracker))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity::attach_user,
        ))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Open the configured database and serve until Ctrl-C.
pub async fn serve(config: Config) -> Result<()> {
    let store = SqliteStore::open(&config.db_path)?;
    let app = router(AppState::new(store, config.collision));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(
        addr = %config.addr,
        db = %config.db_path.display(),
        collision = %config.collision,
        "moodlog listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("moodlog stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
