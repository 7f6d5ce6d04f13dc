//! Control service: a minimal HTTP front end over the relay.
//!
//! ## Endpoints
//!
//! - `GET /`: current state page (ON/OFF)
//! - `GET /on`, `GET /off`: switch, then redirect to `/`
//! - `GET /api/latest_runs`: last 5 program runs, newest first
//! - `GET /api/on_since`: start of the open on-session, or null

pub mod handlers;
mod page;

use crate::core::relay::Relay;
use crate::db::store::Store;
use crate::errors::{AppError, AppResult};
use axum::Router;
use axum::routing::get;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::TcpListener;
use tracing::info;

/// Number of runs listed by `/api/latest_runs`.
pub const LATEST_RUNS_LIMIT: usize = 5;

#[derive(Clone)]
pub struct AppState {
    relay: Arc<Mutex<Relay>>,
    store: Store,
}

impl AppState {
    pub fn new(relay: Relay) -> Self {
        let store = relay.store().clone();
        Self {
            relay: Arc::new(Mutex::new(relay)),
            store,
        }
    }

}

fn lock(relay: &Mutex<Relay>) -> MutexGuard<'_, Relay> {
    relay.lock().unwrap_or_else(|e| e.into_inner())
}

/// Run pin and SQLite work on the blocking pool. A writer in the other
/// process can hold the file for up to the busy timeout.
async fn blocking<T, F>(work: F) -> AppResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Http(format!("blocking task failed: {e}")))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/on", get(handlers::turn_on))
        .route("/off", get(handlers::turn_off))
        .route("/api/latest_runs", get(handlers::latest_runs))
        .route("/api/on_since", get(handlers::on_since))
        .with_state(state)
}

/// Serve until Ctrl-C / SIGINT.
pub async fn serve(bind: &str, relay: Relay) -> AppResult<()> {
    let listener = TcpListener::bind(bind)
        .await
        .map_err(|e| AppError::Http(format!("cannot bind {bind}: {e}")))?;
    info!(addr = %listener.local_addr()?, "control service listening");

    axum::serve(listener, router(AppState::new(relay)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("control service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
