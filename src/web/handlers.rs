use super::{AppState, LATEST_RUNS_LIMIT, blocking, lock, page};
use crate::core::relay::{Source, Transition};
use crate::db::models::ScheduledRun;
use crate::errors::AppResult;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, Redirect};
use serde::Serialize;
use tracing::{error, info, warn};

#[derive(Debug, Serialize)]
pub struct LatestRuns {
    pub latest_runs: Vec<ScheduledRun>,
}

#[derive(Debug, Serialize)]
pub struct OnSince {
    pub on_since: Option<i64>,
}

fn internal_error(route: &'static str, e: impl std::fmt::Display) -> StatusCode {
    error!(route, error = %e, "request failed");
    StatusCode::INTERNAL_SERVER_ERROR
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let relay = state.relay.clone();
    let current = blocking(move || lock(&relay).state())
        .await
        .map_err(|e| internal_error("/", e))?;

    info!(route = "/", state = %current, "request");
    Ok(Html(page::render_index(current)))
}

async fn switch(state: AppState, on: bool) -> AppResult<Transition> {
    let relay = state.relay.clone();
    blocking(move || {
        let mut relay = lock(&relay);
        if on {
            relay.turn_on(Source::Manual)
        } else {
            relay.turn_off(Source::Manual)
        }
    })
    .await
}

pub async fn turn_on(State(state): State<AppState>) -> Result<Redirect, StatusCode> {
    let transition = switch(state, true)
        .await
        .map_err(|e| internal_error("/on", e))?;

    info!(route = "/on", switched = transition.switched(), "request");
    Ok(Redirect::to("/"))
}

pub async fn turn_off(State(state): State<AppState>) -> Result<Redirect, StatusCode> {
    let transition = switch(state, false)
        .await
        .map_err(|e| internal_error("/off", e))?;

    info!(route = "/off", switched = transition.switched(), "request");
    Ok(Redirect::to("/"))
}

/// Read failures degrade to an empty list.
pub async fn latest_runs(State(state): State<AppState>) -> Json<LatestRuns> {
    let store = state.store.clone();
    let latest_runs = match blocking(move || store.latest_runs(LATEST_RUNS_LIMIT)).await {
        Ok(Ok(runs)) => runs,
        Ok(Err(e)) | Err(e) => {
            warn!(error = %e, "could not load latest runs");
            Vec::new()
        }
    };

    info!(route = "/api/latest_runs", count = latest_runs.len(), "request");
    Json(LatestRuns { latest_runs })
}

/// Read failures degrade to null.
pub async fn on_since(State(state): State<AppState>) -> Json<OnSince> {
    let store = state.store.clone();
    let on_since = match blocking(move || store.current_session()).await {
        Ok(Ok(session)) => session.map(|s| s.on_since),
        Ok(Err(e)) | Err(e) => {
            warn!(error = %e, "could not load on-session");
            None
        }
    };

    info!(route = "/api/on_since", ?on_since, "request");
    Json(OnSince { on_since })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::core::relay::Relay;
    use crate::db::store::Store;
    use crate::hw::{Level, PinDriver, RelayPin, SimulatedPin};
    use axum::response::IntoResponse;
    use chrono::{Local, TimeZone};
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    const SWITCHED_AT: i64 = 1_780_000_000;

    fn state_with(store: Store) -> (AppState, SimulatedPin) {
        let raw = SimulatedPin::new();
        let pin: Box<dyn PinDriver> = Box::new(raw.clone());
        let clock = Arc::new(ManualClock::new(Local.timestamp_opt(SWITCHED_AT, 0).unwrap()));
        let relay = Relay::new(RelayPin::initialize(pin), store, clock);
        (AppState::new(relay), raw)
    }

    fn temp_state() -> (TempDir, AppState, SimulatedPin) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("relay.sqlite").to_string_lossy().to_string());
        store.ensure_schema().unwrap();
        let (state, raw) = state_with(store);
        (dir, state, raw)
    }

    #[tokio::test]
    async fn index_shows_state() {
        let (_dir, state, _raw) = temp_state();

        let Html(body) = index(State(state.clone())).await.unwrap();
        assert!(body.contains("Relay is <span style=\"color: #c62828\">OFF</span>"));

        turn_on(State(state.clone())).await.unwrap();
        let Html(body) = index(State(state)).await.unwrap();
        assert!(body.contains(">ON</span>"));
    }

    #[tokio::test]
    async fn on_and_off_redirect_home() {
        let (_dir, state, raw) = temp_state();

        let resp = turn_on(State(state.clone())).await.into_response();
        assert!(resp.status().is_redirection());
        assert_eq!(resp.headers()["location"], "/");
        assert_eq!(raw.level(), Level::Low);

        let resp = turn_off(State(state)).await.into_response();
        assert!(resp.status().is_redirection());
        assert_eq!(raw.level(), Level::High);
    }

    #[tokio::test]
    async fn on_since_follows_session() {
        let (_dir, state, _raw) = temp_state();

        let Json(body) = on_since(State(state.clone())).await;
        assert_eq!(body.on_since, None);

        turn_on(State(state.clone())).await.unwrap();
        let Json(body) = on_since(State(state.clone())).await;
        assert_eq!(body.on_since, Some(SWITCHED_AT));

        turn_off(State(state.clone())).await.unwrap();
        turn_off(State(state.clone())).await.unwrap();
        let Json(body) = on_since(State(state)).await;
        assert_eq!(body.on_since, None);
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"on_since":null}"#
        );
    }

    #[tokio::test]
    async fn latest_runs_lists_five_newest() {
        let (_dir, state, _raw) = temp_state();
        for start in [10, 50, 20, 40, 30, 60] {
            state
                .store
                .record_run(&ScheduledRun {
                    start,
                    end: start + 720,
                })
                .unwrap();
        }

        let Json(body) = latest_runs(State(state)).await;
        let starts: Vec<i64> = body.latest_runs.iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![60, 50, 40, 30, 20]);

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["latest_runs"][0]["start"], 60);
        assert_eq!(json["latest_runs"][0]["end"], 780);
    }

    #[tokio::test]
    async fn read_endpoints_degrade_when_store_is_gone() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing").join("relay.sqlite");
        let (state, _raw) = state_with(Store::new(missing.to_string_lossy().to_string()));

        let Json(runs) = latest_runs(State(state.clone())).await;
        assert!(runs.latest_runs.is_empty());

        let Json(since) = on_since(State(state)).await;
        assert_eq!(since.on_since, None);
    }

    #[tokio::test]
    async fn switching_waits_off_the_async_worker_while_the_file_is_locked() {
        let (dir, state, raw) = temp_state();

        // The other process holds the database for a while.
        let other = rusqlite::Connection::open(dir.path().join("relay.sqlite")).unwrap();
        other.execute_batch("BEGIN EXCLUSIVE;").unwrap();

        let started = Instant::now();
        let pending = tokio::spawn(turn_on(State(state.clone())));
        tokio::task::yield_now().await;
        assert!(
            started.elapsed() < Duration::from_secs(2),
            "the runtime thread was blocked by the locked database"
        );

        other.execute_batch("COMMIT;").unwrap();
        pending.await.unwrap().unwrap();

        assert_eq!(raw.level(), Level::Low);
        let Json(body) = on_since(State(state)).await;
        assert_eq!(body.on_since, Some(SWITCHED_AT));
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn every_route_logs_its_request() {
        let (_dir, state, _raw) = temp_state();
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        index(State(state.clone())).await.unwrap();
        turn_on(State(state.clone())).await.unwrap();
        turn_off(State(state.clone())).await.unwrap();
        latest_runs(State(state.clone())).await;
        on_since(State(state)).await;

        let out = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        for route in ["/", "/on", "/off", "/api/latest_runs", "/api/on_since"] {
            assert!(
                out.contains(&format!("route=\"{route}\"")),
                "no log line for {route}:\n{out}"
            );
        }
    }

    #[test]
    fn router_builds() {
        let (_dir, state, _raw) = temp_state();
        let _ = crate::web::router(state);
    }
}
