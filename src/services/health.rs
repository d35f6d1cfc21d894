use axum::{extract::State, response::Json, routing::get, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::roster::{RosterStats, RosterStore};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub roster: RosterHealth,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RosterHealth {
    pub status: String,
    pub chats: usize,
    pub members: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RosterStore>,
    pub start_time: DateTime<Utc>,
}

/// Keep-alive endpoint for external uptime monitors.
pub struct HealthService {
    pub router: Router,
}

impl HealthService {
    pub fn new(store: Arc<RosterStore>) -> Self {
        let state = AppState {
            store,
            start_time: Utc::now(),
        };

        let router = Router::new()
            .route("/", get(root))
            .route("/health", get(health_check))
            .route("/health/live", get(liveness_check))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        Self { router }
    }
}

async fn root() -> &'static str {
    "alive"
}

// Always 200: a roster that failed to persist is degraded, not down.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let RosterStats { chats, members } = state.store.stats();
    let roster_status = if state.store.last_persist_ok() {
        "healthy"
    } else {
        "degraded"
    };
    let uptime = Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds()
        .max(0) as u64;

    Json(HealthResponse {
        status: roster_status.to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        roster: RosterHealth {
            status: roster_status.to_string(),
            chats,
            members,
        },
        uptime_seconds: uptime,
    })
}

async fn liveness_check() -> Json<&'static str> {
    Json("alive")
}
