use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

use crate::api::auth::Claims;
use crate::api::shared_state::AppState;
use crate::error_handling::{permission_denied, MonitorResult};
use crate::schemas::{FirewallLogCreate, LogFilter};
use crate::stats::DEFAULT_TOP_N;
use crate::types::{FirewallLogEntry, LogPage, LogStats, UserRole};

#[derive(Debug, Deserialize)]
pub struct StatsParams {
    #[serde(default)]
    pub top_n: Option<usize>,
}

pub fn log_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_logs).post(create_log))
        .route("/stats", get(get_stats))
        .route("/:id", get(get_log))
}

/// Viewers are read-only; recording log entries takes operator or admin.
fn require_operator(claims: &Claims) -> MonitorResult<()> {
    match claims.role {
        UserRole::Admin | UserRole::Operator => Ok(()),
        UserRole::Viewer => Err(permission_denied("operator role required")),
    }
}

#[instrument(skip(app_state, claims, payload))]
async fn create_log(
    State(app_state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<FirewallLogCreate>,
) -> MonitorResult<(StatusCode, Json<FirewallLogEntry>)> {
    require_operator(&claims)?;

    let entry = app_state.logs_engine.record_entry(payload)?;

    // Write-behind mirror, handler latency stays database-independent.
    let pg = app_state.postgres_persistence.clone();
    let entry_for_pg = entry.clone();
    tokio::spawn(async move {
        let pg_lock = pg.read().await;
        if let Some(pg_instance) = &*pg_lock {
            if let Err(e) = pg_instance.persist_log(&entry_for_pg).await {
                tracing::warn!("Failed to persist log entry to PostgreSQL: {}", e);
            }
        }
    });

    Ok((StatusCode::CREATED, Json(entry)))
}

async fn list_logs(
    State(app_state): State<Arc<AppState>>,
    Query(filter): Query<LogFilter>,
) -> MonitorResult<Json<LogPage>> {
    let page = app_state.logs_engine.query(&filter)?;
    Ok(Json(page))
}

async fn get_stats(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<StatsParams>,
) -> MonitorResult<Json<LogStats>> {
    let stats = app_state
        .logs_engine
        .stats(params.top_n.unwrap_or(DEFAULT_TOP_N))?;
    Ok(Json(stats))
}

async fn get_log(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> MonitorResult<Json<FirewallLogEntry>> {
    let entry = app_state.logs_engine.get_entry(id)?;
    Ok(Json(entry))
}
