use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::instrument;

use crate::api::auth::Claims;
use crate::api::shared_state::AppState;
use crate::api::users::require_admin;
use crate::error_handling::MonitorResult;
use crate::schemas::{SettingCreate, SettingUpdate};
use crate::types::SystemSetting;

pub fn setting_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_settings).post(create_setting))
        .route("/:key", get(get_setting).put(update_setting))
}

async fn list_settings(
    State(app_state): State<Arc<AppState>>,
) -> MonitorResult<Json<Vec<SystemSetting>>> {
    Ok(Json(app_state.settings_engine.list_settings()?))
}

async fn get_setting(
    State(app_state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> MonitorResult<Json<SystemSetting>> {
    Ok(Json(app_state.settings_engine.get_setting(&key)?))
}

#[instrument(skip(app_state, claims, payload), fields(key = %payload.setting_key))]
async fn create_setting(
    State(app_state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SettingCreate>,
) -> MonitorResult<(StatusCode, Json<SystemSetting>)> {
    require_admin(&claims)?;

    let setting = app_state.settings_engine.create_setting(payload)?;
    mirror_setting_to_postgres(&app_state, setting.clone());

    Ok((StatusCode::CREATED, Json(setting)))
}

#[instrument(skip(app_state, claims, payload), fields(key = %key))]
async fn update_setting(
    State(app_state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(key): Path<String>,
    Json(payload): Json<SettingUpdate>,
) -> MonitorResult<Json<SystemSetting>> {
    require_admin(&claims)?;

    let setting = app_state.settings_engine.update_setting(&key, &payload)?;
    mirror_setting_to_postgres(&app_state, setting.clone());

    Ok(Json(setting))
}

fn mirror_setting_to_postgres(app_state: &AppState, setting: SystemSetting) {
    let pg = app_state.postgres_persistence.clone();
    tokio::spawn(async move {
        let pg_lock = pg.read().await;
        if let Some(pg_instance) = &*pg_lock {
            if let Err(e) = pg_instance.persist_setting(&setting).await {
                tracing::warn!("Failed to persist setting to PostgreSQL: {}", e);
            }
        }
    });
}
