use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

use crate::api::auth::{mirror_user_to_postgres, Claims};
use crate::api::shared_state::AppState;
use crate::error_handling::{permission_denied, MonitorResult};
use crate::schemas::UserUpdate;
use crate::types::{User, UserRole};

/// Public view of a user account; the credential hash never leaves the
/// storage layer.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

pub fn require_admin(claims: &Claims) -> MonitorResult<()> {
    if claims.role != UserRole::Admin {
        return Err(permission_denied("admin role required"));
    }
    Ok(())
}

pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_users))
        .route("/:id", get(get_user).put(update_user))
}

async fn list_users(
    State(app_state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> MonitorResult<Json<Vec<UserResponse>>> {
    require_admin(&claims)?;

    let users = app_state.users_engine.list_users()?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Admins may read any account; everyone else only their own.
async fn get_user(
    State(app_state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> MonitorResult<Json<UserResponse>> {
    if claims.role != UserRole::Admin && claims.sub != id {
        return Err(permission_denied("cannot read other accounts"));
    }

    let user = app_state.users_engine.get_user(id)?;
    Ok(Json(UserResponse::from(user)))
}

#[instrument(skip(app_state, claims, payload), fields(user_id = id))]
async fn update_user(
    State(app_state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> MonitorResult<Json<UserResponse>> {
    require_admin(&claims)?;

    let user = app_state
        .users_engine
        .update_user(id, &payload, &app_state.password_hasher)?;

    mirror_user_to_postgres(&app_state, user.clone());

    Ok(Json(UserResponse::from(user)))
}
