use axum::{
    extract::{Extension, State},
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

use crate::api::shared_state::AppState;
use crate::api::users::UserResponse;
use crate::auth_middleware::jwt_auth_middleware;
use crate::error_handling::{internal_error, MonitorError, MonitorResult};
use crate::schemas::{UserCreate, UserLogin};
use crate::types::{User, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub role: UserRole,
    pub exp: usize,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i64,
    pub role: UserRole,
    pub expires_at: i64,
}

/// Issues a signed HS256 token for the given user.
pub fn generate_token(user: &User, secret_key: &str, expire_minutes: i64) -> MonitorResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::minutes(expire_minutes))
        .ok_or_else(|| internal_error("token expiry overflow"))?
        .timestamp();

    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        role: user.role,
        exp: expiration as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret_key.as_ref()),
    )
    .map_err(|e| internal_error(format!("failed to generate token: {e}")))
}

pub fn auth_routes(app_state: Arc<AppState>) -> Router {
    // Unauthenticated routes
    let public_routes = Router::new()
        .route("/login", post(login))
        .route("/register", post(register));

    // Protected routes requiring JWT authentication
    let protected_routes = Router::new()
        .route("/profile", get(get_profile))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            jwt_auth_middleware,
        ));

    public_routes
        .merge(protected_routes)
        .with_state(app_state)
}

#[instrument(skip(app_state, payload), fields(username = %payload.username))]
async fn login(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<UserLogin>,
) -> MonitorResult<Json<AuthResponse>> {
    let user = app_state
        .users_engine
        .authenticate(&payload, &app_state.password_hasher)?;

    respond_with_token(&app_state, &user)
}

#[instrument(skip(app_state, payload), fields(username = %payload.username))]
async fn register(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<UserCreate>,
) -> MonitorResult<Json<AuthResponse>> {
    let user = app_state
        .users_engine
        .register_user(payload, &app_state.password_hasher)?;

    mirror_user_to_postgres(&app_state, user.clone());

    respond_with_token(&app_state, &user)
}

async fn get_profile(
    State(app_state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> MonitorResult<Json<UserResponse>> {
    let user = app_state.users_engine.get_user(claims.sub)?;
    Ok(Json(UserResponse::from(user)))
}

fn respond_with_token(
    app_state: &AppState,
    user: &User,
) -> Result<Json<AuthResponse>, MonitorError> {
    let expire_minutes = app_state.config.token_expire_minutes;
    let token = generate_token(user, &app_state.config.secret_key, expire_minutes)?;

    let expires_at = Utc::now()
        .checked_add_signed(Duration::minutes(expire_minutes))
        .ok_or_else(|| internal_error("token expiry overflow"))?
        .timestamp();

    Ok(Json(AuthResponse {
        token,
        user_id: user.id,
        role: user.role,
        expires_at,
    }))
}

/// Write-behind persistence happens in the background so handler latency
/// stays independent of the database.
pub(crate) fn mirror_user_to_postgres(app_state: &AppState, user: User) {
    let pg = app_state.postgres_persistence.clone();
    tokio::spawn(async move {
        let pg_lock = pg.read().await;
        if let Some(pg_instance) = &*pg_lock {
            if let Err(e) = pg_instance.persist_user(&user).await {
                tracing::warn!("Failed to persist user to PostgreSQL: {}", e);
            }
        }
    });
}
