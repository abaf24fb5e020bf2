use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};

use fwmon_engine::api::{auth_routes, log_routes, setting_routes, shared_state::AppState, user_routes};
use fwmon_engine::auth_middleware::jwt_auth_middleware;
use fwmon_engine::config::Config;
use fwmon_engine::db_init::setup_development_data;
use fwmon_engine::postgres_persistence::PostgresPersistence;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = Config::from_env();
    let app_state = Arc::new(AppState::new(config.clone()));

    // Setup development data (default admin + sample users/logs/settings)
    if config.environment == "development" {
        let hasher = app_state.password_hasher.clone();
        let mut storage = app_state.shared_storage.lock().unwrap();
        if let Err(e) = setup_development_data(&mut storage, &hasher) {
            tracing::error!("Failed to setup development data: {}", e);
        }
    }

    // Best-effort PostgreSQL persistence; the API serves from memory
    // either way.
    match PostgresPersistence::new(&config.database_url).await {
        Ok(pg) => {
            if let Err(e) = pg.run_migrations().await {
                warn!("Database migrations failed: {}", e);
            } else {
                *app_state.postgres_persistence.write().await = Some(pg);
                info!("PostgreSQL write-behind persistence enabled");
            }
        }
        Err(e) => {
            warn!("PostgreSQL unavailable, running in-memory only: {}", e);
        }
    }

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .with_state(app_state.clone())
        .nest(
            &format!("{}/auth", config.api_prefix),
            auth_routes(app_state.clone()),
        );

    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        .nest(&format!("{}/logs", config.api_prefix), log_routes())
        .nest(&format!("{}/users", config.api_prefix), user_routes())
        .nest(&format!("{}/settings", config.api_prefix), setting_routes())
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            jwt_auth_middleware,
        ))
        .with_state(app_state.clone());

    let cors_origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let app = public_routes
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        );

    let addr = SocketAddr::new(
        config.host.parse().unwrap_or([0, 0, 0, 0].into()),
        config.port,
    );
    info!("🔥 {} starting on {}", config.project_name, addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    info!("✅ Server listening and ready to accept connections on {}", addr);

    axum::serve(listener, app).await.unwrap();
}

async fn root(State(app_state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "message": "Firewall Log Monitoring API",
        "version": app_state.config.version,
        "endpoints": [
            "/api/v1/auth - Registration, login and profiles",
            "/api/v1/logs - Firewall log intake, filtering and stats",
            "/api/v1/users - User administration",
            "/api/v1/settings - System settings"
        ]
    }))
}

async fn health_check(State(app_state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let database = if app_state.postgres_persistence.read().await.is_some() {
        "connected"
    } else {
        "in-memory"
    };

    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "database": database,
            "environment": app_state.config.environment,
            "timestamp": chrono::Utc::now(),
        })),
    )
}
