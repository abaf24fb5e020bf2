pub mod api;
pub mod auth_middleware;
pub mod config;
pub mod db_init;
pub mod error_handling;
pub mod logs_engine;
pub mod password;
pub mod postgres_persistence;
pub mod schemas;
pub mod settings_engine;
pub mod stats;
pub mod storage;
pub mod types;
pub mod users_engine;
pub mod validation;

pub use config::Config;
pub use error_handling::*;
pub use logs_engine::LogsEngine;
pub use password::PasswordHasher;
pub use schemas::*;
pub use settings_engine::SettingsEngine;
pub use stats::{project_stats, DEFAULT_TOP_N};
pub use storage::{InMemoryStorage, StorageBackend, StorageError};
pub use types::*;
pub use users_engine::UsersEngine;
pub use validation::{FieldViolation, ValidationError};
