use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;

use crate::config::Config;
use crate::logs_engine::LogsEngine;
use crate::password::PasswordHasher;
use crate::postgres_persistence::PostgresPersistence;
use crate::settings_engine::SettingsEngine;
use crate::storage::InMemoryStorage;
use crate::users_engine::UsersEngine;

/// Shared application state: every engine works against the same
/// in-memory storage; PostgreSQL persistence is write-behind and lazily
/// initialized when a database is reachable.
pub struct AppState {
    pub users_engine: UsersEngine<InMemoryStorage>,
    pub logs_engine: LogsEngine<InMemoryStorage>,
    pub settings_engine: SettingsEngine<InMemoryStorage>,
    pub shared_storage: Arc<Mutex<InMemoryStorage>>,
    pub password_hasher: PasswordHasher,
    pub config: Config,
    /// Optional PostgreSQL persistence layer - lazy initialized
    pub postgres_persistence: Arc<RwLock<Option<PostgresPersistence>>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        // A single shared storage instance backs all engines.
        let shared_storage = Arc::new(Mutex::new(InMemoryStorage::new()));

        let users_engine = UsersEngine::new(Arc::clone(&shared_storage));
        let logs_engine = LogsEngine::new(Arc::clone(&shared_storage));
        let settings_engine = SettingsEngine::new(Arc::clone(&shared_storage));

        Self {
            users_engine,
            logs_engine,
            settings_engine,
            shared_storage,
            password_hasher: PasswordHasher::new(),
            config,
            postgres_persistence: Arc::new(RwLock::new(None)),
        }
    }
}
