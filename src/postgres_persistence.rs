use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;

use crate::storage::StorageError;
use crate::types::{FirewallLogEntry, SystemSetting, User};

/// Lightweight PostgreSQL persistence layer
/// Persists records write-behind while in-memory storage serves queries
pub struct PostgresPersistence {
    pool: Pool,
}

impl PostgresPersistence {
    /// Create a new PostgreSQL persistence layer
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let config = database_url
            .parse::<tokio_postgres::Config>()
            .map_err(|e| StorageError::ConfigurationError(format!("Invalid database URL: {e}")))?;

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = Manager::from_config(config, NoTls, manager_config);

        let pool = Pool::builder(manager)
            .max_size(16)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| StorageError::ConnectionError(format!("Failed to create pool: {e}")))?;

        // Test connection
        pool.get().await.map_err(|e| {
            StorageError::ConnectionError(format!("Failed to get test connection: {e}"))
        })?;

        tracing::info!("PostgreSQL persistence layer connected successfully");

        Ok(Self { pool })
    }

    async fn get_conn(&self) -> Result<deadpool_postgres::Client, StorageError> {
        self.pool
            .get()
            .await
            .map_err(|e| StorageError::ConnectionError(format!("Failed to get connection: {e}")))
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        let client = self.get_conn().await?;

        let exists = client
            .query_one(
                "SELECT EXISTS (SELECT FROM information_schema.tables WHERE table_schema = 'public' AND table_name = 'firewall_logs')",
                &[],
            )
            .await
            .map_err(|e| StorageError::ConfigurationError(format!("Failed to check migrations: {e}")))?;

        let table_exists: bool = exists.get(0);

        if !table_exists {
            tracing::info!("Running database migrations from SQL file...");
            let migration_sql = include_str!("../migrations/V1__initial_schema.sql");
            client
                .batch_execute(migration_sql)
                .await
                .map_err(|e| StorageError::ConfigurationError(format!("Migration failed: {e}")))?;
            tracing::info!("Database migrations completed successfully");
        } else {
            tracing::info!("Database already migrated");
        }

        Ok(())
    }

    /// Persist a user account, updating on conflict with its username.
    pub async fn persist_user(&self, user: &User) -> Result<(), StorageError> {
        let client = self.get_conn().await?;

        client
            .execute(
                "INSERT INTO users (id, username, email, password_hash, full_name, is_active, role, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                 ON CONFLICT (username) DO UPDATE SET
                     email = EXCLUDED.email,
                     password_hash = EXCLUDED.password_hash,
                     full_name = EXCLUDED.full_name,
                     is_active = EXCLUDED.is_active,
                     role = EXCLUDED.role,
                     updated_at = EXCLUDED.updated_at",
                &[
                    &user.id,
                    &user.username,
                    &user.email,
                    &user.password_hash,
                    &user.full_name,
                    &user.is_active,
                    &user.role.as_str(),
                    &user.created_at,
                    &user.updated_at,
                ],
            )
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to persist user: {e}")))?;

        Ok(())
    }

    /// Persist a firewall log entry.
    pub async fn persist_log(&self, entry: &FirewallLogEntry) -> Result<(), StorageError> {
        let client = self.get_conn().await?;

        client
            .execute(
                "INSERT INTO firewall_logs (id, timestamp, source_ip, destination_ip, source_port, destination_port, protocol, action, rule_id, description, severity, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                 ON CONFLICT (id) DO NOTHING",
                &[
                    &entry.id,
                    &entry.timestamp,
                    &entry.source_ip,
                    &entry.destination_ip,
                    &entry.source_port.map(i32::from),
                    &entry.destination_port.map(i32::from),
                    &entry.protocol,
                    &entry.action,
                    &entry.rule_id,
                    &entry.description,
                    &entry.severity,
                    &entry.created_at,
                ],
            )
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to persist log entry: {e}")))?;

        Ok(())
    }

    /// Persist a system setting, updating on conflict with its key.
    pub async fn persist_setting(&self, setting: &SystemSetting) -> Result<(), StorageError> {
        let client = self.get_conn().await?;

        client
            .execute(
                "INSERT INTO system_settings (id, setting_key, setting_value, description, value_type, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 ON CONFLICT (setting_key) DO UPDATE SET
                     setting_value = EXCLUDED.setting_value,
                     description = EXCLUDED.description,
                     value_type = EXCLUDED.value_type,
                     updated_at = EXCLUDED.updated_at",
                &[
                    &setting.id,
                    &setting.setting_key,
                    &setting.setting_value,
                    &setting.description,
                    &setting.value_type.as_str(),
                    &setting.created_at,
                    &setting.updated_at,
                ],
            )
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to persist setting: {e}")))?;

        Ok(())
    }
}
