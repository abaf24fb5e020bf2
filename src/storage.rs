//! Persistence contract and the in-memory reference backend.
//!
//! The backend owns identity assignment (monotonically increasing ids)
//! and timestamp assignment on creation, and enforces the uniqueness
//! invariants (username, email, setting_key). Uniqueness violations
//! surface as [`StorageError::UniquenessConflict`] and are propagated to
//! callers unchanged.

use std::collections::HashMap;

use chrono::Utc;
use thiserror::Error;

use crate::schemas::LogFilter;
use crate::types::{
    FirewallLogEntry, NewLogEntry, NewSetting, NewUser, SystemSetting, User,
};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{field} '{value}' already exists")]
    UniquenessConflict { field: &'static str, value: String },

    #[error("connection error: {0}")]
    ConnectionError(String),

    #[error("configuration error: {0}")]
    ConfigurationError(String),

    #[error("backend error: {0}")]
    Backend(String),
}

pub trait StorageBackend {
    // User operations
    fn create_user(&mut self, user: NewUser) -> Result<User, StorageError>;
    fn get_user(&self, id: i64) -> Result<Option<User>, StorageError>;
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError>;
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;
    fn update_user(&mut self, user: &User) -> Result<User, StorageError>;
    fn list_users(&self) -> Result<Vec<User>, StorageError>;

    // Firewall log operations
    fn create_log(&mut self, entry: NewLogEntry) -> Result<FirewallLogEntry, StorageError>;
    fn get_log(&self, id: i64) -> Result<Option<FirewallLogEntry>, StorageError>;
    fn query_logs(&self, filter: &LogFilter) -> Result<Vec<FirewallLogEntry>, StorageError>;
    fn count_logs(&self, filter: &LogFilter) -> Result<u64, StorageError>;
    fn list_logs(&self) -> Result<Vec<FirewallLogEntry>, StorageError>;

    // System setting operations
    fn create_setting(&mut self, setting: NewSetting) -> Result<SystemSetting, StorageError>;
    fn get_setting_by_key(&self, key: &str) -> Result<Option<SystemSetting>, StorageError>;
    fn update_setting(&mut self, setting: &SystemSetting) -> Result<SystemSetting, StorageError>;
    fn list_settings(&self) -> Result<Vec<SystemSetting>, StorageError>;
}

pub struct InMemoryStorage {
    users: HashMap<i64, User>,
    logs: Vec<FirewallLogEntry>,
    settings: HashMap<i64, SystemSetting>,
    next_user_id: i64,
    next_log_id: i64,
    next_setting_id: i64,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
            logs: Vec::new(),
            settings: HashMap::new(),
            next_user_id: 1,
            next_log_id: 1,
            next_setting_id: 1,
        }
    }

    fn check_user_unique(
        &self,
        username: &str,
        email: &str,
        exclude_id: Option<i64>,
    ) -> Result<(), StorageError> {
        for user in self.users.values() {
            if Some(user.id) == exclude_id {
                continue;
            }
            if user.username == username {
                return Err(StorageError::UniquenessConflict {
                    field: "username",
                    value: username.to_string(),
                });
            }
            if user.email == email {
                return Err(StorageError::UniquenessConflict {
                    field: "email",
                    value: email.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// AND-combination of every provided filter field. IP filters match by
/// exact string equality, enum filters case-insensitively, and the date
/// range is inclusive on both ends.
fn matches_filter(entry: &FirewallLogEntry, filter: &LogFilter) -> bool {
    if let Some(source_ip) = &filter.source_ip {
        if &entry.source_ip != source_ip {
            return false;
        }
    }
    if let Some(destination_ip) = &filter.destination_ip {
        if &entry.destination_ip != destination_ip {
            return false;
        }
    }
    if let Some(protocol) = &filter.protocol {
        if !entry.protocol.eq_ignore_ascii_case(protocol) {
            return false;
        }
    }
    if let Some(action) = &filter.action {
        if !entry.action.eq_ignore_ascii_case(action) {
            return false;
        }
    }
    if let Some(severity) = &filter.severity {
        if !entry.severity.eq_ignore_ascii_case(severity) {
            return false;
        }
    }
    if let Some(date_from) = filter.date_from {
        if entry.timestamp < date_from {
            return false;
        }
    }
    if let Some(date_to) = filter.date_to {
        if entry.timestamp > date_to {
            return false;
        }
    }
    true
}

impl StorageBackend for InMemoryStorage {
    fn create_user(&mut self, user: NewUser) -> Result<User, StorageError> {
        self.check_user_unique(&user.username, &user.email, None)?;

        let now = Utc::now();
        let stored = User {
            id: self.next_user_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            full_name: user.full_name,
            is_active: user.is_active,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        self.next_user_id += 1;
        self.users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn get_user(&self, id: i64) -> Result<Option<User>, StorageError> {
        Ok(self.users.get(&id).cloned())
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        Ok(self
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        Ok(self.users.values().find(|user| user.email == email).cloned())
    }

    fn update_user(&mut self, user: &User) -> Result<User, StorageError> {
        if !self.users.contains_key(&user.id) {
            return Err(StorageError::Backend(format!(
                "user {} does not exist",
                user.id
            )));
        }
        self.check_user_unique(&user.username, &user.email, Some(user.id))?;

        let mut updated = user.clone();
        updated.updated_at = Utc::now();
        self.users.insert(updated.id, updated.clone());
        Ok(updated)
    }

    fn list_users(&self) -> Result<Vec<User>, StorageError> {
        let mut users: Vec<User> = self.users.values().cloned().collect();
        users.sort_by_key(|user| user.id);
        Ok(users)
    }

    fn create_log(&mut self, entry: NewLogEntry) -> Result<FirewallLogEntry, StorageError> {
        let stored = FirewallLogEntry {
            id: self.next_log_id,
            timestamp: entry.timestamp,
            source_ip: entry.source_ip,
            destination_ip: entry.destination_ip,
            source_port: entry.source_port,
            destination_port: entry.destination_port,
            protocol: entry.protocol,
            action: entry.action,
            rule_id: entry.rule_id,
            description: entry.description,
            severity: entry.severity,
            created_at: Utc::now(),
        };
        self.next_log_id += 1;
        self.logs.push(stored.clone());
        Ok(stored)
    }

    fn get_log(&self, id: i64) -> Result<Option<FirewallLogEntry>, StorageError> {
        Ok(self.logs.iter().find(|entry| entry.id == id).cloned())
    }

    fn query_logs(&self, filter: &LogFilter) -> Result<Vec<FirewallLogEntry>, StorageError> {
        let mut matched: Vec<FirewallLogEntry> = self
            .logs
            .iter()
            .filter(|entry| matches_filter(entry, filter))
            .cloned()
            .collect();
        // Newest first, matching the monitoring UI's default view.
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));

        Ok(matched
            .into_iter()
            .skip(filter.offset())
            .take(filter.limit as usize)
            .collect())
    }

    fn count_logs(&self, filter: &LogFilter) -> Result<u64, StorageError> {
        Ok(self
            .logs
            .iter()
            .filter(|entry| matches_filter(entry, filter))
            .count() as u64)
    }

    fn list_logs(&self) -> Result<Vec<FirewallLogEntry>, StorageError> {
        Ok(self.logs.clone())
    }

    fn create_setting(&mut self, setting: NewSetting) -> Result<SystemSetting, StorageError> {
        if self
            .settings
            .values()
            .any(|existing| existing.setting_key == setting.setting_key)
        {
            return Err(StorageError::UniquenessConflict {
                field: "setting_key",
                value: setting.setting_key,
            });
        }

        let now = Utc::now();
        let stored = SystemSetting {
            id: self.next_setting_id,
            setting_key: setting.setting_key,
            setting_value: setting.setting_value,
            description: setting.description,
            value_type: setting.value_type,
            created_at: now,
            updated_at: now,
        };
        self.next_setting_id += 1;
        self.settings.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn get_setting_by_key(&self, key: &str) -> Result<Option<SystemSetting>, StorageError> {
        Ok(self
            .settings
            .values()
            .find(|setting| setting.setting_key == key)
            .cloned())
    }

    fn update_setting(&mut self, setting: &SystemSetting) -> Result<SystemSetting, StorageError> {
        if !self.settings.contains_key(&setting.id) {
            return Err(StorageError::Backend(format!(
                "setting {} does not exist",
                setting.id
            )));
        }

        let mut updated = setting.clone();
        updated.updated_at = Utc::now();
        self.settings.insert(updated.id, updated.clone());
        Ok(updated)
    }

    fn list_settings(&self) -> Result<Vec<SystemSetting>, StorageError> {
        let mut settings: Vec<SystemSetting> = self.settings.values().cloned().collect();
        settings.sort_by_key(|setting| setting.id);
        Ok(settings)
    }
}
