use std::sync::{Arc, Mutex, MutexGuard};

use tracing::info;

use crate::error_handling::{internal_error, not_found, MonitorResult};
use crate::schemas::{SettingCreate, SettingUpdate};
use crate::storage::StorageBackend;
use crate::types::SystemSetting;

/// System settings: created once per key, updated by value.
pub struct SettingsEngine<S: StorageBackend> {
    storage: Arc<Mutex<S>>,
}

impl<S: StorageBackend> SettingsEngine<S> {
    pub fn new(storage: Arc<Mutex<S>>) -> Self {
        Self { storage }
    }

    fn lock(&self) -> MonitorResult<MutexGuard<'_, S>> {
        self.storage
            .lock()
            .map_err(|_| internal_error("storage lock poisoned"))
    }

    pub fn create_setting(&self, schema: SettingCreate) -> MonitorResult<SystemSetting> {
        schema.validate()?;

        let setting = self.lock()?.create_setting(schema.into_new_setting())?;
        info!(key = %setting.setting_key, "setting created");
        Ok(setting)
    }

    pub fn get_setting(&self, key: &str) -> MonitorResult<SystemSetting> {
        self.lock()?
            .get_setting_by_key(key)?
            .ok_or_else(|| not_found("setting"))
    }

    pub fn update_setting(&self, key: &str, changes: &SettingUpdate) -> MonitorResult<SystemSetting> {
        let mut storage = self.lock()?;
        let mut setting = storage
            .get_setting_by_key(key)?
            .ok_or_else(|| not_found("setting"))?;

        setting.setting_value = changes.setting_value.clone();
        if let Some(description) = &changes.description {
            setting.description = Some(description.clone());
        }

        let updated = storage.update_setting(&setting)?;
        info!(key = %updated.setting_key, "setting updated");
        Ok(updated)
    }

    pub fn list_settings(&self) -> MonitorResult<Vec<SystemSetting>> {
        Ok(self.lock()?.list_settings()?)
    }
}
