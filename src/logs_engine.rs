use std::sync::{Arc, Mutex, MutexGuard};

use tracing::info;

use crate::error_handling::{internal_error, not_found, MonitorResult};
use crate::schemas::{FirewallLogCreate, LogFilter};
use crate::stats::project_stats;
use crate::storage::StorageBackend;
use crate::types::{FirewallLogEntry, LogPage, LogStats};

/// Firewall log intake and querying. Entries are validated as a whole
/// before construction; filtering and pagination are delegated to the
/// storage backend, stats are projected fresh on every call.
pub struct LogsEngine<S: StorageBackend> {
    storage: Arc<Mutex<S>>,
}

impl<S: StorageBackend> LogsEngine<S> {
    pub fn new(storage: Arc<Mutex<S>>) -> Self {
        Self { storage }
    }

    fn lock(&self) -> MonitorResult<MutexGuard<'_, S>> {
        self.storage
            .lock()
            .map_err(|_| internal_error("storage lock poisoned"))
    }

    pub fn record_entry(&self, schema: FirewallLogCreate) -> MonitorResult<FirewallLogEntry> {
        schema.validate()?;

        let entry = self.lock()?.create_log(schema.into_new_entry())?;
        info!(
            log_id = entry.id,
            action = %entry.action,
            severity = %entry.severity,
            "firewall log recorded"
        );
        Ok(entry)
    }

    pub fn get_entry(&self, id: i64) -> MonitorResult<FirewallLogEntry> {
        self.lock()?
            .get_log(id)?
            .ok_or_else(|| not_found("log entry"))
    }

    /// Runs a validated filter and returns the requested page together
    /// with the total number of matches.
    pub fn query(&self, filter: &LogFilter) -> MonitorResult<LogPage> {
        filter.validate()?;

        let storage = self.lock()?;
        let items = storage.query_logs(filter)?;
        let total = storage.count_logs(filter)?;

        Ok(LogPage {
            items,
            total,
            page: filter.page,
            limit: filter.limit,
        })
    }

    /// Projects the aggregate summary over the whole collection.
    pub fn stats(&self, top_n: usize) -> MonitorResult<LogStats> {
        let entries = self.lock()?.list_logs()?;
        Ok(project_stats(&entries, top_n))
    }
}
