use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Allowed network protocols for a firewall log entry.
pub const PROTOCOLS: &[&str] = &["TCP", "UDP", "ICMP"];
/// Allowed firewall actions.
pub const ACTIONS: &[&str] = &["ALLOW", "DENY", "DROP"];
/// Allowed severity tiers, highest first.
pub const SEVERITIES: &[&str] = &["critical", "warning", "info", "debug"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Operator,
    Viewer,
}

impl UserRole {
    /// Case-insensitive parse against the fixed role set.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "admin" => Some(UserRole::Admin),
            "operator" => Some(UserRole::Operator),
            "viewer" => Some(UserRole::Viewer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Operator => "operator",
            UserRole::Viewer => "viewer",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated user fields handed to the storage backend, which assigns
/// identity and timestamps on creation.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub role: UserRole,
}

/// A single firewall log record.
///
/// Protocol, action and severity are validated against their allowed sets
/// case-insensitively but stored exactly as provided.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallLogEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub source_ip: String,
    pub destination_ip: String,
    pub source_port: Option<u16>,
    pub destination_port: Option<u16>,
    pub protocol: String,
    pub action: String,
    pub rule_id: Option<String>,
    pub description: Option<String>,
    pub severity: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub timestamp: DateTime<Utc>,
    pub source_ip: String,
    pub destination_ip: String,
    pub source_port: Option<u16>,
    pub destination_port: Option<u16>,
    pub protocol: String,
    pub action: String,
    pub rule_id: Option<String>,
    pub description: Option<String>,
    pub severity: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingValueType {
    String,
    Integer,
    Boolean,
    Json,
}

impl SettingValueType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "string" => Some(SettingValueType::String),
            "integer" => Some(SettingValueType::Integer),
            "boolean" => Some(SettingValueType::Boolean),
            "json" => Some(SettingValueType::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingValueType::String => "string",
            SettingValueType::Integer => "integer",
            SettingValueType::Boolean => "boolean",
            SettingValueType::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSetting {
    pub id: i64,
    pub setting_key: String,
    pub setting_value: String,
    pub description: Option<String>,
    pub value_type: SettingValueType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSetting {
    pub setting_key: String,
    pub setting_value: String,
    pub description: Option<String>,
    pub value_type: SettingValueType,
}

/// One entry of a top-N frequency list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpCount {
    pub ip: String,
    pub count: u64,
}

/// Read-only summary over a log collection, recomputed per query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogStats {
    pub total_logs: u64,
    pub allowed_count: u64,
    pub denied_count: u64,
    pub dropped_count: u64,
    pub critical_count: u64,
    pub warning_count: u64,
    pub top_source_ips: Vec<IpCount>,
    pub top_destination_ips: Vec<IpCount>,
}

/// One page of filtered log entries plus the total match count.
#[derive(Debug, Clone, Serialize)]
pub struct LogPage {
    pub items: Vec<FirewallLogEntry>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}
