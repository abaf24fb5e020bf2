//! Input contracts for user accounts, firewall log entries and system
//! settings. Each schema deserializes raw request data and validates all
//! fields at once; a record is never partially constructed.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::types::{
    NewLogEntry, NewSetting, SettingValueType, UserRole, ACTIONS, PROTOCOLS, SEVERITIES,
};
use crate::validation::{
    self, codes, Rejection, ValidationError, Violations, LIMIT_MAX, LIMIT_MIN, PAGE_MIN,
};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 50;

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Full creation schema for a user account. Role defaults to `viewer`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl UserCreate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        violations.capture("username", validation::validate_username(&self.username));
        violations.capture("email", validation::validate_email(&self.email));
        violations.capture("password", validation::validate_password(&self.password));
        if let Some(role) = &self.role {
            violations.capture("role", validate_role(role));
        }
        violations.into_result()
    }

    /// Typed role after successful validation.
    pub fn resolved_role(&self) -> UserRole {
        self.role
            .as_deref()
            .and_then(UserRole::parse)
            .unwrap_or(UserRole::Viewer)
    }
}

/// Partial update schema: omitted fields leave the stored record
/// untouched, provided fields are validated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub role: Option<String>,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        if let Some(email) = &self.email {
            violations.capture("email", validation::validate_email(email));
        }
        if let Some(password) = &self.password {
            violations.capture("password", validation::validate_password(password));
        }
        if let Some(role) = &self.role {
            violations.capture("role", validate_role(role));
        }
        violations.into_result()
    }

    pub fn resolved_role(&self) -> Option<UserRole> {
        self.role.as_deref().and_then(UserRole::parse)
    }
}

/// Credential carrier for login. Length bounds are creation-time
/// constraints and are not re-checked here.
#[derive(Debug, Clone, Deserialize)]
pub struct UserLogin {
    pub username: String,
    pub password: String,
}

fn validate_role(value: &str) -> Result<UserRole, Rejection> {
    UserRole::parse(value).ok_or_else(|| Rejection {
        code: codes::INVALID_VALUE,
        message: format!("'{value}' is not one of: admin, operator, viewer"),
    })
}

fn validate_value_type(value: &str) -> Result<SettingValueType, Rejection> {
    SettingValueType::parse(value).ok_or_else(|| Rejection {
        code: codes::INVALID_VALUE,
        message: format!("'{value}' is not one of: string, integer, boolean, json"),
    })
}

/// Full creation schema for a firewall log entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FirewallLogCreate {
    pub timestamp: DateTime<Utc>,
    pub source_ip: String,
    pub destination_ip: String,
    #[serde(default)]
    pub source_port: Option<i64>,
    #[serde(default)]
    pub destination_port: Option<i64>,
    pub protocol: String,
    pub action: String,
    #[serde(default)]
    pub rule_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub severity: String,
}

impl FirewallLogCreate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        violations.capture("source_ip", validation::validate_ip(&self.source_ip));
        violations.capture(
            "destination_ip",
            validation::validate_ip(&self.destination_ip),
        );
        if let Some(port) = self.source_port {
            violations.capture("source_port", validation::validate_port(port));
        }
        if let Some(port) = self.destination_port {
            violations.capture("destination_port", validation::validate_port(port));
        }
        violations.capture(
            "protocol",
            validation::validate_one_of(&self.protocol, PROTOCOLS),
        );
        violations.capture("action", validation::validate_one_of(&self.action, ACTIONS));
        violations.capture(
            "severity",
            validation::validate_one_of(&self.severity, SEVERITIES),
        );
        violations.into_result()
    }

    /// Converts into the storage record. Call after [`validate`] has
    /// passed; enum fields keep their original spelling.
    ///
    /// [`validate`]: Self::validate
    pub fn into_new_entry(self) -> NewLogEntry {
        NewLogEntry {
            timestamp: self.timestamp,
            source_ip: self.source_ip,
            destination_ip: self.destination_ip,
            source_port: self.source_port.and_then(|p| u16::try_from(p).ok()),
            destination_port: self.destination_port.and_then(|p| u16::try_from(p).ok()),
            protocol: self.protocol,
            action: self.action,
            rule_id: self.rule_id,
            description: self.description,
            severity: self.severity,
        }
    }
}

/// Constrained query over the log collection: optional equality filters,
/// an optional inclusive date range and bounded pagination.
#[derive(Debug, Clone, Deserialize)]
pub struct LogFilter {
    #[serde(default)]
    pub source_ip: Option<String>,
    #[serde(default)]
    pub destination_ip: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub date_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_to: Option<DateTime<Utc>>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for LogFilter {
    fn default() -> Self {
        Self {
            source_ip: None,
            destination_ip: None,
            protocol: None,
            action: None,
            severity: None,
            date_from: None,
            date_to: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl LogFilter {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        if self.page < PAGE_MIN {
            violations.reject(
                "page",
                codes::OUT_OF_RANGE,
                format!("page must be at least {PAGE_MIN}"),
            );
        }
        if !(LIMIT_MIN..=LIMIT_MAX).contains(&self.limit) {
            violations.reject(
                "limit",
                codes::OUT_OF_RANGE,
                format!("limit must be between {LIMIT_MIN} and {LIMIT_MAX}"),
            );
        }
        if let Some(ip) = &self.source_ip {
            violations.capture("source_ip", validation::validate_ip(ip));
        }
        if let Some(ip) = &self.destination_ip {
            violations.capture("destination_ip", validation::validate_ip(ip));
        }
        if let Some(protocol) = &self.protocol {
            violations.capture("protocol", validation::validate_one_of(protocol, PROTOCOLS));
        }
        if let Some(action) = &self.action {
            violations.capture("action", validation::validate_one_of(action, ACTIONS));
        }
        if let Some(severity) = &self.severity {
            violations.capture("severity", validation::validate_one_of(severity, SEVERITIES));
        }
        violations.into_result()
    }

    /// Zero-based offset of the first entry on the requested page.
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * (self.limit as usize)
    }
}

/// Creation schema for a system setting.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingCreate {
    pub setting_key: String,
    pub setting_value: String,
    #[serde(default)]
    pub description: Option<String>,
    pub value_type: String,
}

impl SettingCreate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        if self.setting_key.trim().is_empty() {
            violations.reject(
                "setting_key",
                codes::INVALID_VALUE,
                "setting_key must not be empty",
            );
        }
        violations.capture("value_type", validate_value_type(&self.value_type));
        violations.into_result()
    }

    pub fn into_new_setting(self) -> NewSetting {
        let value_type = SettingValueType::parse(&self.value_type).unwrap_or(SettingValueType::String);
        NewSetting {
            setting_key: self.setting_key,
            setting_value: self.setting_value,
            description: self.description,
            value_type,
        }
    }
}

/// Update schema for a setting: value only, description optional.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingUpdate {
    pub setting_value: String,
    #[serde(default)]
    pub description: Option<String>,
}
