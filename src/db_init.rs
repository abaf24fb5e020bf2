use chrono::{Duration, Utc};

use crate::password::PasswordHasher;
use crate::storage::{InMemoryStorage, StorageBackend, StorageError};
use crate::types::{NewLogEntry, NewSetting, NewUser, SettingValueType, UserRole};

/// Seeds the default admin plus sample users, log entries and settings
/// for local development. Safe to call twice; it skips when the admin
/// already exists.
pub fn setup_development_data(
    storage: &mut InMemoryStorage,
    hasher: &PasswordHasher,
) -> Result<(), Box<dyn std::error::Error>> {
    if storage.get_user_by_username("admin")?.is_some() {
        println!("Development data already seeded, skipping");
        return Ok(());
    }

    println!("🔥 Seeding development data...");

    let admin_hash = hasher.hash("admin123")?;
    let demo_hash = hasher.hash("demo123")?;

    storage.create_user(NewUser {
        username: "admin".to_string(),
        email: "admin@example.com".to_string(),
        password_hash: admin_hash,
        full_name: Some("Admin User".to_string()),
        is_active: true,
        role: UserRole::Admin,
    })?;

    storage.create_user(NewUser {
        username: "operator".to_string(),
        email: "operator@example.com".to_string(),
        password_hash: demo_hash.clone(),
        full_name: Some("Operator User".to_string()),
        is_active: true,
        role: UserRole::Operator,
    })?;

    storage.create_user(NewUser {
        username: "viewer".to_string(),
        email: "viewer@example.com".to_string(),
        password_hash: demo_hash,
        full_name: Some("Viewer User".to_string()),
        is_active: true,
        role: UserRole::Viewer,
    })?;

    seed_sample_logs(storage)?;

    storage.create_setting(NewSetting {
        setting_key: "log_retention_days".to_string(),
        setting_value: "90".to_string(),
        description: Some("Days to keep firewall log entries".to_string()),
        value_type: SettingValueType::Integer,
    })?;

    storage.create_setting(NewSetting {
        setting_key: "alert_email_enabled".to_string(),
        setting_value: "false".to_string(),
        description: Some("Send alert emails for critical entries".to_string()),
        value_type: SettingValueType::Boolean,
    })?;

    println!("✅ Development data ready (admin/admin123, operator/demo123, viewer/demo123)");

    Ok(())
}

fn seed_sample_logs(storage: &mut InMemoryStorage) -> Result<(), StorageError> {
    let now = Utc::now();

    let samples = [
        ("192.168.1.10", "8.8.8.8", Some(54321), Some(443), "TCP", "ALLOW", "info", "HTTPS connection allowed"),
        ("192.168.1.10", "8.8.8.8", Some(54322), Some(53), "UDP", "ALLOW", "info", "DNS lookup"),
        ("192.168.1.22", "10.0.0.1", Some(40012), Some(22), "TCP", "DENY", "warning", "SSH attempt blocked"),
        ("203.0.113.7", "10.0.0.5", Some(51515), Some(3389), "TCP", "DROP", "critical", "RDP scan dropped"),
        ("192.168.1.30", "1.1.1.1", None, None, "ICMP", "ALLOW", "debug", "Ping"),
        ("fe80::1", "2001:db8::5", Some(60000), Some(80), "TCP", "ALLOW", "info", "IPv6 HTTP request"),
    ];

    for (i, (source_ip, destination_ip, source_port, destination_port, protocol, action, severity, description)) in
        samples.iter().enumerate()
    {
        storage.create_log(NewLogEntry {
            timestamp: now - Duration::minutes(i as i64 * 5),
            source_ip: source_ip.to_string(),
            destination_ip: destination_ip.to_string(),
            source_port: *source_port,
            destination_port: *destination_port,
            protocol: protocol.to_string(),
            action: action.to_string(),
            rule_id: Some(format!("RULE-{:03}", i + 1)),
            description: Some(description.to_string()),
            severity: severity.to_string(),
        })?;
    }

    Ok(())
}
