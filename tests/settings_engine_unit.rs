use std::sync::{Arc, Mutex};

use serde_json::json;

use fwmon_engine::error_handling::MonitorError;
use fwmon_engine::schemas::{SettingCreate, SettingUpdate};
use fwmon_engine::settings_engine::SettingsEngine;
use fwmon_engine::storage::InMemoryStorage;
use fwmon_engine::types::SettingValueType;

fn new_engine() -> SettingsEngine<InMemoryStorage> {
    let storage = Arc::new(Mutex::new(InMemoryStorage::new()));
    SettingsEngine::new(storage)
}

fn schema(key: &str, value: &str, value_type: &str) -> SettingCreate {
    serde_json::from_value(json!({
        "setting_key": key,
        "setting_value": value,
        "description": format!("{key} setting"),
        "value_type": value_type
    }))
    .expect("schema deserializes")
}

#[test]
fn create_setting_assigns_identity() {
    let engine = new_engine();

    let setting = engine
        .create_setting(schema("test_setting", "test_value", "string"))
        .expect("setting created");

    assert_eq!(setting.id, 1);
    assert_eq!(setting.setting_key, "test_setting");
    assert_eq!(setting.setting_value, "test_value");
    assert_eq!(setting.description.as_deref(), Some("test_setting setting"));
    assert_eq!(setting.value_type, SettingValueType::String);
}

#[test]
fn create_setting_rejects_duplicate_key() {
    let engine = new_engine();

    engine
        .create_setting(schema("duplicate_key", "value1", "string"))
        .expect("first setting");

    let err = engine
        .create_setting(schema("duplicate_key", "value2", "string"))
        .unwrap_err();

    assert!(matches!(
        err,
        MonitorError::Conflict {
            field: "setting_key",
            ..
        }
    ));
}

#[test]
fn create_setting_accepts_all_value_types() {
    let engine = new_engine();

    for (value_type, expected) in [
        ("string", SettingValueType::String),
        ("integer", SettingValueType::Integer),
        ("boolean", SettingValueType::Boolean),
        ("json", SettingValueType::Json),
    ] {
        let setting = engine
            .create_setting(schema(&format!("setting_{value_type}"), "v", value_type))
            .expect("setting created");
        assert_eq!(setting.value_type, expected);
    }
}

#[test]
fn create_setting_rejects_unknown_value_type() {
    let engine = new_engine();

    let err = engine
        .create_setting(schema("bad_type", "v", "float"))
        .unwrap_err();

    let MonitorError::Validation(validation) = err else {
        panic!("expected validation error");
    };
    assert!(validation.has_field("value_type"));
}

#[test]
fn create_setting_rejects_empty_key() {
    let engine = new_engine();

    let err = engine
        .create_setting(schema("  ", "v", "string"))
        .unwrap_err();

    let MonitorError::Validation(validation) = err else {
        panic!("expected validation error");
    };
    assert!(validation.has_field("setting_key"));
}

#[test]
fn update_setting_changes_value_only() {
    let engine = new_engine();

    let created = engine
        .create_setting(schema("retention_days", "30", "integer"))
        .expect("setting created");

    let changes: SettingUpdate =
        serde_json::from_value(json!({"setting_value": "90"})).expect("deserializes");
    let updated = engine
        .update_setting("retention_days", &changes)
        .expect("update succeeds");

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.setting_value, "90");
    assert_eq!(updated.value_type, SettingValueType::Integer);
    assert_eq!(updated.description, created.description);
    assert!(updated.updated_at >= created.updated_at);
}

#[test]
fn update_unknown_setting_is_not_found() {
    let engine = new_engine();

    let changes: SettingUpdate =
        serde_json::from_value(json!({"setting_value": "v"})).expect("deserializes");

    assert!(matches!(
        engine.update_setting("missing", &changes).unwrap_err(),
        MonitorError::NotFound(_)
    ));
}

#[test]
fn get_and_list_settings() {
    let engine = new_engine();

    engine
        .create_setting(schema("alpha", "1", "integer"))
        .expect("created");
    engine
        .create_setting(schema("beta", "2", "integer"))
        .expect("created");

    let fetched = engine.get_setting("alpha").expect("setting exists");
    assert_eq!(fetched.setting_key, "alpha");

    let all = engine.list_settings().expect("listing works");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].setting_key, "alpha");
    assert_eq!(all[1].setting_key, "beta");
}
