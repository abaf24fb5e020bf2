use std::sync::{Arc, Mutex};

use serde_json::json;

// bcrypt's MIN_COST constant is not publicly exported; mirror its value.
const MIN_COST: u32 = 4;

use fwmon_engine::error_handling::MonitorError;
use fwmon_engine::password::PasswordHasher;
use fwmon_engine::schemas::{UserCreate, UserLogin, UserUpdate};
use fwmon_engine::storage::InMemoryStorage;
use fwmon_engine::types::UserRole;
use fwmon_engine::users_engine::UsersEngine;

fn new_engine() -> UsersEngine<InMemoryStorage> {
    let storage = Arc::new(Mutex::new(InMemoryStorage::new()));
    UsersEngine::new(storage)
}

fn hasher() -> PasswordHasher {
    PasswordHasher::with_cost(MIN_COST)
}

fn create_schema(username: &str, email: &str) -> UserCreate {
    serde_json::from_value(json!({
        "username": username,
        "email": email,
        "password": "password123",
        "full_name": "Test User",
        "role": "viewer"
    }))
    .expect("schema deserializes")
}

#[test]
fn register_assigns_identity_and_timestamps() {
    let engine = new_engine();
    let hasher = hasher();

    let user = engine
        .register_user(create_schema("newuser", "newuser@example.com"), &hasher)
        .expect("user is created");

    assert_eq!(user.id, 1);
    assert_eq!(user.username, "newuser");
    assert_eq!(user.email, "newuser@example.com");
    assert!(user.is_active);
    assert_eq!(user.role, UserRole::Viewer);
    assert_eq!(user.created_at, user.updated_at);
    // Plaintext never reaches storage.
    assert_ne!(user.password_hash, "password123");
}

#[test]
fn register_rejects_duplicate_username() {
    let engine = new_engine();
    let hasher = hasher();

    engine
        .register_user(create_schema("testuser", "first@example.com"), &hasher)
        .expect("first user");

    let err = engine
        .register_user(create_schema("testuser", "second@example.com"), &hasher)
        .unwrap_err();

    assert!(matches!(
        err,
        MonitorError::Conflict {
            field: "username",
            ..
        }
    ));
}

#[test]
fn register_rejects_duplicate_email() {
    let engine = new_engine();
    let hasher = hasher();

    engine
        .register_user(create_schema("firstuser", "shared@example.com"), &hasher)
        .expect("first user");

    let err = engine
        .register_user(create_schema("seconduser", "shared@example.com"), &hasher)
        .unwrap_err();

    assert!(matches!(err, MonitorError::Conflict { field: "email", .. }));
}

#[test]
fn register_rejects_invalid_schema_without_side_effects() {
    let engine = new_engine();
    let hasher = hasher();

    let err = engine
        .register_user(create_schema("ab", "broken"), &hasher)
        .unwrap_err();

    let MonitorError::Validation(validation) = err else {
        panic!("expected validation error");
    };
    assert!(validation.has_field("username"));
    assert!(validation.has_field("email"));

    // Nothing was persisted.
    assert!(engine.list_users().expect("listing works").is_empty());
}

#[test]
fn authenticate_accepts_valid_credentials() {
    let engine = new_engine();
    let hasher = hasher();

    engine
        .register_user(create_schema("testuser", "test@example.com"), &hasher)
        .expect("user created");

    let login: UserLogin = serde_json::from_value(json!({
        "username": "testuser",
        "password": "password123"
    }))
    .expect("login deserializes");

    let user = engine.authenticate(&login, &hasher).expect("login succeeds");
    assert_eq!(user.username, "testuser");
}

#[test]
fn authenticate_rejects_wrong_password_and_unknown_user() {
    let engine = new_engine();
    let hasher = hasher();

    engine
        .register_user(create_schema("testuser", "test@example.com"), &hasher)
        .expect("user created");

    let wrong: UserLogin = serde_json::from_value(json!({
        "username": "testuser",
        "password": "wrong-password"
    }))
    .expect("deserializes");
    assert!(matches!(
        engine.authenticate(&wrong, &hasher).unwrap_err(),
        MonitorError::Unauthorized
    ));

    let unknown: UserLogin = serde_json::from_value(json!({
        "username": "ghost",
        "password": "password123"
    }))
    .expect("deserializes");
    assert!(matches!(
        engine.authenticate(&unknown, &hasher).unwrap_err(),
        MonitorError::Unauthorized
    ));
}

#[test]
fn authenticate_rejects_disabled_account() {
    let engine = new_engine();
    let hasher = hasher();

    let user = engine
        .register_user(create_schema("testuser", "test@example.com"), &hasher)
        .expect("user created");

    let deactivate: UserUpdate =
        serde_json::from_value(json!({"is_active": false})).expect("deserializes");
    engine
        .update_user(user.id, &deactivate, &hasher)
        .expect("update succeeds");

    let login: UserLogin = serde_json::from_value(json!({
        "username": "testuser",
        "password": "password123"
    }))
    .expect("deserializes");

    assert!(matches!(
        engine.authenticate(&login, &hasher).unwrap_err(),
        MonitorError::PermissionDenied(_)
    ));
}

#[test]
fn update_applies_only_provided_fields() {
    let engine = new_engine();
    let hasher = hasher();

    let user = engine
        .register_user(create_schema("testuser", "test@example.com"), &hasher)
        .expect("user created");

    let changes: UserUpdate = serde_json::from_value(json!({
        "email": "newemail@example.com",
        "full_name": "New Name"
    }))
    .expect("deserializes");

    let updated = engine
        .update_user(user.id, &changes, &hasher)
        .expect("update succeeds");

    assert_eq!(updated.email, "newemail@example.com");
    assert_eq!(updated.full_name.as_deref(), Some("New Name"));
    // Omitted fields stay untouched.
    assert_eq!(updated.username, "testuser");
    assert_eq!(updated.role, UserRole::Viewer);
    assert!(updated.is_active);
    assert_eq!(updated.password_hash, user.password_hash);
    assert!(updated.updated_at >= updated.created_at);
}

#[test]
fn update_rehashes_password() {
    let engine = new_engine();
    let hasher = hasher();

    let user = engine
        .register_user(create_schema("testuser", "test@example.com"), &hasher)
        .expect("user created");

    let changes: UserUpdate =
        serde_json::from_value(json!({"password": "changed123"})).expect("deserializes");
    let updated = engine
        .update_user(user.id, &changes, &hasher)
        .expect("update succeeds");

    assert_ne!(updated.password_hash, user.password_hash);

    let login: UserLogin = serde_json::from_value(json!({
        "username": "testuser",
        "password": "changed123"
    }))
    .expect("deserializes");
    assert!(engine.authenticate(&login, &hasher).is_ok());
}

#[test]
fn update_rejects_duplicate_email() {
    let engine = new_engine();
    let hasher = hasher();

    engine
        .register_user(create_schema("first", "first@example.com"), &hasher)
        .expect("first user");
    let second = engine
        .register_user(create_schema("second", "second@example.com"), &hasher)
        .expect("second user");

    let changes: UserUpdate =
        serde_json::from_value(json!({"email": "first@example.com"})).expect("deserializes");

    let err = engine.update_user(second.id, &changes, &hasher).unwrap_err();
    assert!(matches!(err, MonitorError::Conflict { field: "email", .. }));
}

#[test]
fn update_can_change_role() {
    let engine = new_engine();
    let hasher = hasher();

    let user = engine
        .register_user(create_schema("testuser", "test@example.com"), &hasher)
        .expect("user created");

    let changes: UserUpdate =
        serde_json::from_value(json!({"role": "operator"})).expect("deserializes");
    let updated = engine
        .update_user(user.id, &changes, &hasher)
        .expect("update succeeds");

    assert_eq!(updated.role, UserRole::Operator);
}

#[test]
fn update_unknown_user_is_not_found() {
    let engine = new_engine();
    let hasher = hasher();

    let changes: UserUpdate =
        serde_json::from_value(json!({"full_name": "Ghost"})).expect("deserializes");

    assert!(matches!(
        engine.update_user(42, &changes, &hasher).unwrap_err(),
        MonitorError::NotFound(_)
    ));
}
