use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{info, warn};

use crate::error_handling::{internal_error, not_found, MonitorError, MonitorResult};
use crate::password::PasswordHasher;
use crate::schemas::{UserCreate, UserLogin, UserUpdate};
use crate::storage::StorageBackend;
use crate::types::{NewUser, User};

/// User account management: validated construction, uniqueness-checked
/// persistence and partial updates. Credential hashing is delegated to the
/// [`PasswordHasher`] passed in by the caller.
pub struct UsersEngine<S: StorageBackend> {
    storage: Arc<Mutex<S>>,
}

impl<S: StorageBackend> UsersEngine<S> {
    pub fn new(storage: Arc<Mutex<S>>) -> Self {
        Self { storage }
    }

    fn lock(&self) -> MonitorResult<MutexGuard<'_, S>> {
        self.storage
            .lock()
            .map_err(|_| internal_error("storage lock poisoned"))
    }

    /// Creates a user from a validated schema. Every field violation is
    /// reported before any persistence attempt; duplicate usernames or
    /// emails surface as a conflict from the storage backend.
    pub fn register_user(&self, schema: UserCreate, hasher: &PasswordHasher) -> MonitorResult<User> {
        schema.validate()?;

        let password_hash = hasher
            .hash(&schema.password)
            .map_err(|e| internal_error(format!("failed to hash password: {e}")))?;

        let new_user = NewUser {
            username: schema.username.clone(),
            email: schema.email.clone(),
            password_hash,
            full_name: schema.full_name.clone(),
            is_active: true,
            role: schema.resolved_role(),
        };

        let user = self.lock()?.create_user(new_user)?;
        info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Verifies credentials and the active flag. Unknown usernames and
    /// wrong passwords are indistinguishable to the caller.
    pub fn authenticate(&self, login: &UserLogin, hasher: &PasswordHasher) -> MonitorResult<User> {
        let user = self.lock()?.get_user_by_username(&login.username)?;

        let Some(user) = user else {
            warn!(username = %login.username, "login failed: user not found");
            return Err(MonitorError::Unauthorized);
        };

        // bcrypt verification happens outside the storage lock.
        if !hasher.verify(&login.password, &user.password_hash) {
            warn!(username = %login.username, "login failed: invalid password");
            return Err(MonitorError::Unauthorized);
        }

        if !user.is_active {
            warn!(username = %login.username, "login rejected: account disabled");
            return Err(MonitorError::PermissionDenied(
                "account is disabled".to_string(),
            ));
        }

        info!(user_id = user.id, "login successful");
        Ok(user)
    }

    /// Applies a partial update. Omitted fields are left untouched; a
    /// provided password is re-hashed before storage.
    pub fn update_user(
        &self,
        id: i64,
        changes: &UserUpdate,
        hasher: &PasswordHasher,
    ) -> MonitorResult<User> {
        changes.validate()?;

        let password_hash = match &changes.password {
            Some(password) => Some(
                hasher
                    .hash(password)
                    .map_err(|e| internal_error(format!("failed to hash password: {e}")))?,
            ),
            None => None,
        };

        let mut storage = self.lock()?;
        let mut user = storage.get_user(id)?.ok_or_else(|| not_found("user"))?;

        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(hash) = password_hash {
            user.password_hash = hash;
        }
        if let Some(full_name) = &changes.full_name {
            user.full_name = Some(full_name.clone());
        }
        if let Some(is_active) = changes.is_active {
            user.is_active = is_active;
        }
        if let Some(role) = changes.resolved_role() {
            user.role = role;
        }

        let updated = storage.update_user(&user)?;
        info!(user_id = updated.id, "user updated");
        Ok(updated)
    }

    pub fn get_user(&self, id: i64) -> MonitorResult<User> {
        self.lock()?.get_user(id)?.ok_or_else(|| not_found("user"))
    }

    pub fn get_user_by_username(&self, username: &str) -> MonitorResult<Option<User>> {
        Ok(self.lock()?.get_user_by_username(username)?)
    }

    pub fn list_users(&self) -> MonitorResult<Vec<User>> {
        Ok(self.lock()?.list_users()?)
    }
}
