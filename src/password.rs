//! Credential hashing behind an explicitly passed, stateless service.
//!
//! Engines receive a [`PasswordHasher`] by reference instead of reaching
//! for a module-level hashing context; plaintext is never stored or
//! compared directly.

use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// Lower costs keep test suites fast; production uses the default.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, BcryptError> {
        hash(plaintext, self.cost)
    }

    pub fn verify(&self, plaintext: &str, hashed: &str) -> bool {
        verify(plaintext, hashed).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    // bcrypt's MIN_COST constant is not publicly exported; mirror its value.
    const MIN_COST: u32 = 4;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hasher = PasswordHasher::with_cost(MIN_COST);
        let hashed = hasher.hash("password123").expect("hashing succeeds");

        assert_ne!(hashed, "password123");
        assert!(hasher.verify("password123", &hashed));
        assert!(!hasher.verify("wrong-password", &hashed));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        let hasher = PasswordHasher::with_cost(MIN_COST);
        assert!(!hasher.verify("password123", "not-a-bcrypt-hash"));
    }
}
