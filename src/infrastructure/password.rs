use std::{
    fmt,
    ops::RangeInclusive,
    sync::{Arc, OnceLock},
};

use crate::services::errors::ServiceError;

/// A bcrypt hash. Only [`PasswordHasher::hash`] can produce one, so a plaintext
/// password cannot reach storage unhashed and a hash is never hashed again.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Work factors bcrypt accepts.
pub const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;

/// bcrypt with a fixed work factor. Hashing and verification run on the blocking pool.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    decoy: Arc<OnceLock<String>>,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            decoy: Default::default(),
        }
    }

    /// Derives a hash with a fresh random salt.
    pub async fn hash(&self, plaintext: &str) -> Result<PasswordHash, ServiceError> {
        let cost = self.cost;
        let plaintext = plaintext.to_owned();
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|err| ServiceError::Internal(err.to_string()))?
            .map_err(|err| ServiceError::Internal(err.to_string()))?;
        Ok(PasswordHash(hashed))
    }

    /// Constant-time comparison of `plaintext` against a stored hash.
    pub async fn verify(&self, plaintext: &str, stored: &str) -> Result<bool, ServiceError> {
        let plaintext = plaintext.to_owned();
        let stored = stored.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &stored))
            .await
            .map_err(|err| ServiceError::Internal(err.to_string()))?
            .map_err(|err| ServiceError::Internal(err.to_string()))
    }

    /// Burns one verification against a throwaway hash so that a login for an
    /// unknown user costs the same as a login with a wrong password.
    pub async fn verify_decoy(&self, plaintext: &str) -> Result<(), ServiceError> {
        let decoy = match self.decoy.get() {
            Some(decoy) => decoy.clone(),
            None => {
                let fresh = self.hash("decoy-password").await?.into_string();
                self.decoy.get_or_init(|| fresh).clone()
            }
        };
        self.verify(plaintext, &decoy).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[tokio::test]
    async fn hash_never_equals_plaintext_and_verifies() {
        let hasher = hasher();

        let hash = hasher.hash("secret").await.expect("hash should succeed");

        assert_ne!(hash.as_str(), "secret");
        assert!(hash.as_str().starts_with("$2"));
        assert!(hasher.verify("secret", hash.as_str()).await.unwrap());
        assert!(!hasher.verify("Secret", hash.as_str()).await.unwrap());
    }

    #[tokio::test]
    async fn salts_differ_between_hashes() {
        let hasher = hasher();

        let first = hasher.hash("secret").await.unwrap();
        let second = hasher.hash("secret").await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn malformed_stored_hash_is_internal_error() {
        let result = hasher().verify("secret", "plaintext").await;

        assert!(matches!(result, Err(ServiceError::Internal(_))));
    }

    #[test]
    fn debug_output_hides_hash() {
        let hash = PasswordHash("$2b$04$abc".to_string());
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }
}
