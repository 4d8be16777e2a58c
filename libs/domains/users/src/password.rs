use argon2::{
    Algorithm, Argon2, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::config::PasswordHashConfig;
use crate::error::{UserError, UserResult};

/// Argon2id hasher with a fixed cost. Hashing runs on the blocking pool.
#[derive(Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new(config: &PasswordHashConfig) -> UserResult<Self> {
        let params = config
            .params()
            .map_err(|e| UserError::PasswordHash(format!("invalid Argon2 parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash `password` with a fresh random salt into a PHC string.
    pub async fn hash(&self, password: String) -> UserResult<String> {
        let argon2 = self.argon2.clone();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| UserError::PasswordHash(e.to_string()))
        })
        .await
        .map_err(|e| UserError::Internal(format!("password hashing task failed: {}", e)))?
    }

    pub fn verify(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}
