//! Password hashing, opaque token generation and invitation codes.

use argon2::{Algorithm, Argon2, Params, PasswordVerifier, Version};
use password_hash::{PasswordHash, PasswordHasher as _, SaltString};
use rand::Rng;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::SwiftError;

/// Default length of access and refresh tokens, in characters.
pub const DEFAULT_TOKEN_LENGTH: usize = 40;

/// Length of team invitation codes.
pub const INVITE_CODE_LENGTH: usize = 8;

const INVITE_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Pluggable password hashing for the local session provider.
pub trait PasswordHasher: Send + Sync {
    /// # Errors
    ///
    /// Returns `SwiftError::Internal` if hashing fails.
    fn hash(&self, password: &str) -> Result<String, SwiftError>;

    /// # Errors
    ///
    /// Returns `SwiftError::Internal` if the stored hash is malformed.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, SwiftError>;
}

/// Argon2id hasher.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    memory_cost: u32,
    time_cost: u32,
    parallelism: u32,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            memory_cost: 19456,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl Argon2Hasher {
    #[must_use]
    pub fn new(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost,
            time_cost,
            parallelism,
        }
    }

    /// Cheap parameters for tests and local development.
    #[must_use]
    pub fn fast() -> Self {
        Self::new(1024, 1, 1)
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, SwiftError> {
        let salt = SaltString::generate(&mut OsRng);
        let params = Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|e| SwiftError::Internal(format!("argon2 params: {e}")))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| SwiftError::Internal(format!("password hashing: {e}")))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, SwiftError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| SwiftError::Internal(format!("malformed password hash: {e}")))?;

        // parameters come from the stored hash
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

/// Random alphanumeric token for sessions and verification links.
pub fn generate_token(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(rng.sample(rand::distributions::Alphanumeric)))
        .collect()
}

/// Uppercase invitation code without the easily confused `0/O/1/I` characters.
pub fn generate_invite_code() -> String {
    let mut rng = rand::thread_rng();
    (0..INVITE_CODE_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..INVITE_CODE_ALPHABET.len());
            char::from(INVITE_CODE_ALPHABET[idx])
        })
        .collect()
}

/// SHA-256 hex digest. Tokens are stored hashed; they are high entropy so a
/// fast hash is enough.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
