//! Authentication module
//!
//! Salted password hashing and the identity handed to the game once a user
//! has logged in.

pub mod accounts;

pub use accounts::{Account, AccountStore, AuthError};

use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Generate a random salt for password hashing
pub fn generate_salt() -> String {
    let random_bytes: [u8; 16] = rand::rng().random();
    hex::encode(random_bytes)
}

/// Hash a password with a salt
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, salt: &str, hash: &str) -> bool {
    hash_password(password, salt) == hash
}

/// An authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub username: String,
}

impl Identity {
    pub fn new(id: &str, username: &str) -> Self {
        Self {
            id: id.to_string(),
            username: username.to_string(),
        }
    }

    /// Filesystem-safe name used to namespace this user's saves.
    ///
    /// A username made only of `[A-Za-z0-9_-]` is used as is. Anything else
    /// is hex-encoded behind `x.`, and `.` never appears in a plain key, so
    /// distinct usernames always get distinct keys.
    pub fn save_key(&self) -> String {
        let plain = !self.username.is_empty()
            && self
                .username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if plain {
            self.username.clone()
        } else {
            format!("x.{}", hex::encode(self.username.as_bytes()))
        }
    }
}
