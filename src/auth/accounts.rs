//! Account management service
//!
//! Handles registration, login and identity lookup against a JSON accounts
//! file keyed by username.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::{generate_salt, hash_password, verify_password, Identity};
use crate::persistence::write_atomic;

/// Stored account data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub salt: String,
    pub password_hash: String,
    pub created_at: String,
}

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username already exists")]
    UsernameExists,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("username and password must not be empty")]
    EmptyInput,

    #[error("accounts file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("accounts file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Account store backed by a single JSON file
pub struct AccountStore {
    path: PathBuf,
    accounts: BTreeMap<String, Account>,
}

impl AccountStore {
    /// Open the accounts file, starting empty if it does not exist.
    ///
    /// A corrupt file is an error and is left untouched on disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let path = path.as_ref().to_path_buf();
        let accounts = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(accounts) => accounts,
                Err(e) => {
                    error!("Malformed accounts file {}: {}", path.display(), e);
                    return Err(e.into());
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Accounts file {} not found, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        debug!("Loaded {} accounts from {}", accounts.len(), path.display());
        Ok(Self { path, accounts })
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn save(&self) -> Result<(), AuthError> {
        let content = serde_json::to_string_pretty(&self.accounts)?;
        write_atomic(&self.path, &content)?;
        debug!("Saved accounts to {}", self.path.display());
        Ok(())
    }

    /// Create a new account
    pub fn register(&mut self, username: &str, password: &str) -> Result<Identity, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            warn!("Registration attempt with empty username or password");
            return Err(AuthError::EmptyInput);
        }
        if self.accounts.contains_key(username) {
            info!("Registration refused: {} already exists", username);
            return Err(AuthError::UsernameExists);
        }

        let salt = generate_salt();
        let account = Account {
            id: uuid::Uuid::new_v4().to_string(),
            password_hash: hash_password(password, &salt),
            salt,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        let identity = Identity::new(&account.id, username);

        self.accounts.insert(username.to_string(), account);
        if let Err(e) = self.save() {
            self.accounts.remove(username);
            return Err(e);
        }

        info!("Registered account {}", username);
        Ok(identity)
    }

    /// Check a username and password
    pub fn login(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::EmptyInput);
        }

        let account = self
            .accounts
            .get(username)
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &account.salt, &account.password_hash) {
            info!("Failed login for {}", username);
            return Err(AuthError::InvalidCredentials);
        }

        info!("{} logged in", username);
        Ok(Identity::new(&account.id, username))
    }

    /// Identity of an existing account, without a password check
    pub fn authenticate(&self, username: &str) -> Option<Identity> {
        let username = username.trim();
        self.accounts
            .get(username)
            .map(|account| Identity::new(&account.id, username))
    }
}
