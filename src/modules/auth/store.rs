use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tempfile::NamedTempFile;

use super::account::{Account, VerificationState};
use crate::modules::utils::time::get_current_timestamp;

/// Custom error type for store operations
#[derive(Debug)]
pub enum StoreError {
    DuplicateEmail,
    NotFound,
    AlreadyVerified,
    InvalidData(String),
    IoError(io::Error),
}

// Implement conversion from io::Error to StoreError
impl From<io::Error> for StoreError {
    fn from(error: io::Error) -> Self {
        StoreError::IoError(error)
    }
}

// Implementation of Display trait for StoreError
impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::DuplicateEmail => write!(f, "an account with this email already exists"),
            StoreError::NotFound => write!(f, "account not found"),
            StoreError::AlreadyVerified => write!(f, "account is already verified"),
            StoreError::InvalidData(msg) => write!(f, "invalid data: {}", msg),
            StoreError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// Durable account store backed by a JSON file, keyed by normalized email.
///
/// All read-modify-write sequences run under a single mutex, so two racing
/// registrations of the same email (or verifications of the same token)
/// serialize and at most one wins. The file is replaced atomically on every
/// mutation, and a failed write rolls the in-memory state back, so no
/// partially applied account is ever observable.
pub struct AccountStore {
    path: PathBuf,
    accounts: Mutex<HashMap<String, Account>>,
}

impl AccountStore {
    /// Function to open the store, loading any existing accounts.
    /// A missing file is an empty store; an unparseable one is an error
    /// rather than a silent reset.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let accounts = match File::open(&path) {
            Ok(mut file) => {
                let mut data = String::new();
                file.read_to_string(&mut data)?;
                serde_json::from_str(&data).map_err(|e| {
                    StoreError::InvalidData(format!("failed to parse account store: {}", e))
                })?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(StoreError::IoError(e)),
        };

        Ok(AccountStore {
            path,
            accounts: Mutex::new(accounts),
        })
    }

    /// Function to look up an account by email, case-insensitively
    pub fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.lock();
        Ok(accounts.get(&email.trim().to_lowercase()).cloned())
    }

    /// Function to look up the account holding a pending verification token.
    /// A consumed token no longer matches anything, which is what makes it
    /// single-use.
    pub fn find_by_token(&self, token: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.lock();
        Ok(accounts
            .values()
            .find(|account| account.verify_token() == Some(token))
            .cloned())
    }

    /// Function to insert a new account.
    /// The duplicate check and the insert happen under the same lock, so the
    /// store, not the caller's pre-check, is the authority on uniqueness.
    pub fn insert(&self, account: Account) -> Result<(), StoreError> {
        let mut accounts = self.lock();

        let key = account.email_normalized.clone();
        if accounts.contains_key(&key) {
            return Err(StoreError::DuplicateEmail);
        }

        accounts.insert(key.clone(), account);
        if let Err(e) = self.persist(&accounts) {
            accounts.remove(&key);
            return Err(e);
        }

        Ok(())
    }

    /// Function to atomically flip an account to verified, clearing its
    /// token. A second call for the same account fails with `AlreadyVerified`.
    pub fn mark_verified(&self, account_id: &str) -> Result<Account, StoreError> {
        let mut accounts = self.lock();

        let previous = match accounts.values().find(|a| a.id == account_id) {
            Some(account) => account.clone(),
            None => return Err(StoreError::NotFound),
        };
        if previous.is_verified() {
            return Err(StoreError::AlreadyVerified);
        }

        let mut updated = previous.clone();
        updated.state = VerificationState::Verified {
            verified_at: get_current_timestamp(),
        };

        let key = previous.email_normalized.clone();
        accounts.insert(key.clone(), updated.clone());
        if let Err(e) = self.persist(&accounts) {
            accounts.insert(key, previous);
            return Err(e);
        }

        Ok(updated)
    }

    // Single-writer discipline: every operation goes through this lock.
    // A poisoned lock only means another thread panicked mid-operation;
    // the rollback on persist failure keeps the map consistent, so the
    // inner value is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Account>> {
        match self.accounts.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Write the full account set to disk, atomically replacing the old file
    fn persist(&self, accounts: &HashMap<String, Account>) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(accounts)
            .map_err(|e| StoreError::InvalidData(e.to_string()))?;

        // Write to a temp file in the same directory, then rename over the
        // target, so a crash mid-write cannot leave a truncated store
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(data.as_bytes())?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::IoError(e.error))?;

        Ok(())
    }
}
