use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::modules::utils::time::get_current_timestamp;
use crate::ACCOUNT_ID_BYTES;

/// Define verification state enum.
///
/// The pending token lives inside the `Unverified` variant, so a verified
/// account structurally cannot carry one and the token is cleared the moment
/// the state flips.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationState {
    Unverified { verify_token: String },
    Verified { verified_at: u64 },
}

impl VerificationState {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationState::Verified { .. })
    }
}

/// Represents a single account with its credential and verification details
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Account {
    pub id: String,
    pub email: String,            // Original email as entered by the user (for display)
    pub email_normalized: String, // Lowercase version for lookups and comparisons
    pub secret_hash: String,
    pub created_at: u64,
    pub state: VerificationState,
}

impl Account {
    /// Function to build a fresh unverified account from an already-hashed
    /// secret and a pending verification token
    pub fn new_unverified(email: &str, secret_hash: String, verify_token: String) -> Self {
        // Preserve original email and create normalized version for lookups
        let email = email.trim().to_string();
        let email_normalized = email.to_lowercase();

        Account {
            id: generate_account_id(),
            email,
            email_normalized,
            secret_hash,
            created_at: get_current_timestamp(),
            state: VerificationState::Unverified { verify_token },
        }
    }

    pub fn is_verified(&self) -> bool {
        self.state.is_verified()
    }

    /// The pending verification token, present only while unverified
    pub fn verify_token(&self) -> Option<&str> {
        match &self.state {
            VerificationState::Unverified { verify_token } => Some(verify_token),
            VerificationState::Verified { .. } => None,
        }
    }
}

/// Function to generate an opaque, stable account identifier
fn generate_account_id() -> String {
    let mut bytes = [0u8; ACCOUNT_ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_account() -> Account {
        Account::new_unverified(
            " Test@Example.com ",
            "$pbkdf2-sha256$dummy".to_string(),
            "token123".to_string(),
        )
    }

    #[test]
    fn test_new_account_is_unverified() {
        let account = test_account();

        assert!(!account.is_verified());
        assert_eq!(account.verify_token(), Some("token123"));
        assert!(account.created_at > 0);
    }

    #[test]
    fn test_email_normalization() {
        let account = test_account();

        assert_eq!(account.email, "Test@Example.com");
        assert_eq!(account.email_normalized, "test@example.com");
    }

    #[test]
    fn test_verified_state_has_no_token() {
        let mut account = test_account();
        account.state = VerificationState::Verified { verified_at: 1_700_000_000 };

        assert!(account.is_verified());
        assert_eq!(account.verify_token(), None);
    }

    #[test]
    fn test_account_id_generation() {
        let first = test_account();
        let second = test_account();

        // 16 random bytes, hex encoded
        assert_eq!(first.id.len(), ACCOUNT_ID_BYTES * 2);
        assert!(first.id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_state_serialization_round_trip() {
        let account = test_account();

        let json = serde_json::to_string(&account).unwrap();
        assert!(json.contains("\"status\":\"unverified\""));
        assert!(json.contains("token123"));

        let parsed: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, account);

        // A verified account serializes without any token field
        let verified = Account {
            state: VerificationState::Verified { verified_at: 1_700_000_000 },
            ..account
        };
        let json = serde_json::to_string(&verified).unwrap();
        assert!(json.contains("\"status\":\"verified\""));
        assert!(!json.contains("verify_token"));
    }
}
