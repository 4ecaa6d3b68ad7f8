use super::account::Account;
use super::secret::{hash_secret, validate_secret, verify_secret};
use super::store::{AccountStore, StoreError};
use super::token::generate_verify_token;
use crate::modules::utils::logging::{log_auth_event, log_data_operation};
use crate::modules::utils::validate::is_valid_email;

/// Errors surfaced to the transport layer
#[derive(Debug, PartialEq)]
pub enum AuthError {
    InvalidInput(String),
    EmailTaken,
    InvalidOrUsedToken,
    InvalidCredentials,
    AccountNotVerified,
    Internal(String),
}

// Implementation of Display trait for AuthError
impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            AuthError::EmailTaken => write!(f, "an account with this email already exists"),
            AuthError::InvalidOrUsedToken => write!(f, "invalid or already used token"),
            AuthError::InvalidCredentials => write!(f, "invalid email or secret"),
            AuthError::AccountNotVerified => {
                write!(f, "account is not verified yet, please check your email")
            }
            // Infrastructure detail stays in the logs, never in the
            // caller-facing message
            AuthError::Internal(_) => write!(f, "internal error"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Port through which the lifecycle manager requests delivery of a
/// verification message. Implemented outside the core; delivery is
/// best-effort and a failure never surfaces to the caller.
pub trait VerificationNotifier: Send + Sync {
    fn send_verification(&self, to_email: &str, token: &str) -> Result<(), String>;
}

/// The account lifecycle state machine: registration, verification, login.
///
/// Holds no account state of its own; every operation re-reads the store,
/// so stale reads cannot leak across calls.
pub struct AccountService {
    store: AccountStore,
    notifier: Box<dyn VerificationNotifier>,
}

impl AccountService {
    pub fn new(store: AccountStore, notifier: Box<dyn VerificationNotifier>) -> Self {
        AccountService { store, notifier }
    }

    /// Function to register a new account and request a verification mail.
    /// The registration is durable whether or not the mail goes out.
    pub fn register(&self, email: &str, secret: &str) -> Result<(), AuthError> {
        let email = email.trim();
        if email.is_empty() || !is_valid_email(email) {
            return Err(AuthError::InvalidInput(
                "a valid email address is required".to_string(),
            ));
        }
        if let Err(e) = validate_secret(secret) {
            return Err(AuthError::InvalidInput(e.to_string()));
        }

        // Pre-check is an optimization for the common case; the atomic
        // insert below is the authority on uniqueness
        if self.find_by_email(email)?.is_some() {
            log_auth_event("register", email, false, Some("email already taken"));
            return Err(AuthError::EmailTaken);
        }

        let secret_hash =
            hash_secret(secret).map_err(|e| self.internal("register", email, e.to_string()))?;
        let token = generate_verify_token();
        let account = Account::new_unverified(email, secret_hash, token.clone());

        match self.store.insert(account) {
            Ok(()) => {}
            Err(StoreError::DuplicateEmail) => {
                // Lost the race between the pre-check and the insert
                log_auth_event("register", email, false, Some("email already taken"));
                return Err(AuthError::EmailTaken);
            }
            Err(e) => return Err(self.internal("register", email, e.to_string())),
        }

        // One bounded delivery attempt. A failure is an operator concern,
        // not the caller's: the account already exists and can be unblocked
        // by an out-of-band resend.
        if let Err(e) = self.notifier.send_verification(email, &token) {
            log_auth_event("notify", email, false, Some(&e));
        }

        log_auth_event("register", email, true, None);
        Ok(())
    }

    /// Function to verify an account with an emailed token.
    /// A consumed token and a token that never existed are deliberately
    /// indistinguishable.
    pub fn verify(&self, token: &str) -> Result<(), AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::InvalidInput(
                "a verification token is required".to_string(),
            ));
        }

        let account = match self.store.find_by_token(token) {
            Ok(Some(account)) => account,
            Ok(None) => {
                log_auth_event("verify", token, false, Some("token not found"));
                return Err(AuthError::InvalidOrUsedToken);
            }
            Err(e) => return Err(self.internal("verify", token, e.to_string())),
        };

        match self.store.mark_verified(&account.id) {
            Ok(_) => {
                log_auth_event("verify", &account.email, true, None);
                Ok(())
            }
            // A lost race on the transition behaves like a used token
            Err(StoreError::NotFound) | Err(StoreError::AlreadyVerified) => {
                log_auth_event("verify", &account.email, false, Some("token already consumed"));
                Err(AuthError::InvalidOrUsedToken)
            }
            Err(e) => Err(self.internal("verify", &account.email, e.to_string())),
        }
    }

    /// Function to authenticate an email/secret pair.
    /// No session is minted here; that is the caller's concern.
    pub fn login(&self, email: &str, secret: &str) -> Result<(), AuthError> {
        let email = email.trim();
        if email.is_empty() || secret.is_empty() {
            return Err(AuthError::InvalidInput(
                "email and secret are required".to_string(),
            ));
        }

        // An unknown email and a wrong secret must look identical to the
        // caller, so neither reveals whether the email is registered
        let account = match self.find_by_email(email)? {
            Some(account) => account,
            None => {
                log_auth_event("login", email, false, Some("unknown email"));
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !account.is_verified() {
            log_auth_event("login", email, false, Some("account not verified"));
            return Err(AuthError::AccountNotVerified);
        }

        let matches = verify_secret(secret, &account.secret_hash)
            .map_err(|e| self.internal("login", email, e.to_string()))?;
        if !matches {
            log_auth_event("login", email, false, Some("secret mismatch"));
            return Err(AuthError::InvalidCredentials);
        }

        log_auth_event("login", email, true, None);
        Ok(())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        self.store
            .find_by_email(email)
            .map_err(|e| self.internal("lookup", email, e.to_string()))
    }

    // Infrastructure faults get full detail in the log and a generic
    // message at the boundary
    fn internal(&self, operation: &str, subject: &str, detail: String) -> AuthError {
        log_data_operation(operation, subject, "account_store", false, Some(&detail));
        AuthError::Internal(detail)
    }
}
