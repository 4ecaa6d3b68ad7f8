// First, declare the modules folder itself
mod modules;

// Re-export everything from modules for easier access
pub use modules::{
    auth,
    email,
    utils,
};

// Re-export commonly used types
pub use modules::auth::account::Account;
pub use modules::auth::service::{AccountService, AuthError, VerificationNotifier};
pub use modules::auth::store::AccountStore;

// Constants
pub const ACCOUNTS_FILE: &str = "accounts.json";
pub const MIN_SECRET_LENGTH: usize = 6;
pub const VERIFY_TOKEN_BYTES: usize = 32;
pub const ACCOUNT_ID_BYTES: usize = 16;
