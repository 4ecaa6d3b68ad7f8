pub mod account;
pub mod secret;
pub mod service;
pub mod store;
pub mod token;

pub use account::Account;
pub use service::{AccountService, AuthError, VerificationNotifier};
pub use store::{AccountStore, StoreError};
