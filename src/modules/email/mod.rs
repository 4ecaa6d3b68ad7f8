pub mod notifier;
pub mod smtp;
mod templates;

pub use notifier::{LogNotifier, SmtpNotifier};
pub use smtp::SmtpCredentials;
pub use templates::{verification_email_body, verification_link};
