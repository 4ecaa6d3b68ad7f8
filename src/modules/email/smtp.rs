use serde::{Deserialize, Serialize};
use std::env;

/// Structure to hold SMTP credentials for the verification mailer
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SmtpCredentials {
    // The email address/username for SMTP authentication
    pub username: String,
    // The password or app-specific password for SMTP
    pub password: String,
    // SMTP server hostname (e.g., smtp.gmail.com)
    pub host: String,
    // SMTP server port (typically 587 for TLS)
    pub port: u16,
}

impl SmtpCredentials {
    /// Read credentials from SMTP_HOST, SMTP_PORT, SMTP_USERNAME and
    /// SMTP_PASSWORD. Returns None when the mailer is not configured,
    /// which callers treat as "log the verification link instead".
    pub fn from_env() -> Option<Self> {
        let host = env::var("SMTP_HOST").ok()?;
        let username = env::var("SMTP_USERNAME").ok()?;
        let password = env::var("SMTP_PASSWORD").ok()?;
        let port = env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(587);

        Some(SmtpCredentials {
            username,
            password,
            host,
            port,
        })
    }
}
