use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::transport::smtp::PoolConfig;
use lettre::{Message, SmtpTransport, Transport};
use log::info;

use super::smtp::SmtpCredentials;
use super::templates::{verification_email_body, verification_link};
use crate::modules::auth::service::VerificationNotifier;
use crate::modules::utils::logging::format_sensitive;

/// Sends verification mail over SMTP with TLS.
///
/// One attempt per request, bounded by a transport timeout; the lifecycle
/// manager treats delivery as best-effort and logs any failure.
pub struct SmtpNotifier {
    credentials: SmtpCredentials,
    verify_base_url: String,
}

impl SmtpNotifier {
    pub fn new(credentials: SmtpCredentials, verify_base_url: &str) -> Self {
        SmtpNotifier {
            credentials,
            verify_base_url: verify_base_url.to_string(),
        }
    }

    /// Function to send an email using the configured credentials
    fn send_email(&self, to_email: &str, subject: &str, body: &str) -> Result<(), String> {
        let creds = &self.credentials;

        // Create email message
        let email = Message::builder()
            .from(
                format!("Credence <{}>", creds.username)
                    .parse()
                    .map_err(|e| format!("Invalid from address: {}", e))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| format!("Invalid to address: {}", e))?)
            .subject(subject)
            .header(lettre::message::header::ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| format!("Failed to create email: {}", e))?;

        // Configure TLS parameters
        let tls_parameters = TlsParameters::builder(creds.host.clone())
            .build()
            .map_err(|e| format!("Failed to build TLS parameters: {}", e))?;

        // Set up SMTP transport with explicit TLS configuration
        let mailer = SmtpTransport::relay(&creds.host)
            .map_err(|e| format!("Failed to create SMTP transport: {}", e))?
            .credentials(Credentials::new(
                creds.username.clone(),
                creds.password.clone(),
            ))
            .port(creds.port)
            .tls(Tls::Required(tls_parameters))
            .pool_config(PoolConfig::new().max_size(1))
            .timeout(Some(std::time::Duration::from_secs(10)))
            .build();

        // Send the email
        mailer
            .send(&email)
            .map(|_| ())
            .map_err(|e| format!("Failed to send email: {}", e))
    }
}

impl VerificationNotifier for SmtpNotifier {
    fn send_verification(&self, to_email: &str, token: &str) -> Result<(), String> {
        let link = verification_link(&self.verify_base_url, token);
        let body = verification_email_body(&link);
        self.send_email(to_email, "Verify your account", &body)?;
        info!("Verification mail sent to {}", format_sensitive(to_email));
        Ok(())
    }
}

/// Fallback notifier that logs the verification link instead of mailing it.
/// Used when SMTP is not configured, so development setups still have a
/// usable link.
pub struct LogNotifier {
    verify_base_url: String,
}

impl LogNotifier {
    pub fn new(verify_base_url: &str) -> Self {
        LogNotifier {
            verify_base_url: verify_base_url.to_string(),
        }
    }
}

impl VerificationNotifier for LogNotifier {
    fn send_verification(&self, to_email: &str, token: &str) -> Result<(), String> {
        info!(
            "SMTP not configured; verification link for {}: {}",
            format_sensitive(to_email),
            verification_link(&self.verify_base_url, token)
        );
        Ok(())
    }
}
