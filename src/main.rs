use clap::{Arg, Command}; // Import necessary modules from clap for command-line argument parsing
use rpassword::read_password; // For securely reading secrets
use std::io::{self, Write};

use credence::auth::service::{AccountService, AuthError};
use credence::auth::store::AccountStore;
use credence::email::{LogNotifier, SmtpCredentials, SmtpNotifier};
use credence::utils::logging::initialize_logging;
use credence::{VerificationNotifier, ACCOUNTS_FILE};

// Main function to handle command-line arguments and account operations.
// This binary is only a thin front end; all business rules live in the
// AccountService.
fn main() {
    if let Err(e) = initialize_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let matches = build_cli().get_matches(); // Parse the command-line arguments

    // Open the account store
    let store_path = matches.get_one::<String>("store").unwrap(); // Has a default value
    let store = match AccountStore::open(store_path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Failed to open account store: {}", e);
            std::process::exit(1);
        }
    };

    // Use SMTP when configured, otherwise log the verification link
    let verify_base_url = std::env::var("VERIFY_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());
    let notifier: Box<dyn VerificationNotifier> = match SmtpCredentials::from_env() {
        Some(creds) => Box::new(SmtpNotifier::new(creds, &verify_base_url)),
        None => Box::new(LogNotifier::new(&verify_base_url)),
    };

    let service = AccountService::new(store, notifier);

    // Handle the "register" subcommand
    if let Some(sub_matches) = matches.subcommand_matches("register") {
        let email = sub_matches.get_one::<String>("email").unwrap(); // Get the email address

        let secret = match prompt_secret("Choose a secret (at least 6 characters): ") {
            Ok(secret) => secret,
            Err(e) => {
                eprintln!("Failed to read secret: {}", e);
                std::process::exit(1);
            }
        };

        match service.register(email, &secret) {
            Ok(()) => println!("Registered. Please check your email to verify the account."),
            Err(e) => report_failure("Registration", &e),
        }
    }

    // Handle the "verify" subcommand
    if let Some(sub_matches) = matches.subcommand_matches("verify") {
        let token = sub_matches.get_one::<String>("token").unwrap(); // Get the verification token

        match service.verify(token) {
            Ok(()) => println!("Account verified. You can now log in."),
            Err(e) => report_failure("Verification", &e),
        }
    }

    // Handle the "login" subcommand
    if let Some(sub_matches) = matches.subcommand_matches("login") {
        let email = sub_matches.get_one::<String>("email").unwrap(); // Get the email address

        let secret = match prompt_secret("Secret: ") {
            Ok(secret) => secret,
            Err(e) => {
                eprintln!("Failed to read secret: {}", e);
                std::process::exit(1);
            }
        };

        match service.login(email, &secret) {
            Ok(()) => println!("Login successful."),
            Err(e) => report_failure("Login", &e),
        }
    }
}

// Function to define the command-line interface using clap
fn build_cli() -> Command {
    Command::new("credence") // Create a new Clap command with the name "credence"
        .about("Account registration, email verification and login") // Set the description for the command-line tool
        .subcommand_required(true) // Running without a subcommand prints usage instead of silently exiting
        .arg(
            Arg::new("store")
                .long("store")
                .help("Path to the accounts file")
                .value_name("FILE")
                .default_value(ACCOUNTS_FILE),
        )
        .subcommand(
            Command::new("register")
                .about("Register a new account") // Description for the "register" subcommand
                .arg(
                    Arg::new("email")
                        .help("Email address for the new account")
                        .required(true),
                ), // Define the "email" argument (required)
        )
        .subcommand(
            Command::new("verify")
                .about("Verify an account with an emailed token") // Description for the "verify" subcommand
                .arg(
                    Arg::new("token")
                        .help("The verification token from the email")
                        .required(true),
                ), // Define the "token" argument (required)
        )
        .subcommand(
            Command::new("login")
                .about("Log in with email and secret") // Description for the "login" subcommand
                .arg(
                    Arg::new("email")
                        .help("Email address of the account")
                        .required(true),
                ), // Define the "email" argument (required)
        )
}

/// Helper function to prompt for a secret without echoing it
fn prompt_secret(prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    read_password()
}

/// Print a user-facing failure message and exit non-zero
fn report_failure(operation: &str, error: &AuthError) {
    eprintln!("{} failed: {}", operation, error);
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_a_subcommand() {
        // Bare invocation must fail parsing instead of silently doing nothing
        let result = build_cli().try_get_matches_from(["credence"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_accepts_known_subcommands() {
        let matches = build_cli()
            .try_get_matches_from(["credence", "register", "user@example.com"])
            .unwrap();
        assert_eq!(matches.subcommand_name(), Some("register"));

        let matches = build_cli()
            .try_get_matches_from(["credence", "--store", "other.json", "verify", "tok"])
            .unwrap();
        assert_eq!(matches.get_one::<String>("store").unwrap(), "other.json");
        assert_eq!(matches.subcommand_name(), Some("verify"));
    }
}
