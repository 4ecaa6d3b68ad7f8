use pbkdf2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::Pbkdf2;
use rand::rngs::OsRng;

use crate::MIN_SECRET_LENGTH;

/// Secret policy violations, reported to callers as invalid input
#[derive(Debug, PartialEq)]
pub enum SecretPolicyError {
    TooShort,
}

impl std::fmt::Display for SecretPolicyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretPolicyError::TooShort => write!(
                f,
                "secret must be at least {} characters long",
                MIN_SECRET_LENGTH
            ),
        }
    }
}

/// Environment-level hashing failure. A mismatching secret is never an
/// error, only a `false` result from `verify_secret`.
#[derive(Debug)]
pub struct HashError(pub String);

impl std::fmt::Display for HashError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hashing failure: {}", self.0)
    }
}

impl std::error::Error for HashError {}

/// Function to validate a plaintext secret against the registration policy
pub fn validate_secret(secret: &str) -> Result<(), SecretPolicyError> {
    if secret.chars().count() < MIN_SECRET_LENGTH {
        return Err(SecretPolicyError::TooShort);
    }
    Ok(())
}

/// Function to hash a plaintext secret with PBKDF2 and a fresh random salt.
/// The salt is embedded in the returned PHC record, so hashing the same
/// secret twice produces different records.
pub fn hash_secret(secret: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);

    Pbkdf2
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HashError(format!("failed to hash secret: {}", e)))
}

/// Function to check a plaintext secret against a stored PHC record.
/// The underlying comparison is constant-time.
pub fn verify_secret(secret: &str, record: &str) -> Result<bool, HashError> {
    let parsed = PasswordHash::new(record)
        .map_err(|e| HashError(format!("invalid secret hash record: {}", e)))?;

    match Pbkdf2.verify_password(secret.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(pbkdf2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(HashError(format!("failed to verify secret: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_policy() {
        // Exactly the minimum length passes
        assert!(validate_secret("secret").is_ok());
        assert!(validate_secret("a much longer secret").is_ok());

        // One below the minimum fails
        assert!(matches!(
            validate_secret("short"),
            Err(SecretPolicyError::TooShort)
        ));
        assert!(matches!(validate_secret(""), Err(SecretPolicyError::TooShort)));
    }

    #[test]
    fn test_hash_round_trip() {
        let secret = "correct horse battery";
        let record = hash_secret(secret).unwrap();

        assert!(verify_secret(secret, &record).unwrap());
        assert!(!verify_secret("wrong horse battery", &record).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let secret = "same secret twice";

        let first = hash_secret(secret).unwrap();
        let second = hash_secret(secret).unwrap();

        // Per-call random salts make the records differ
        assert_ne!(first, second);

        // Both still verify against the original secret
        assert!(verify_secret(secret, &first).unwrap());
        assert!(verify_secret(secret, &second).unwrap());
    }

    #[test]
    fn test_malformed_record_is_an_error() {
        let result = verify_secret("anything", "not-a-phc-record");
        assert!(result.is_err());
    }

    #[test]
    fn test_record_is_phc_formatted() {
        let record = hash_secret("some secret").unwrap();

        // PHC strings identify the algorithm and carry the salt inline
        assert!(record.starts_with("$pbkdf2-sha256$"));
    }
}
