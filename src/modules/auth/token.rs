use rand::rngs::OsRng;
use rand::RngCore;

use crate::VERIFY_TOKEN_BYTES;

/// Function to generate a single-use verification token.
///
/// 32 bytes from the OS CSPRNG, hex-encoded into a fixed-length printable
/// string. At 256 bits of entropy, reuse within the lifetime of the system
/// is probabilistically impossible, so no uniqueness bookkeeping is needed.
pub fn generate_verify_token() -> String {
    let mut bytes = [0u8; VERIFY_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
