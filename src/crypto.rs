//! Password hashing for account credentials.
//!
//! Stored format: `pbkdf2-sha256$<iterations>$<salt b64>$<hash b64>`.
//! Verification derives with the stored parameters and compares in
//! constant time. Rows imported from the legacy store may hold plaintext
//! instead of a hash string; `is_password_hash` lets the login layer
//! detect those (accepted only behind an explicit compatibility flag).

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;
use zeroize::Zeroize;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
pub const HASH_LENGTH: usize = 32;
pub const SALT_LENGTH: usize = 32;

const SCHEME: &str = "pbkdf2-sha256";

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Malformed stored password hash")]
    MalformedHash,
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let salt = generate_salt();
    let mut derived = derive(password, &salt, PBKDF2_ITERATIONS);
    let encoded = format!(
        "{SCHEME}${PBKDF2_ITERATIONS}${}${}",
        STANDARD_NO_PAD.encode(salt),
        STANDARD_NO_PAD.encode(derived),
    );
    derived.zeroize();
    encoded
}

/// Whether a stored credential is a recognized hash string (as opposed to
/// legacy plaintext).
pub fn is_password_hash(stored: &str) -> bool {
    stored.starts_with("pbkdf2-sha256$")
}

/// Verify a supplied password against a stored hash string.
pub fn verify_password(stored: &str, supplied: &str) -> Result<bool, CryptoError> {
    let mut parts = stored.split('$');
    let scheme = parts.next().ok_or(CryptoError::MalformedHash)?;
    if scheme != SCHEME {
        return Err(CryptoError::MalformedHash);
    }
    let iterations: u32 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or(CryptoError::MalformedHash)?;
    let salt = parts
        .next()
        .and_then(|s| STANDARD_NO_PAD.decode(s).ok())
        .ok_or(CryptoError::MalformedHash)?;
    let expected = parts
        .next()
        .and_then(|s| STANDARD_NO_PAD.decode(s).ok())
        .ok_or(CryptoError::MalformedHash)?;
    if parts.next().is_some() || expected.len() != HASH_LENGTH {
        return Err(CryptoError::MalformedHash);
    }

    let mut derived = derive(supplied, &salt, iterations);
    let matches = bool::from(derived.ct_eq(&expected));
    derived.zeroize();
    Ok(matches)
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LENGTH] {
    let mut out = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

/// Generate a cryptographically random salt
fn generate_salt() -> [u8; SALT_LENGTH] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}
