//! Opaque random tokens.
//!
//! Bearer tokens and email verification tokens are random bytes encoded as
//! URL-safe base64. Only the SHA-256 hash of a bearer token is persisted.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random bytes in a generated token.
pub const TOKEN_BYTES: usize = 32;

/// Generate a URL-safe random token of [`TOKEN_BYTES`] bytes.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a token carrying a fixed prefix, e.g. `ft_at_...`.
pub fn generate_prefixed_token(prefix: &str) -> String {
    format!("{prefix}{}", generate_token())
}

/// Hex-encoded SHA-256 of a token.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
