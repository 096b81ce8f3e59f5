//! # fittrack-crypto
//!
//! Credential primitives for fittrack.
//!
//! - **Password hashing**: Argon2id, PHC string format
//! - **Tokens**: 256-bit random values, URL-safe base64
//! - **Token storage**: SHA-256 hex digests
//!
//! ```rust
//! use fittrack_crypto::{hash_password_with, verify_password, PasswordParams};
//!
//! let hash = hash_password_with("hunter22", &PasswordParams::insecure_fast()).unwrap();
//! assert!(verify_password("hunter22", &hash).unwrap());
//! ```

pub mod error;
pub mod password;
pub mod token;

pub use error::{CryptoError, CryptoResult};
pub use password::{hash_password, hash_password_with, verify_password, PasswordParams};
pub use token::{generate_prefixed_token, generate_token, hash_token, TOKEN_BYTES};
