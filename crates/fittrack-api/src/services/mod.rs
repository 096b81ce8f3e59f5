//! Services used by the account handlers.

pub mod email;
pub mod verification;

pub use email::{EmailConfig, EmailProvider, EmailService};
pub use verification::{TokenPurpose, VerificationTokenStore};
