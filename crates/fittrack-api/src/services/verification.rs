//! In-process store for email verification and password reset tokens.
//!
//! Tokens live only in memory and are lost on restart. Only the SHA-256 of a
//! token is kept as the map key.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use fittrack_core::defaults::VERIFICATION_TOKEN_TTL_HOURS;
use fittrack_crypto::{generate_token, hash_token};

/// What a token may be exchanged for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    VerifyEmail,
    ResetPassword,
}

#[derive(Debug, Clone)]
struct TokenEntry {
    user_id: Uuid,
    purpose: TokenPurpose,
    expires_at: DateTime<Utc>,
    used: bool,
}

#[derive(Clone)]
pub struct VerificationTokenStore {
    entries: Arc<RwLock<HashMap<String, TokenEntry>>>,
    ttl: Duration,
}

impl Default for VerificationTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationTokenStore {
    pub fn new() -> Self {
        Self::with_ttl(Duration::hours(VERIFICATION_TOKEN_TTL_HOURS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Create a single-use token for `user_id`.
    pub async fn issue(&self, user_id: Uuid, purpose: TokenPurpose) -> String {
        let token = generate_token();
        let entry = TokenEntry {
            user_id,
            purpose,
            expires_at: Utc::now() + self.ttl,
            used: false,
        };
        self.entries.write().await.insert(hash_token(&token), entry);
        debug!(subsystem = "api", component = "verification", %user_id, ?purpose, "Token issued");
        token
    }

    /// Exchange a token for its user id, marking it used.
    ///
    /// Unknown, used, expired and wrong-purpose tokens yield `None`; a
    /// wrong-purpose token stays usable for its own purpose.
    pub async fn consume(&self, token: &str, purpose: TokenPurpose) -> Option<Uuid> {
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(&hash_token(token))?;

        if entry.purpose != purpose {
            warn!(subsystem = "api", component = "verification", "Token presented for wrong purpose");
            return None;
        }
        if entry.used {
            warn!(subsystem = "api", component = "verification", "Token already used");
            return None;
        }
        if Utc::now() >= entry.expires_at {
            warn!(subsystem = "api", component = "verification", "Token expired");
            return None;
        }

        entry.used = true;
        Some(entry.user_id)
    }

    /// Drop used and expired entries. Returns how many were removed.
    pub async fn purge(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| !e.used && e.expires_at > now);
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_issue_and_consume_once() {
        let store = VerificationTokenStore::new();
        let user_id = Uuid::now_v7();
        let token = store.issue(user_id, TokenPurpose::VerifyEmail).await;

        assert_eq!(token.len(), 43);
        assert_eq!(
            store.consume(&token, TokenPurpose::VerifyEmail).await,
            Some(user_id)
        );
        assert_eq!(store.consume(&token, TokenPurpose::VerifyEmail).await, None);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let store = VerificationTokenStore::new();
        assert_eq!(store.consume("nope", TokenPurpose::VerifyEmail).await, None);
    }

    #[tokio::test]
    async fn test_purpose_is_enforced() {
        let store = VerificationTokenStore::new();
        let user_id = Uuid::now_v7();
        let token = store.issue(user_id, TokenPurpose::ResetPassword).await;

        assert_eq!(store.consume(&token, TokenPurpose::VerifyEmail).await, None);
        assert_eq!(
            store.consume(&token, TokenPurpose::ResetPassword).await,
            Some(user_id)
        );
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let store = VerificationTokenStore::with_ttl(Duration::seconds(-1));
        let token = store.issue(Uuid::now_v7(), TokenPurpose::VerifyEmail).await;
        assert_eq!(store.consume(&token, TokenPurpose::VerifyEmail).await, None);
    }

    #[tokio::test]
    async fn test_purge_removes_used_and_expired() {
        let store = VerificationTokenStore::new();
        let used = store.issue(Uuid::now_v7(), TokenPurpose::VerifyEmail).await;
        store.issue(Uuid::now_v7(), TokenPurpose::VerifyEmail).await;
        store.consume(&used, TokenPurpose::VerifyEmail).await;

        assert_eq!(store.purge().await, 1);
        assert_eq!(store.len().await, 1);

        let expired = VerificationTokenStore::with_ttl(Duration::seconds(-1));
        expired.issue(Uuid::now_v7(), TokenPurpose::ResetPassword).await;
        assert_eq!(expired.purge().await, 1);
        assert!(expired.is_empty().await);
    }
}
