//! The credential cache: reuse the stored app token until it expires.
//!
//! Responsibilities:
//! - Load the current credential from a [`CredentialStore`].
//! - Return it untouched while `now < expires_at`.
//! - Otherwise issue a fresh token and store it with `now + expires_in`.
//!
//! Concurrent callers that all miss may each issue a token; the store keeps
//! whichever write lands last.
use goofer_types::{
    CachedCredential, CredentialStore, TokenIssuer, TokenProvider, traits::Result, unix_now,
};
use std::sync::Arc;

pub struct CredentialCache {
    issuer: Arc<dyn TokenIssuer>,
    store: Arc<dyn CredentialStore>,
    client_id: String,
}

impl CredentialCache {
    pub fn new(
        issuer: Arc<dyn TokenIssuer>,
        store: Arc<dyn CredentialStore>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            issuer,
            store,
            client_id: client_id.into(),
        }
    }

    /// Retrieve a valid credential, issuing a new one if absent or expired.
    ///
    /// # Errors
    ///
    /// Propagates issuance and storage failures. Nothing is retried and a
    /// failed issuance leaves the store untouched.
    pub async fn credential(&self) -> Result<CachedCredential> {
        let now = unix_now();
        if let Some(cached) = self.store.load().await?
            && cached.is_valid_at(now)
        {
            tracing::trace!(expires_at = cached.expires_at, "reusing cached credential");
            return Ok(cached);
        }

        let issued = self.issuer.issue().await?;
        let fresh = CachedCredential::from_issued(issued, unix_now());
        self.store.save(&fresh).await?;
        tracing::debug!(
            client_id = %self.client_id,
            expires_at = fresh.expires_at,
            "issued new app access token"
        );
        Ok(fresh)
    }

    /// Forget the stored credential so the next call issues a new one.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    pub async fn invalidate(&self) -> Result<()> {
        self.store.clear().await
    }
}

#[async_trait::async_trait]
impl TokenProvider for CredentialCache {
    async fn get_token(&self) -> Result<String> {
        Ok(self.credential().await?.token)
    }

    fn client_id(&self) -> &str {
        &self.client_id
    }
}
