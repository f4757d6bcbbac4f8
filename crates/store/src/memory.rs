//! In-memory credential slot backed by an `ArcSwapOption`.

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use goofer_types::{CachedCredential, CredentialStore, traits::Result};
use std::sync::Arc;

/// A process-wide [`CredentialStore`]; lost on restart.
///
/// Reads are lock-free and concurrent writers race with last-write-wins
/// semantics, which is fine because every stored token is valid on its own.
pub struct InMemoryCredentialStore {
    slot: ArcSwapOption<CachedCredential>,
}

impl InMemoryCredentialStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: ArcSwapOption::empty(),
        }
    }

    /// Creates a store pre-populated with `credential`.
    #[must_use]
    pub fn with_credential(credential: CachedCredential) -> Self {
        Self {
            slot: ArcSwapOption::new(Some(Arc::new(credential))),
        }
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self) -> Result<Option<CachedCredential>> {
        Ok(self.slot.load_full().map(|c| (*c).clone()))
    }

    async fn save(&self, credential: &CachedCredential) -> Result<()> {
        self.slot.store(Some(Arc::new(credential.clone())));
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.slot.store(None);
        Ok(())
    }
}
