//! App access tokens for the upstream APIs.
//!
//! [`ClientCredentialsIssuer`] performs the OAuth client-credentials grant and
//! [`CredentialCache`] keeps the resulting token until it expires.

pub mod cache;
pub mod credentials;
pub mod issuer;

pub use cache::CredentialCache;
pub use credentials::ClientCredentials;
pub use issuer::ClientCredentialsIssuer;

use goofer_config::TwitchConfig;
use goofer_types::{CredentialStore, GooferError};
use std::sync::Arc;

/// Build the credential cache for the Twitch app described by `config`.
///
/// # Errors
///
/// Returns [`GooferError::Config`] if the client id or secret is missing.
pub fn twitch_credential_cache(
    http: reqwest::Client,
    config: &TwitchConfig,
    store: Arc<dyn CredentialStore>,
) -> Result<CredentialCache, GooferError> {
    let credentials = ClientCredentials::from_config(config)?;
    let issuer = ClientCredentialsIssuer::new(http, config.token_url.clone(), credentials);
    let client_id = issuer.client_id().to_string();
    Ok(CredentialCache::new(Arc::new(issuer), store, client_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, extract::State, routing::post};
    use goofer_store::InMemoryCredentialStore;
    use goofer_types::TokenProvider as _;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn spawn_token_endpoint(hits: Arc<AtomicUsize>) -> String {
        let router = Router::new()
            .route(
                "/token",
                post(|State(hits): State<Arc<AtomicUsize>>| async move {
                    let n = hits.fetch_add(1, Ordering::SeqCst) + 1;
                    Json(json!({"access_token": format!("app-{n}"), "expires_in": 5_000_000}))
                }),
            )
            .with_state(hits);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}/token")
    }

    fn config(token_url: String) -> TwitchConfig {
        TwitchConfig {
            client_id: Some("cid".into()),
            client_secret: Some("sec".into()),
            token_url,
            ..TwitchConfig::default()
        }
    }

    #[tokio::test]
    async fn test_cache_hits_token_endpoint_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = spawn_token_endpoint(hits.clone()).await;
        let cache = twitch_credential_cache(
            reqwest::Client::new(),
            &config(url),
            Arc::new(InMemoryCredentialStore::new()),
        )
        .unwrap();

        assert_eq!(cache.get_token().await.unwrap(), "app-1");
        assert_eq!(cache.get_token().await.unwrap(), "app-1");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(cache.client_id(), "cid");
    }

    #[test]
    fn test_missing_credentials_fail_fast() {
        let result = twitch_credential_cache(
            reqwest::Client::new(),
            &TwitchConfig::default(),
            Arc::new(InMemoryCredentialStore::new()),
        );
        assert!(matches!(result, Err(GooferError::Config(_))));
    }
}
