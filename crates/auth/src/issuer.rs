//! OAuth 2.0 client-credentials grant against the Twitch token endpoint.

use crate::credentials::ClientCredentials;
use async_trait::async_trait;
use goofer_types::{GooferError, IssuedToken, ServiceId, TokenIssuer, traits::Result};

/// Issues app access tokens with a `POST` of form-encoded credentials.
pub struct ClientCredentialsIssuer {
    http: reqwest::Client,
    token_url: String,
    credentials: ClientCredentials,
}

impl ClientCredentialsIssuer {
    pub fn new(
        http: reqwest::Client,
        token_url: impl Into<String>,
        credentials: ClientCredentials,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            credentials,
        }
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.credentials.client_id
    }
}

#[async_trait]
impl TokenIssuer for ClientCredentialsIssuer {
    async fn issue(&self) -> Result<IssuedToken> {
        let resp = self
            .http
            .post(&self.token_url)
            .form(&self.credentials.form())
            .send()
            .await
            .map_err(|e| GooferError::Auth(format!("token request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(service = %ServiceId::TwitchAuth, status = status.as_u16(), "token request rejected");
            return Err(GooferError::Auth(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| GooferError::Auth(format!("failed to parse token response: {e}")))?;
        parse_token_response(&json)
    }
}

/// Parse the token endpoint JSON response into an [`IssuedToken`].
///
/// # Errors
///
/// Returns an error if `access_token` or `expires_in` is missing.
pub fn parse_token_response(json: &serde_json::Value) -> Result<IssuedToken> {
    let access_token = json
        .get("access_token")
        .and_then(serde_json::Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| GooferError::Auth("missing access_token".into()))?
        .to_string();
    let expires_in = json
        .get("expires_in")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| GooferError::Auth("missing expires_in".into()))?;
    let token_type = json
        .get("token_type")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string);

    Ok(IssuedToken {
        access_token,
        expires_in,
        token_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Form, Json, Router, http::StatusCode, routing::post};
    use serde_json::json;
    use std::collections::HashMap;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    #[test]
    fn test_parse_token_ok() {
        let t = parse_token_response(
            &json!({"access_token": "abc", "expires_in": 3600, "token_type": "bearer"}),
        )
        .unwrap();
        assert_eq!(t.access_token, "abc");
        assert_eq!(t.expires_in, 3600);
        assert_eq!(t.token_type.as_deref(), Some("bearer"));
    }

    #[test]
    fn test_parse_token_missing_fields() {
        assert!(parse_token_response(&json!({"expires_in": 10})).is_err());
        assert!(parse_token_response(&json!({"access_token": "abc"})).is_err());
        assert!(parse_token_response(&json!({"access_token": "", "expires_in": 10})).is_err());
    }

    #[tokio::test]
    async fn test_issue_posts_client_credentials_form() {
        let router = Router::new().route(
            "/oauth2/token",
            post(|Form(form): Form<HashMap<String, String>>| async move {
                assert_eq!(form["client_id"], "cid");
                assert_eq!(form["client_secret"], "sec");
                assert_eq!(form["grant_type"], "client_credentials");
                Json(json!({"access_token": "fresh", "expires_in": 5000, "token_type": "bearer"}))
            }),
        );
        let base = spawn(router).await;
        let issuer = ClientCredentialsIssuer::new(
            reqwest::Client::new(),
            format!("{base}/oauth2/token"),
            ClientCredentials::new("cid", "sec"),
        );

        let issued = issuer.issue().await.unwrap();
        assert_eq!(issued.access_token, "fresh");
        assert_eq!(issued.expires_in, 5000);
        assert_eq!(issuer.client_id(), "cid");
    }

    #[tokio::test]
    async fn test_issue_rejected_status_is_auth_error() {
        let router = Router::new().route(
            "/oauth2/token",
            post(|| async { (StatusCode::BAD_REQUEST, r#"{"message":"invalid client"}"#) }),
        );
        let base = spawn(router).await;
        let issuer = ClientCredentialsIssuer::new(
            reqwest::Client::new(),
            format!("{base}/oauth2/token"),
            ClientCredentials::new("cid", "bad"),
        );

        let err = issuer.issue().await.unwrap_err();
        assert!(matches!(err, GooferError::Auth(_)));
        assert!(err.to_string().contains("400"));
    }
}
