//! Shared HTTP utilities for the upstream clients.
//!
//! Every client goes through the same send → status-check → decode path so
//! upstream failures surface uniformly as [`GooferError::Upstream`] or
//! [`GooferError::Http`].

use goofer_types::{GooferError, ServiceId, traits::Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

const USER_AGENT: &str = concat!("goofer-live/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by every upstream client.
#[must_use]
pub fn build_http_client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to build tuned http client, using defaults");
            Client::new()
        })
}

/// HTTP helper bound to one upstream service.
#[derive(Clone)]
pub struct UpstreamHttp {
    http: Client,
    service: ServiceId,
}

impl UpstreamHttp {
    /// Creates a new helper wrapping the given HTTP client.
    #[must_use]
    pub fn new(http: Client, service: ServiceId) -> Self {
        Self { http, service }
    }

    /// Returns a reference to the inner HTTP client for building requests.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.http
    }

    /// Sends a request and checks for success status.
    ///
    /// Request URLs are stripped from transport errors because some carry API
    /// keys in the query string.
    ///
    /// # Errors
    ///
    /// Returns `GooferError::Upstream` on non-success HTTP status codes,
    /// or `GooferError::Http` if the request fails to send.
    pub async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response> {
        let resp = builder
            .send()
            .await
            .map_err(|e| GooferError::http(self.service, e.without_url()))?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(service = %self.service, status = status.as_u16(), body = %body, "upstream rejected request");
            Err(GooferError::Upstream {
                service: self.service,
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Sends a request and decodes a JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send), plus `GooferError::Http` if the body is
    /// not the expected JSON.
    pub async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let resp = self.send(builder).await?;
        resp.json::<T>()
            .await
            .map_err(|e| GooferError::http(self.service, e.without_url()))
    }

    /// Sends a request and returns the body as text.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    pub async fn text(&self, builder: RequestBuilder) -> Result<String> {
        let resp = self.send(builder).await?;
        resp.text()
            .await
            .map_err(|e| GooferError::http(self.service, e.without_url()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::get};
    use serde_json::{Value, json};

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_success_decodes_json() {
        let base = spawn(Router::new().route("/ok", get(|| async { Json(json!({"a": 1})) }))).await;
        let http = UpstreamHttp::new(Client::new(), ServiceId::Steam);
        let v: Value = http.json(http.client().get(format!("{base}/ok"))).await.unwrap();
        assert_eq!(v["a"], 1);
    }

    #[tokio::test]
    async fn test_error_status_becomes_upstream_error() {
        let base = spawn(Router::new().route(
            "/fail",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "kaput") }),
        ))
        .await;
        let http = UpstreamHttp::new(Client::new(), ServiceId::Igdb);
        let err = http
            .send(http.client().get(format!("{base}/fail")))
            .await
            .unwrap_err();
        match err {
            GooferError::Upstream {
                service,
                status,
                body,
            } => {
                assert_eq!(service, ServiceId::Igdb);
                assert_eq!(status, 500);
                assert_eq!(body, "kaput");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_http_error() {
        let base = spawn(Router::new().route("/html", get(|| async { "<html>" }))).await;
        let http = UpstreamHttp::new(Client::new(), ServiceId::Helix);
        let err = http
            .json::<Value>(http.client().get(format!("{base}/html")))
            .await
            .unwrap_err();
        assert!(matches!(err, GooferError::Http { service: ServiceId::Helix, .. }));
    }

    #[tokio::test]
    async fn test_transport_error_hides_url() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let http = UpstreamHttp::new(Client::new(), ServiceId::Steam);
        let err = http
            .send(http.client().get(format!("http://127.0.0.1:{port}/?key=SECRET")))
            .await
            .unwrap_err();
        assert!(matches!(err, GooferError::Http { .. }));
        assert!(!err.to_string().contains("SECRET"));
    }
}
