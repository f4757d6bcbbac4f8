//! Twitch application credentials.
//!
//! Sourced from configuration only; nothing is baked into the binary.

use goofer_config::TwitchConfig;
use goofer_types::GooferError;
use secrecy::{ExposeSecret as _, SecretString};

/// `client_id` / `client_secret` pair for the client-credentials grant.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    /// OAuth 2.0 client ID; also sent as the `Client-ID` header upstream.
    pub client_id: String,
    /// OAuth 2.0 client secret, redacted from `Debug`.
    pub client_secret: SecretString,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
        }
    }

    /// Extract credentials from the `twitch` config section.
    ///
    /// # Errors
    ///
    /// Returns [`GooferError::Config`] if either value is missing or blank.
    pub fn from_config(config: &TwitchConfig) -> Result<Self, GooferError> {
        let client_id = non_blank(config.client_id.as_deref())
            .ok_or_else(|| GooferError::Config("missing Twitch client id".into()))?;
        let client_secret = non_blank(config.client_secret.as_deref())
            .ok_or_else(|| GooferError::Config("missing Twitch client secret".into()))?;
        Ok(Self::new(client_id, client_secret))
    }

    /// Form body of the client-credentials token request.
    pub(crate) fn form(&self) -> [(&'static str, &str); 3] {
        [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
            ("grant_type", "client_credentials"),
        ]
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let cfg = TwitchConfig {
            client_id: Some("cid".into()),
            client_secret: Some(" secret ".into()),
            ..TwitchConfig::default()
        };
        let creds = ClientCredentials::from_config(&cfg).unwrap();
        assert_eq!(creds.client_id, "cid");
        assert_eq!(creds.client_secret.expose_secret(), "secret");
    }

    #[test]
    fn test_from_config_missing_secret() {
        let cfg = TwitchConfig {
            client_id: Some("cid".into()),
            ..TwitchConfig::default()
        };
        assert!(matches!(
            ClientCredentials::from_config(&cfg),
            Err(GooferError::Config(_))
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let creds = ClientCredentials::new("cid", "hunter2");
        assert!(!format!("{creds:?}").contains("hunter2"));
    }

    #[test]
    fn test_form_fields() {
        let creds = ClientCredentials::new("cid", "sec");
        let form = creds.form();
        assert_eq!(form[0], ("client_id", "cid"));
        assert_eq!(form[1], ("client_secret", "sec"));
        assert_eq!(form[2], ("grant_type", "client_credentials"));
    }
}
