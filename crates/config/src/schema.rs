use goofer_types::GooferError;
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf};

fn default_port() -> u16 {
    3001
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_channel() -> String {
    "goofer".to_string()
}
fn default_token_url() -> String {
    "https://id.twitch.tv/oauth2/token".to_string()
}
fn default_igdb_url() -> String {
    "https://api.igdb.com/v4".to_string()
}
fn default_helix_url() -> String {
    "https://api.twitch.tv/helix".to_string()
}
fn default_decapi_url() -> String {
    "https://decapi.me".to_string()
}
fn default_steam_api_url() -> String {
    "https://api.steampowered.com".to_string()
}
fn default_steam_count() -> u32 {
    5
}
fn default_log_level() -> String {
    "info".to_string()
}

/// Twitch application credentials and the endpoints they unlock.
///
/// The same app access token authorizes both IGDB and Helix.
#[derive(Clone, Serialize, Deserialize)]
pub struct TwitchConfig {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Broadcaster login whose channel data is proxied.
    #[serde(default = "default_channel")]
    pub channel: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_igdb_url")]
    pub igdb_url: String,
    #[serde(default = "default_helix_url")]
    pub helix_url: String,
    #[serde(default = "default_decapi_url")]
    pub decapi_url: String,
}

impl Default for TwitchConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            channel: default_channel(),
            token_url: default_token_url(),
            igdb_url: default_igdb_url(),
            helix_url: default_helix_url(),
            decapi_url: default_decapi_url(),
        }
    }
}

impl fmt::Debug for TwitchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwitchConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("channel", &self.channel)
            .field("token_url", &self.token_url)
            .field("igdb_url", &self.igdb_url)
            .field("helix_url", &self.helix_url)
            .field("decapi_url", &self.decapi_url)
            .finish()
    }
}

/// Steam Web API access. Optional: the library endpoint is disabled without it.
#[derive(Clone, Serialize, Deserialize)]
pub struct SteamConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    /// 64-bit Steam account id.
    #[serde(default)]
    pub steam_id: Option<u64>,
    #[serde(default = "default_steam_api_url")]
    pub api_url: String,
    /// How many recently played games to request.
    #[serde(default = "default_steam_count")]
    pub count: u32,
}

impl Default for SteamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            steam_id: None,
            api_url: default_steam_api_url(),
            count: default_steam_count(),
        }
    }
}

impl fmt::Debug for SteamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SteamConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("steam_id", &self.steam_id)
            .field("api_url", &self.api_url)
            .field("count", &self.count)
            .finish()
    }
}

impl SteamConfig {
    /// Returns `(api_key, steam_id)` when both halves are present.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, u64)> {
        match (self.api_key.as_deref(), self.steam_id) {
            (Some(key), Some(id)) if !key.trim().is_empty() => Some((key, id)),
            _ => None,
        }
    }
}

/// Log output encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    /// Directory for daily-rotated log files. Console only when unset.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            file: None,
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Listen port (defaults to 3001).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Listen address (defaults to `127.0.0.1`).
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub twitch: TwitchConfig,
    #[serde(default)]
    pub steam: SteamConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            twitch: TwitchConfig::default(),
            steam: SteamConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// Environment variable → config key path.
const ENV_KEYS: &[(&str, &str)] = &[
    ("TWITCH_CLIENT_ID", "twitch.client_id"),
    ("TWITCH_CLIENT_SECRET", "twitch.client_secret"),
    ("TWITCH_CHANNEL", "twitch.channel"),
    ("STEAM_API_KEY", "steam.api_key"),
    ("STEAM_ID", "steam.steam_id"),
    ("GOOFER_HOST", "host"),
    ("GOOFER_PORT", "port"),
    ("GOOFER_LOG_LEVEL", "log.level"),
    ("GOOFER_LOG_FORMAT", "log.format"),
];

fn env_provider() -> figment::providers::Env {
    figment::providers::Env::raw().filter_map(|key| {
        ENV_KEYS
            .iter()
            .find(|(var, _)| key.as_str().eq_ignore_ascii_case(var))
            .map(|(_, path)| (*path).into())
    })
}

impl Config {
    /// Parses configuration from a YAML string, merged with defaults.
    ///
    /// The environment is not consulted.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the YAML is invalid or extraction fails.
    #[allow(clippy::result_large_err)]
    pub fn from_yaml(yaml: &str) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Format as _, Serialized, Yaml},
        };
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::string(yaml))
            .extract()
    }

    /// Loads configuration: defaults, then the optional YAML file, then the
    /// environment (`TWITCH_CLIENT_ID`, `STEAM_API_KEY`, `GOOFER_PORT`, …).
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the file cannot be read or a value has
    /// the wrong type.
    #[allow(clippy::result_large_err)]
    pub fn load(path: Option<&std::path::Path>) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Format as _, Serialized, Yaml},
        };
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(env_provider()).extract()
    }

    /// Checks that required secrets are present.
    ///
    /// Twitch credentials are mandatory. Steam is optional, but a half
    /// configured pair is rejected rather than silently ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GooferError::Config`] naming the first missing setting.
    pub fn validate(&self) -> Result<(), GooferError> {
        if blank(self.twitch.client_id.as_deref()) {
            return Err(GooferError::Config(
                "twitch.client_id (TWITCH_CLIENT_ID) is not set".into(),
            ));
        }
        if blank(self.twitch.client_secret.as_deref()) {
            return Err(GooferError::Config(
                "twitch.client_secret (TWITCH_CLIENT_SECRET) is not set".into(),
            ));
        }
        let has_key = !blank(self.steam.api_key.as_deref());
        let has_id = self.steam.steam_id.is_some();
        if has_key != has_id {
            return Err(GooferError::Config(
                "steam.api_key (STEAM_API_KEY) and steam.steam_id (STEAM_ID) must be set together"
                    .into(),
            ));
        }
        Ok(())
    }
}

fn blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
