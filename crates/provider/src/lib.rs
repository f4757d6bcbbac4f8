//! Upstream API clients.
//!
//! Each module implements one of the lookup traits from `goofer_types` for a
//! specific service. [`make_upstreams`] wires them together from [`Config`].

pub mod helix;
pub mod http_util;
pub mod igdb;
pub mod steam;

pub use helix::HelixClient;
pub use http_util::{UpstreamHttp, build_http_client};
pub use igdb::IgdbClient;
pub use steam::SteamClient;

use goofer_config::Config;
use goofer_types::{ChannelDirectory, GameCatalog, GameLibrary, TokenProvider};
use reqwest::Client;
use std::sync::Arc;

/// The set of upstream clients a request handler can reach.
#[derive(Clone)]
pub struct Upstreams {
    pub catalog: Arc<dyn GameCatalog>,
    /// `None` when Steam credentials are not configured.
    pub library: Option<Arc<dyn GameLibrary>>,
    pub channel: Arc<dyn ChannelDirectory>,
}

/// Create every upstream client, sharing one HTTP client and token provider.
pub fn make_upstreams(config: &Config, http: Client, tokens: Arc<dyn TokenProvider>) -> Upstreams {
    let catalog: Arc<dyn GameCatalog> = Arc::new(IgdbClient::new(
        http.clone(),
        config.twitch.igdb_url.clone(),
        Arc::clone(&tokens),
    ));
    let channel: Arc<dyn ChannelDirectory> = Arc::new(HelixClient::new(
        http.clone(),
        config.twitch.helix_url.clone(),
        config.twitch.decapi_url.clone(),
        tokens,
    ));
    let library = config.steam.credentials().map(|(key, steam_id)| {
        Arc::new(SteamClient::new(
            http,
            config.steam.api_url.clone(),
            key,
            steam_id,
            config.steam.count,
        )) as Arc<dyn GameLibrary>
    });
    if library.is_none() {
        tracing::info!("steam credentials not set, recently played games disabled");
    }
    Upstreams {
        catalog,
        library,
        channel,
    }
}
