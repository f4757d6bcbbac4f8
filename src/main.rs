mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use goofer_auth::CredentialCache;
use goofer_config::Config;
use goofer_provider::{build_http_client, make_upstreams};
use goofer_proxy::AppState;
use goofer_store::{InMemoryCredentialStore, SqliteCredentialStore};
use goofer_types::CredentialStore;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

#[derive(Parser, Debug)]
#[command(name = "goofer", version, about = "goofer — API proxy for goofer.live")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the API server.
    Serve {
        /// Path to the YAML configuration file.
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Override the listening port (default: 3001).
        #[arg(short, long)]
        port: Option<u16>,
        /// Override the listening address (default: 127.0.0.1).
        #[arg(long)]
        host: Option<String>,
        /// Persist the app token in this SQLite database instead of memory.
        #[arg(long, value_name = "PATH")]
        db: Option<PathBuf>,
    },
    /// Look up a game cover once and print its URL.
    Cover {
        /// Game name to search for.
        name: String,
        /// Path to the YAML configuration file.
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Obtain an app access token and show when it expires.
    Token {
        /// Path to the YAML configuration file.
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// SQLite database holding the cached token.
        #[arg(long, value_name = "PATH")]
        db: Option<PathBuf>,
        /// Drop the cached token and issue a new one.
        #[arg(long)]
        refresh: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            port,
            host,
            db,
        } => cmd_serve(config, port, host, db).await,
        Commands::Cover { name, config } => cmd_cover(name, config).await,
        Commands::Token {
            config,
            db,
            refresh,
        } => cmd_token(config, db, refresh).await,
    }
}

async fn cmd_serve(
    config_path: Option<PathBuf>,
    port: Option<u16>,
    host: Option<String>,
    db: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config(config_path.as_deref())?;
    if let Some(p) = port {
        config.port = p;
    }
    if let Some(h) = host {
        config.host = h;
    }
    let _log_guard = logging::init_tracing(&config.log)?;

    let http = build_http_client();
    let tokens = credential_cache(&config, http.clone(), db.as_deref()).await?;
    let upstreams = make_upstreams(&config, http, tokens);
    let app = goofer_proxy::make_router(AppState::new(&config, upstreams));

    // Prefer a socket handed over by systemfd / systemd.
    let listener = match listenfd::ListenFd::from_env().take_tcp_listener(0)? {
        Some(std_listener) => {
            std_listener.set_nonblocking(true)?;
            tokio::net::TcpListener::from_std(std_listener)?
        }
        None => tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?,
    };
    tracing::info!(
        addr = %listener.local_addr()?,
        channel = %config.twitch.channel,
        "goofer listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn cmd_cover(name: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let _log_guard = logging::init_tracing(&config.log)?;

    let http = build_http_client();
    let tokens = credential_cache(&config, http.clone(), None).await?;
    let upstreams = make_upstreams(&config, http, tokens);
    let result = goofer_proxy::lookup_cover(upstreams.catalog.as_ref(), &name)
        .await
        .map_err(|e| anyhow::anyhow!("cover lookup failed: {e}"))?;
    match result.into_value() {
        Some(url) => {
            println!("{url}");
            Ok(())
        }
        None => anyhow::bail!("no cover found for {name:?}"),
    }
}

async fn cmd_token(config_path: Option<PathBuf>, db: Option<PathBuf>, refresh: bool) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    let _log_guard = logging::init_tracing(&config.log)?;

    let cache = credential_cache(&config, build_http_client(), db.as_deref()).await?;
    if refresh {
        cache.invalidate().await?;
    }
    let credential = cache.credential().await?;
    println!("token:   {}", credential.masked());
    println!(
        "expires: in {}s (unix {})",
        credential.remaining().as_secs(),
        credential.expires_at
    );
    Ok(())
}

/// Load and validate configuration; missing Twitch credentials abort here.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = Config::load(path).map_err(|e| anyhow::anyhow!("config error: {e}"))?;
    config.validate()?;
    Ok(config)
}

async fn credential_cache(
    config: &Config,
    http: reqwest::Client,
    db: Option<&Path>,
) -> Result<Arc<CredentialCache>> {
    let store: Arc<dyn CredentialStore> = match db {
        Some(path) => {
            let client_id = config.twitch.client_id.as_deref().unwrap_or_default();
            Arc::new(open_store(path, client_id).await?)
        }
        None => Arc::new(InMemoryCredentialStore::new()),
    };
    let cache = goofer_auth::twitch_credential_cache(http, &config.twitch, store)?;
    Ok(Arc::new(cache))
}

async fn open_store(path: &Path, client_id: &str) -> Result<SqliteCredentialStore> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let url = format!("sqlite://{}", path.display());
    SqliteCredentialStore::new(&url, format!("twitch:{}", client_id.trim()))
        .await
        .map_err(|e| anyhow::anyhow!("database error: {e}"))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
