//! Configuration loading for the goofer API proxy.
//!
//! Uses figment to layer defaults, an optional YAML file and environment
//! variables. Secrets only ever come from the file or the environment.

pub mod schema;

pub use schema::{Config, LogConfig, LogFormat, SteamConfig, TwitchConfig};
