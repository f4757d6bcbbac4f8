//! Core types and traits for the goofer workspace.
//!
//! This crate defines the shared abstractions used across all layers of the
//! goofer API proxy, including the error type, upstream service identifiers,
//! the cached credential model, upstream record shapes, and the async traits
//! that each layer implements.

pub mod error;
pub mod lookup;
pub mod service;
pub mod token;
pub mod traits;

pub use error::{GooferError, Result};
pub use lookup::{Clip, IgdbCover, IgdbGame, LookupResult, SteamGame, StreamInfo, Video};
pub use service::ServiceId;
pub use token::{CachedCredential, IssuedToken, unix_now};
pub use traits::{
    ChannelDirectory, CredentialStore, GameCatalog, GameLibrary, TokenIssuer, TokenProvider,
};
