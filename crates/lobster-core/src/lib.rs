//! Lobster Core - stream lookup and player dispatch
//!
//! This crate provides the pieces between an aggregation API and a local
//! media player:
//! - Watch endpoint client with a bounded request timeout
//! - Source payload decoding and quality/language selection
//! - Player argument building (mpv family, IINA, VLC, Android intents)
//! - Process launching with interrupt handling
//! - `key=value` preference file bootstrap
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   bytes   ┌──────────────┐  PlaybackInfo  ┌──────────────┐
//! │  WatchClient │ ────────▶ │  Extractor   │ ─────────────▶ │  Dispatcher  │
//! │    (api)     │           │ (extractor)  │                │   (player)   │
//! └──────────────┘           └──────────────┘                └──────┬───────┘
//!        ▲                          ▲                               │
//!        │        Preferences       │                               ▼
//!        └────────── (config) ──────┴───────────────────────  Launcher trait
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod extractor;
pub mod player;
pub mod types;

pub use api::{WatchClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use config::{default_config_path, load_or_create, parse_config, render_config};
pub use error::{Error, Result};
pub use extractor::{extract, SourceCatalog, SubtitleTrack, VideoSource};
pub use player::{dispatch, plan, Invocation, Launcher, PlayerKind, ProcessLauncher};
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log library initialisation
pub fn init() {
    tracing::info!(version = VERSION, "Lobster Core initialized");
}
