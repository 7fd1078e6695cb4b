//! Core types for Lobster

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default player executable
pub const DEFAULT_PLAYER: &str = "mpv";
/// Default subtitle language tag
pub const DEFAULT_SUBS_LANGUAGE: &str = "English";
/// Default video quality tag
pub const DEFAULT_VIDEO_QUALITY: &str = "1080p";
/// Default upstream server
pub const DEFAULT_SERVER: &str = "vidcloud";

/// Metadata needed to start playback of one episode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackInfo {
    /// Referer header the media host expects (empty if absent)
    pub referrer: String,
    /// Direct URL of the selected video variant
    pub media_url: String,
    /// Subtitle tracks in the requested language, in payload order
    pub subtitle_urls: Vec<String>,
    /// Display title (empty if absent)
    pub title: String,
}

impl PlaybackInfo {
    /// Check that there is something to play.
    ///
    /// `quality` is the tag that was requested and is only used for the
    /// error message.
    pub fn validate(&self, quality: &str) -> Result<()> {
        if self.media_url.is_empty() {
            return Err(Error::NoMediaUrl {
                quality: quality.to_string(),
            });
        }
        Ok(())
    }

    pub fn has_subtitles(&self) -> bool {
        !self.subtitle_urls.is_empty()
    }
}

/// User preferences, loaded once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Player name or executable path
    pub player: String,
    /// Subtitle language tag to select
    pub subs_language: String,
    /// Video quality tag to select
    pub video_quality: String,
    /// Upstream server to request sources from
    pub server: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            player: DEFAULT_PLAYER.to_string(),
            subs_language: DEFAULT_SUBS_LANGUAGE.to_string(),
            video_quality: DEFAULT_VIDEO_QUALITY.to_string(),
            server: DEFAULT_SERVER.to_string(),
        }
    }
}

/// Host platform, as far as player dispatch cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
    Android,
    Other,
}

impl Platform {
    /// Platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Other
        }
    }

    pub fn is_mobile(&self) -> bool {
        matches!(self, Platform::Android)
    }

    /// Separator between entries of a subtitle file list
    pub fn list_separator(&self) -> char {
        match self {
            Platform::Windows => ';',
            _ => ':',
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Linux => write!(f, "linux"),
            Platform::MacOs => write!(f, "macos"),
            Platform::Windows => write!(f, "windows"),
            Platform::Android => write!(f, "android"),
            Platform::Other => write!(f, "other"),
        }
    }
}

/// Identifies one watch request against the upstream API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRequest {
    pub episode_id: String,
    pub media_id: String,
    pub server: String,
}

impl MediaRequest {
    pub fn new(
        episode_id: impl Into<String>,
        media_id: impl Into<String>,
        server: impl Into<String>,
    ) -> Self {
        Self {
            episode_id: episode_id.into(),
            media_id: media_id.into(),
            server: server.into(),
        }
    }
}
