//! Source payload extraction
//!
//! The watch endpoint answers with JSON describing video variants,
//! subtitle tracks and the headers the media host wants. The exact shape
//! drifts between providers, so decoding is schema-light:
//!
//! - any object with string `url` and `quality` fields is a video source
//! - any object with string `url` and `lang` fields is a subtitle track
//! - any string field named `Referer` (case-insensitive, `Referrer` too) is
//!   the referrer
//! - any string field named `title` is the display title
//!
//! Objects are found at any depth. The body may hold several JSON values
//! back to back (one per line, for instance); they are walked in order.
//!
//! # Example
//!
//! ```rust
//! use lobster_core::extractor::extract;
//!
//! let payload = br#"{
//!     "headers": {"Referer": "https://host.example/"},
//!     "sources": [{"url": "http://x/a.m3u8", "quality": "1080p"}],
//!     "subtitles": [{"url": "http://x/en.vtt", "lang": "English"}]
//! }"#;
//!
//! let info = extract(payload, "1080p", "English").unwrap();
//! assert_eq!(info.media_url, "http://x/a.m3u8");
//! assert_eq!(info.subtitle_urls, vec!["http://x/en.vtt"]);
//! ```

use crate::error::{Error, Result};
use crate::types::PlaybackInfo;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// One video variant offered by the payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSource {
    pub url: String,
    pub quality: String,
    /// `isM3U8` flag, when the provider sends one
    pub is_m3u8: Option<bool>,
}

/// One subtitle track offered by the payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    pub url: String,
    pub lang: String,
}

/// Everything the payload offers, before any preference is applied
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCatalog {
    pub referrer: Option<String>,
    pub title: Option<String>,
    pub sources: Vec<VideoSource>,
    pub subtitles: Vec<SubtitleTrack>,
}

impl SourceCatalog {
    /// Decode a raw response body
    pub fn decode(payload: &[u8]) -> Result<Self> {
        if payload.iter().all(u8::is_ascii_whitespace) {
            return Err(Error::Decode("empty payload".to_string()));
        }

        let mut catalog = SourceCatalog::default();
        let mut objects = 0usize;

        for value in serde_json::Deserializer::from_slice(payload).into_iter::<Value>() {
            let value = value?;
            if contains_object(&value) {
                objects += 1;
            }
            catalog.walk(&value);
        }

        if objects == 0 {
            return Err(Error::Decode("payload holds no JSON object".to_string()));
        }

        debug!(
            sources = catalog.sources.len(),
            subtitles = catalog.subtitles.len(),
            has_referrer = catalog.referrer.is_some(),
            "Payload decoded"
        );

        Ok(catalog)
    }

    fn walk(&mut self, value: &Value) {
        match value {
            Value::Object(map) => {
                self.collect_entry(map);
                for (key, child) in map {
                    match child {
                        Value::String(s) if is_referrer_key(key) => self.referrer = Some(s.clone()),
                        Value::String(s) if key == "title" => self.title = Some(s.clone()),
                        _ => self.walk(child),
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.walk(item);
                }
            }
            _ => {}
        }
    }

    fn collect_entry(&mut self, map: &Map<String, Value>) {
        let Some(url) = map.get("url").and_then(Value::as_str) else {
            return;
        };

        if let Some(quality) = map.get("quality").and_then(Value::as_str) {
            self.sources.push(VideoSource {
                url: url.to_string(),
                quality: quality.to_string(),
                is_m3u8: map.get("isM3U8").and_then(Value::as_bool),
            });
        } else if let Some(lang) = map.get("lang").and_then(Value::as_str) {
            self.subtitles.push(SubtitleTrack {
                url: url.to_string(),
                lang: lang.to_string(),
            });
        }
    }

    /// Apply quality and language preferences.
    ///
    /// The first source whose quality tag equals `quality` wins. Every
    /// subtitle whose language tag equals `language` is kept, in order.
    pub fn select(&self, quality: &str, language: &str) -> PlaybackInfo {
        let media_url = self
            .sources
            .iter()
            .find(|s| s.quality == quality)
            .map(|s| s.url.clone())
            .unwrap_or_default();

        let subtitle_urls = self
            .subtitles
            .iter()
            .filter(|t| t.lang == language)
            .map(|t| t.url.clone())
            .collect();

        PlaybackInfo {
            referrer: self.referrer.clone().unwrap_or_default(),
            media_url,
            subtitle_urls,
            title: self.title.clone().unwrap_or_default(),
        }
    }

    /// Distinct quality tags, in payload order
    pub fn available_qualities(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for source in &self.sources {
            if !seen.contains(&source.quality.as_str()) {
                seen.push(source.quality.as_str());
            }
        }
        seen
    }

    /// Distinct subtitle language tags, in payload order
    pub fn available_languages(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for track in &self.subtitles {
            if !seen.contains(&track.lang.as_str()) {
                seen.push(track.lang.as_str());
            }
        }
        seen
    }
}

/// Decode `payload` and select the variant and subtitles matching
/// `quality` and `language`.
///
/// A missing field is not an error; it comes back empty. Use
/// [`PlaybackInfo::validate`] before handing the result to a player.
pub fn extract(payload: &[u8], quality: &str, language: &str) -> Result<PlaybackInfo> {
    Ok(SourceCatalog::decode(payload)?.select(quality, language))
}

fn is_referrer_key(key: &str) -> bool {
    key.eq_ignore_ascii_case("referer") || key.eq_ignore_ascii_case("referrer")
}

fn contains_object(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(items) => items.iter().any(contains_object),
        _ => false,
    }
}
