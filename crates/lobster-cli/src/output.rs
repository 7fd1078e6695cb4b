//! Output formatting for CLI

use lobster_core::{MediaRequest, PlaybackInfo, Platform, Preferences};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Output format options
pub enum OutputFormat {
    Text,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

/// Format output based on selected format
pub fn format_output<T: Serialize + fmt::Display>(data: &T, format: &str) -> anyhow::Result<String> {
    match OutputFormat::from(format) {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Text => Ok(data.to_string()),
    }
}

pub fn print_output<T: Serialize + fmt::Display>(data: &T, format: &str) -> anyhow::Result<()> {
    println!("{}", format_output(data, format)?);
    Ok(())
}

/// Result of `lobster info`
#[derive(Debug, Serialize)]
pub struct InfoReport {
    pub request: MediaRequest,
    pub quality: String,
    pub language: String,
    pub available_qualities: Vec<String>,
    pub available_languages: Vec<String>,
    pub playback: PlaybackInfo,
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

impl fmt::Display for InfoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sources for {} ({}):", self.request.episode_id, self.request.media_id)?;
        writeln!(f, "  Server: {}", self.request.server)?;
        writeln!(f, "  Title: {}", or_dash(&self.playback.title))?;
        writeln!(f, "  Referrer: {}", or_dash(&self.playback.referrer))?;
        writeln!(f, "  Qualities: {}", self.available_qualities.join(", "))?;
        writeln!(f, "  Languages: {}", self.available_languages.join(", "))?;
        writeln!(f, "\nSelected ({} / {}):", self.quality, self.language)?;
        writeln!(f, "  Media: {}", or_dash(&self.playback.media_url))?;
        write!(f, "  Subtitles: {}", self.playback.subtitle_urls.len())?;
        for (i, url) in self.playback.subtitle_urls.iter().enumerate() {
            write!(f, "\n    {}. {}", i + 1, url)?;
        }
        Ok(())
    }
}

/// Result of `lobster config`
#[derive(Debug, Serialize)]
pub struct ConfigReport {
    pub path: PathBuf,
    pub platform: Platform,
    pub preferences: Preferences,
}

impl fmt::Display for ConfigReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Config: {}", self.path.display())?;
        writeln!(f, "  Platform: {}", self.platform)?;
        writeln!(f, "  player={}", self.preferences.player)?;
        writeln!(f, "  subs_language={}", self.preferences.subs_language)?;
        writeln!(f, "  video_quality={}", self.preferences.video_quality)?;
        write!(f, "  preferred_server={}", self.preferences.server)
    }
}
