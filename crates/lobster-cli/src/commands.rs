//! CLI command implementations

use crate::output::{print_output, ConfigReport, InfoReport};
use anyhow::Context;
use lobster_core::{
    default_config_path, dispatch, load_or_create, plan, MediaRequest, Platform, Preferences,
    ProcessLauncher, SourceCatalog, WatchClient,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Settings shared by every command
pub struct Settings {
    pub config: Option<PathBuf>,
    pub base_url: String,
    pub timeout: Duration,
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub player: Option<String>,
    pub server: Option<String>,
    pub quality: Option<String>,
    pub language: Option<String>,
}

impl Overrides {
    pub fn apply(self, mut prefs: Preferences) -> Preferences {
        if let Some(player) = self.player {
            prefs.player = player;
        }
        if let Some(server) = self.server {
            prefs.server = server;
        }
        if let Some(quality) = self.quality {
            prefs.video_quality = quality;
        }
        if let Some(language) = self.language {
            prefs.subs_language = language;
        }
        prefs
    }
}

/// Tag a core error with the pipeline stage it came from
fn stage<T>(result: lobster_core::Result<T>) -> anyhow::Result<T> {
    result.map_err(|e| {
        let stage = e.stage();
        anyhow::Error::new(e).context(format!("{} stage failed", stage))
    })
}

fn config_path(settings: &Settings) -> anyhow::Result<PathBuf> {
    match &settings.config {
        Some(path) => Ok(path.clone()),
        None => stage(default_config_path()),
    }
}

fn load_preferences(settings: &Settings, overrides: Overrides) -> anyhow::Result<Preferences> {
    let path = config_path(settings)?;
    let prefs = stage(load_or_create(&path))?;
    Ok(overrides.apply(prefs))
}

async fn fetch_catalog(
    settings: &Settings,
    prefs: &Preferences,
    episode_id: &str,
    media_id: &str,
) -> anyhow::Result<SourceCatalog> {
    let client = stage(WatchClient::new(&settings.base_url, settings.timeout))?;
    let request = MediaRequest::new(episode_id, media_id, &prefs.server);

    let body = stage(client.fetch(&request).await)?;
    let catalog = stage(SourceCatalog::decode(&body))?;

    info!(
        sources = catalog.sources.len(),
        subtitles = catalog.subtitles.len(),
        "Sources found"
    );

    Ok(catalog)
}

fn available(tags: Vec<&str>) -> String {
    if tags.is_empty() {
        "none".to_string()
    } else {
        tags.join(", ")
    }
}

/// Fetch, extract and launch the player
pub async fn play(
    settings: &Settings,
    episode_id: &str,
    media_id: &str,
    overrides: Overrides,
    dry_run: bool,
    format: &str,
) -> anyhow::Result<()> {
    let prefs = load_preferences(settings, overrides)?;
    let catalog = fetch_catalog(settings, &prefs, episode_id, media_id).await?;
    let playback = catalog.select(&prefs.video_quality, &prefs.subs_language);

    if !playback.has_subtitles() {
        warn!(
            language = %prefs.subs_language,
            available = %available(catalog.available_languages()),
            "No subtitles in the requested language"
        );
    }

    let platform = Platform::current();
    let invocation = stage(plan(&playback, &prefs, platform)).with_context(|| {
        format!(
            "available qualities: {}",
            available(catalog.available_qualities())
        )
    })?;

    if dry_run {
        print_output(&invocation, format)?;
        return Ok(());
    }

    println!("Playing {}", display_title(&playback.title, episode_id));
    stage(dispatch(&playback, &prefs, platform, &ProcessLauncher::new()).await)
}

/// Fetch and extract, then report what was found
pub async fn info(
    settings: &Settings,
    episode_id: &str,
    media_id: &str,
    overrides: Overrides,
    format: &str,
) -> anyhow::Result<()> {
    let prefs = load_preferences(settings, overrides)?;
    let catalog = fetch_catalog(settings, &prefs, episode_id, media_id).await?;
    let playback = catalog.select(&prefs.video_quality, &prefs.subs_language);

    let report = InfoReport {
        request: MediaRequest::new(episode_id, media_id, &prefs.server),
        quality: prefs.video_quality.clone(),
        language: prefs.subs_language.clone(),
        available_qualities: catalog.available_qualities().iter().map(|s| s.to_string()).collect(),
        available_languages: catalog.available_languages().iter().map(|s| s.to_string()).collect(),
        playback,
    };
    print_output(&report, format)?;

    stage(report.playback.validate(&prefs.video_quality))
}

/// Show config location and resolved preferences
pub fn config(settings: &Settings, format: &str) -> anyhow::Result<()> {
    let path = config_path(settings)?;
    let preferences = stage(load_or_create(&path))?;

    let report = ConfigReport {
        path,
        platform: Platform::current(),
        preferences,
    };
    print_output(&report, format)
}

fn display_title<'a>(title: &'a str, episode_id: &'a str) -> &'a str {
    if title.is_empty() {
        episode_id
    } else {
        title
    }
}
