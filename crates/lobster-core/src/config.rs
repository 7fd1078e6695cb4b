//! Preference file handling
//!
//! Preferences live in a plain `key=value` file, by default
//! `~/.config/lobster/lobster_config.txt`. Recognised keys:
//!
//! | key                | default    |
//! |--------------------|------------|
//! | `player`           | `mpv`      |
//! | `subs_language`    | `English`  |
//! | `video_quality`    | `1080p`    |
//! | `preferred_server` | `vidcloud` |
//!
//! Unknown keys, blank lines and `#` comments are ignored.

use crate::error::{Error, Result};
use crate::types::Preferences;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

const CONFIG_DIR: &str = ".config/lobster";
const CONFIG_FILE: &str = "lobster_config.txt";

/// Default config file location under the user's home directory
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| Error::Config("could not resolve home directory".to_string()))?;
    Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Parse `key=value` config text, falling back to defaults per key
pub fn parse_config(text: &str) -> Preferences {
    let mut prefs = Preferences::default();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim().to_string();
        if value.is_empty() {
            debug!(key, "Empty config value, keeping default");
            continue;
        }

        match key {
            "player" => prefs.player = value,
            "subs_language" => prefs.subs_language = value,
            "video_quality" => prefs.video_quality = value,
            "preferred_server" => prefs.server = value,
            other => debug!(key = other, "Ignoring unknown config key"),
        }
    }

    prefs
}

/// Render preferences in the config file format
pub fn render_config(prefs: &Preferences) -> String {
    format!(
        "player={}\nsubs_language={}\nvideo_quality={}\npreferred_server={}\n",
        prefs.player, prefs.subs_language, prefs.video_quality, prefs.server
    )
}

/// Read preferences from `path`, writing a default file first if it is
/// missing
#[instrument]
pub fn load_or_create(path: &Path) -> Result<Preferences> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::config_io(format!("creating {}", parent.display()), e)
            })?;
        }
        fs::write(path, render_config(&Preferences::default()))
            .map_err(|e| Error::config_io(format!("writing {}", path.display()), e))?;
        info!(path = %path.display(), "Created default config");
    }

    let text = fs::read_to_string(path)
        .map_err(|e| Error::config_io(format!("reading {}", path.display()), e))?;

    Ok(parse_config(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides_and_defaults() {
        let prefs = parse_config("player=iina\nvideo_quality=720p\n");
        assert_eq!(prefs.player, "iina");
        assert_eq!(prefs.video_quality, "720p");
        assert_eq!(prefs.subs_language, "English");
        assert_eq!(prefs.server, "vidcloud");
    }

    #[test]
    fn test_parse_ignores_noise() {
        let text = "# lobster\n\nfoo=bar\nnot a pair\nsubs_language = French \npreferred_server=upcloud";
        let prefs = parse_config(text);
        assert_eq!(prefs.subs_language, "French");
        assert_eq!(prefs.server, "upcloud");
        assert_eq!(prefs.player, "mpv");
    }

    #[test]
    fn test_value_may_contain_equals() {
        let prefs = parse_config("player=/opt/bin/mpv=custom");
        assert_eq!(prefs.player, "/opt/bin/mpv=custom");
    }

    #[test]
    fn test_empty_value_keeps_default() {
        let prefs = parse_config("player=\nvideo_quality=  \nsubs_language=French\n");
        assert_eq!(prefs.player, "mpv");
        assert_eq!(prefs.video_quality, "1080p");
        assert_eq!(prefs.subs_language, "French");
    }

    #[test]
    fn test_render_round_trips_defaults() {
        let prefs = Preferences::default();
        assert_eq!(parse_config(&render_config(&prefs)), prefs);
    }

    #[test]
    fn test_load_or_create_bootstraps_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let prefs = load_or_create(&path).unwrap();
        assert_eq!(prefs, Preferences::default());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("video_quality=1080p"));
        assert!(written.contains("preferred_server=vidcloud"));
    }

    #[test]
    fn test_load_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "player=vlc\n").unwrap();

        let prefs = load_or_create(&path).unwrap();
        assert_eq!(prefs.player, "vlc");
    }
}
