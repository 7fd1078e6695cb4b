//! Player dispatch
//!
//! Maps a [`PlaybackInfo`] and the configured player name onto one
//! concrete command line, then hands it to a [`Launcher`].

mod launcher;

pub use launcher::{Launcher, ProcessLauncher};

use crate::{PlaybackInfo, Platform, Preferences, Result};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// VLC for Android video activity
pub const VLC_ANDROID_COMPONENT: &str =
    "org.videolan.vlc/org.videolan.vlc.gui.video.VideoPlayerActivity";

/// Default Android player activity
pub const TINYPLAYER_COMPONENT: &str = "is.tinyplayer/.TinyPlayerActivity";

/// Known player families, each with its own flag vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerKind {
    /// IINA (macOS, mpv underneath, flags prefixed with `--mpv-`)
    Iina(String),
    /// VLC media player
    Vlc(String),
    /// Any other executable taking mpv-style flags and a positional URL
    Generic(String),
    /// `am start` intent launch on Android
    AndroidIntent { component: &'static str },
}

impl PlayerKind {
    /// Pick the player family for a configured name on `platform`.
    ///
    /// Names are matched on the executable's file stem, ignoring case, so
    /// `/usr/bin/vlc` and `VLC.exe` both select [`PlayerKind::Vlc`]. The
    /// configured name is kept as the program to run.
    pub fn resolve(player: &str, platform: Platform) -> Self {
        let stem = Path::new(player)
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if platform.is_mobile() {
            let component = match stem.as_str() {
                "vlc" => VLC_ANDROID_COMPONENT,
                _ => TINYPLAYER_COMPONENT,
            };
            return PlayerKind::AndroidIntent { component };
        }

        match stem.as_str() {
            "iina" => PlayerKind::Iina(player.to_string()),
            "vlc" => PlayerKind::Vlc(player.to_string()),
            _ => PlayerKind::Generic(player.to_string()),
        }
    }

    /// Build the command line for this player
    pub fn build(&self, info: &PlaybackInfo, platform: Platform) -> Invocation {
        match self {
            PlayerKind::Iina(program) => {
                let subs = join_subtitle_list(&info.subtitle_urls, platform);
                Invocation::new(program)
                    .arg("--no-stdin")
                    .arg("--keep-running")
                    .flag("--mpv-referrer=", &info.referrer)
                    .flag("--mpv-sub-files=", &subs)
                    .flag("--mpv-force-media-title=", &info.title)
                    .arg(&info.media_url)
            }
            PlayerKind::Vlc(program) => {
                let mut invocation = Invocation::new(program)
                    .arg(&info.media_url)
                    .flag("--http-referrer=", &info.referrer);
                if !info.title.is_empty() {
                    invocation = invocation.arg("--meta-title").arg(&info.title);
                }
                invocation
            }
            PlayerKind::Generic(program) => {
                let subs = join_subtitle_list(&info.subtitle_urls, platform);
                Invocation::new(program)
                    .flag("--http-referrer=", &info.referrer)
                    .flag("--sub-files=", &subs)
                    .arg(&info.media_url)
            }
            // The intent contract has no referrer or subtitle parameters.
            PlayerKind::AndroidIntent { component } => Invocation::new("am")
                .arg("start")
                .arg("--user")
                .arg("0")
                .arg("-a")
                .arg("android.intent.action.VIEW")
                .arg("-d")
                .arg(&info.media_url)
                .arg("-n")
                .arg(*component)
                .arg("-e")
                .arg("title")
                .arg(&info.title),
        }
    }
}

impl std::fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerKind::Iina(program)
            | PlayerKind::Vlc(program)
            | PlayerKind::Generic(program) => write!(f, "{}", program),
            PlayerKind::AndroidIntent { component } => write!(f, "intent:{}", component),
        }
    }
}

/// A program and its arguments, ready to spawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append `prefix` + `value`, skipped when `value` is empty
    pub fn flag(self, prefix: &str, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.arg(format!("{}{}", prefix, value))
        }
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(arg))?;
        }
        Ok(())
    }
}

fn shell_quote(s: &str) -> String {
    let plain = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,?&".contains(c));
    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// Join subtitle URLs into one mpv path-list value.
///
/// Outside Windows the list separator is `:`, which also appears in every
/// URL; each colon inside a URL is prefixed with a backslash.
pub fn join_subtitle_list(urls: &[String], platform: Platform) -> String {
    let separator = platform.list_separator().to_string();
    urls.iter()
        .map(|url| match platform {
            Platform::Windows => url.clone(),
            _ => url.replace(':', r"\:"),
        })
        .collect::<Vec<_>>()
        .join(&separator)
}

/// Validate `info` and build the command line the dispatcher would run
pub fn plan(info: &PlaybackInfo, prefs: &Preferences, platform: Platform) -> Result<Invocation> {
    info.validate(&prefs.video_quality)?;
    let kind = PlayerKind::resolve(&prefs.player, platform);
    Ok(kind.build(info, platform))
}

/// Launch the preferred player for `info` and wait for it to exit
pub async fn dispatch(
    info: &PlaybackInfo,
    prefs: &Preferences,
    platform: Platform,
    launcher: &dyn Launcher,
) -> Result<()> {
    let invocation = plan(info, prefs, platform)?;

    info!(
        player = %prefs.player,
        platform = %platform,
        subtitles = info.subtitle_urls.len(),
        "Launching player"
    );
    debug!(command = %invocation, "Player invocation");

    launcher.launch(&invocation).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLauncher {
        calls: Mutex<Vec<Invocation>>,
    }

    #[async_trait]
    impl Launcher for RecordingLauncher {
        async fn launch(&self, invocation: &Invocation) -> Result<()> {
            self.calls.lock().unwrap().push(invocation.clone());
            Ok(())
        }
    }

    fn sample_info() -> PlaybackInfo {
        PlaybackInfo {
            referrer: "https://ref.example/".to_string(),
            media_url: "https://cdn.example/1080.m3u8".to_string(),
            subtitle_urls: vec![
                "https://subs.example/a.vtt".to_string(),
                "https://subs.example/b.vtt".to_string(),
            ],
            title: "Movie".to_string(),
        }
    }

    fn prefs(player: &str) -> Preferences {
        Preferences {
            player: player.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_known_players() {
        assert_eq!(
            PlayerKind::resolve("iina", Platform::MacOs),
            PlayerKind::Iina("iina".to_string())
        );
        assert_eq!(
            PlayerKind::resolve("vlc", Platform::Linux),
            PlayerKind::Vlc("vlc".to_string())
        );
        assert_eq!(
            PlayerKind::resolve("/usr/bin/VLC", Platform::Linux),
            PlayerKind::Vlc("/usr/bin/VLC".to_string())
        );
        assert_eq!(
            PlayerKind::resolve("mpv", Platform::Linux),
            PlayerKind::Generic("mpv".to_string())
        );
    }

    #[test]
    fn test_resolve_android() {
        assert_eq!(
            PlayerKind::resolve("vlc", Platform::Android),
            PlayerKind::AndroidIntent { component: VLC_ANDROID_COMPONENT }
        );
        assert_eq!(
            PlayerKind::resolve("mpv", Platform::Android),
            PlayerKind::AndroidIntent { component: TINYPLAYER_COMPONENT }
        );
        assert_eq!(
            PlayerKind::resolve("iina", Platform::Android),
            PlayerKind::AndroidIntent { component: TINYPLAYER_COMPONENT }
        );
    }

    #[test]
    fn test_configured_path_is_kept() {
        let vlc = "/Applications/VLC.app/Contents/MacOS/VLC";
        let inv = plan(&sample_info(), &prefs(vlc), Platform::MacOs).unwrap();
        assert_eq!(inv.program, vlc);
        assert_eq!(inv.args[0], "https://cdn.example/1080.m3u8");

        let iina = "/opt/iina/bin/iina";
        let inv = plan(&sample_info(), &prefs(iina), Platform::MacOs).unwrap();
        assert_eq!(inv.program, iina);
        assert_eq!(inv.args[0], "--no-stdin");
        assert_eq!(PlayerKind::resolve(iina, Platform::MacOs).to_string(), iina);
    }

    #[test]
    fn test_join_subtitles_escapes_colons() {
        let urls = vec!["http://a/1.vtt".to_string(), "http://b/2.vtt".to_string()];
        assert_eq!(
            join_subtitle_list(&urls, Platform::Linux),
            r"http\://a/1.vtt:http\://b/2.vtt"
        );
        assert_eq!(
            join_subtitle_list(&urls, Platform::Windows),
            "http://a/1.vtt;http://b/2.vtt"
        );
        assert_eq!(join_subtitle_list(&[], Platform::Linux), "");
    }

    #[test]
    fn test_build_iina() {
        let inv = PlayerKind::Iina("iina".into()).build(&sample_info(), Platform::MacOs);
        assert_eq!(inv.program, "iina");
        assert_eq!(
            inv.args,
            vec![
                "--no-stdin",
                "--keep-running",
                "--mpv-referrer=https://ref.example/",
                r"--mpv-sub-files=https\://subs.example/a.vtt:https\://subs.example/b.vtt",
                "--mpv-force-media-title=Movie",
                "https://cdn.example/1080.m3u8",
            ]
        );
    }

    #[test]
    fn test_build_vlc_has_no_subtitles() {
        let inv = PlayerKind::Vlc("vlc".into()).build(&sample_info(), Platform::Linux);
        assert_eq!(inv.program, "vlc");
        assert_eq!(
            inv.args,
            vec![
                "https://cdn.example/1080.m3u8",
                "--http-referrer=https://ref.example/",
                "--meta-title",
                "Movie",
            ]
        );
    }

    #[test]
    fn test_build_generic_url_last() {
        let inv = PlayerKind::Generic("mplayer".into()).build(&sample_info(), Platform::Windows);
        assert_eq!(inv.program, "mplayer");
        assert_eq!(
            inv.args,
            vec![
                "--http-referrer=https://ref.example/",
                "--sub-files=https://subs.example/a.vtt;https://subs.example/b.vtt",
                "https://cdn.example/1080.m3u8",
            ]
        );
    }

    #[test]
    fn test_build_omits_empty_flags() {
        let info = PlaybackInfo {
            media_url: "https://cdn.example/a.m3u8".into(),
            ..Default::default()
        };
        let inv = PlayerKind::Generic("mpv".into()).build(&info, Platform::Linux);
        assert_eq!(inv.args, vec!["https://cdn.example/a.m3u8"]);

        let inv = PlayerKind::Vlc("vlc".into()).build(&info, Platform::Linux);
        assert_eq!(inv.args, vec!["https://cdn.example/a.m3u8"]);
    }

    #[test]
    fn test_build_android_intent_drops_referrer_and_subs() {
        let kind = PlayerKind::AndroidIntent { component: VLC_ANDROID_COMPONENT };
        let inv = kind.build(&sample_info(), Platform::Android);
        assert_eq!(inv.program, "am");
        assert_eq!(
            inv.args,
            vec![
                "start",
                "--user",
                "0",
                "-a",
                "android.intent.action.VIEW",
                "-d",
                "https://cdn.example/1080.m3u8",
                "-n",
                VLC_ANDROID_COMPONENT,
                "-e",
                "title",
                "Movie",
            ]
        );
        assert!(!inv.args.iter().any(|a| a.contains("ref.example") || a.contains(".vtt")));
    }

    #[test]
    fn test_invocation_display_quotes() {
        let inv = Invocation::new("mpv")
            .arg("--force-media-title=My Movie")
            .arg("https://cdn.example/a.m3u8");
        assert_eq!(
            inv.to_string(),
            "mpv '--force-media-title=My Movie' https://cdn.example/a.m3u8"
        );
    }

    #[tokio::test]
    async fn test_dispatch_records_vendor_template() {
        let launcher = RecordingLauncher::default();
        dispatch(&sample_info(), &prefs("iina"), Platform::MacOs, &launcher)
            .await
            .unwrap();

        let calls = launcher.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "iina");
    }

    #[tokio::test]
    async fn test_dispatch_mobile_overrides_player() {
        let launcher = RecordingLauncher::default();
        dispatch(&sample_info(), &prefs("mpv"), Platform::Android, &launcher)
            .await
            .unwrap();

        let calls = launcher.calls.lock().unwrap();
        assert_eq!(calls[0].program, "am");
        assert!(calls[0].args.contains(&TINYPLAYER_COMPONENT.to_string()));
    }

    #[tokio::test]
    async fn test_dispatch_rejects_empty_media_url() {
        let launcher = RecordingLauncher::default();
        let info = PlaybackInfo {
            referrer: "https://ref.example/".into(),
            ..Default::default()
        };

        let err = dispatch(&info, &prefs("mpv"), Platform::Linux, &launcher)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NoMediaUrl { .. }));
        assert!(launcher.calls.lock().unwrap().is_empty());
    }
}
