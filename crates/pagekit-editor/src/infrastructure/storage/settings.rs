//! TOML-based editor settings.
//!
//! Reads and writes [`EditorSettings`] at the platform-appropriate location:
//! - Windows:  `%APPDATA%\PageKit\settings.toml`
//! - Linux:    `~/.config/pagekit/settings.toml`
//! - macOS:    `~/Library/Application Support/PageKit/settings.toml`
//!
//! # Serde default values
//!
//! Every field carries `#[serde(default = "...")]` and every section
//! `#[serde(default)]`, so an empty file, a file with only `[timing]`, or a
//! settings file from an older release all load with the missing values
//! filled in.
//!
//! ```toml
//! [timing]
//! resize_debounce_ms = 400
//!
//! [editor]
//! discard_policy = "reject-dirty"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use pagekit_core::{NoticeTiming, ResizeEffects, ScrollEffects};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::edit_session::DiscardPolicy;
use crate::application::page_shell::ShellOptions;

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings could not be serialized to TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Settings schema types ─────────────────────────────────────────────────────

/// Top-level settings stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EditorSettings {
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(default)]
    pub timing: TimingSettings,
    #[serde(default)]
    pub effects: EffectSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub editor: EditorBehaviour,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralSettings {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory of the file store.  Defaults to `<config dir>/storage`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimingSettings {
    #[serde(default = "default_scroll_throttle_ms")]
    pub scroll_throttle_ms: u64,
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
    /// Apply the first resize of a burst at once instead of the last one
    /// after the quiet period.
    #[serde(default)]
    pub resize_leading: bool,
    /// Period of the runtime's `Tick` events.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EffectSettings {
    #[serde(default = "default_header_threshold_px")]
    pub header_threshold_px: f64,
    #[serde(default = "default_parallax_factor")]
    pub parallax_factor: f64,
    #[serde(default = "default_mobile_breakpoint_px")]
    pub mobile_breakpoint_px: f64,
    #[serde(default = "default_sticky_gap_px")]
    pub sticky_gap_px: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationSettings {
    #[serde(default = "default_show_delay_ms")]
    pub show_delay_ms: u64,
    #[serde(default = "default_display_ms")]
    pub display_ms: u64,
    #[serde(default = "default_fade_ms")]
    pub fade_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EditorBehaviour {
    #[serde(default)]
    pub discard_policy: DiscardPolicy,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_scroll_throttle_ms() -> u64 {
    16
}
fn default_resize_debounce_ms() -> u64 {
    250
}
fn default_tick_interval_ms() -> u64 {
    50
}
fn default_header_threshold_px() -> f64 {
    100.0
}
fn default_parallax_factor() -> f64 {
    0.5
}
fn default_mobile_breakpoint_px() -> f64 {
    768.0
}
fn default_sticky_gap_px() -> f64 {
    20.0
}
fn default_show_delay_ms() -> u64 {
    100
}
fn default_display_ms() -> u64 {
    3_000
}
fn default_fade_ms() -> u64 {
    300
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            storage_dir: None,
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            scroll_throttle_ms: default_scroll_throttle_ms(),
            resize_debounce_ms: default_resize_debounce_ms(),
            resize_leading: false,
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            header_threshold_px: default_header_threshold_px(),
            parallax_factor: default_parallax_factor(),
            mobile_breakpoint_px: default_mobile_breakpoint_px(),
            sticky_gap_px: default_sticky_gap_px(),
        }
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            show_delay_ms: default_show_delay_ms(),
            display_ms: default_display_ms(),
            fade_ms: default_fade_ms(),
        }
    }
}

impl EditorSettings {
    /// Shell tunables derived from these settings.
    pub fn shell_options(&self) -> ShellOptions {
        ShellOptions {
            scroll_cooldown: Duration::from_millis(self.timing.scroll_throttle_ms),
            resize_debounce: Duration::from_millis(self.timing.resize_debounce_ms),
            resize_leading: self.timing.resize_leading,
            notice_timing: NoticeTiming {
                show_delay: Duration::from_millis(self.notifications.show_delay_ms),
                display: Duration::from_millis(self.notifications.display_ms),
                fade: Duration::from_millis(self.notifications.fade_ms),
            },
            scroll_effects: ScrollEffects {
                header_threshold: self.effects.header_threshold_px,
                parallax_factor: self.effects.parallax_factor,
            },
            resize_effects: ResizeEffects {
                mobile_breakpoint: self.effects.mobile_breakpoint_px,
                sticky_gap: self.effects.sticky_gap_px,
            },
            discard_policy: self.editor.discard_policy,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.timing.tick_interval_ms.max(1))
    }

    /// The configured storage directory, or `<config dir>/storage`.
    ///
    /// # Errors
    ///
    /// [`SettingsError::NoPlatformConfigDir`] when no directory is configured
    /// and the platform default cannot be determined.
    pub fn storage_dir(&self) -> Result<PathBuf, SettingsError> {
        match &self.general.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(settings_dir()?.join("storage")),
        }
    }
}

// ── Settings repository ───────────────────────────────────────────────────────

/// Platform directory holding `settings.toml`.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformConfigDir`] when the base directory
/// cannot be determined from the environment.
pub fn settings_dir() -> Result<PathBuf, SettingsError> {
    platform_config_dir().ok_or(SettingsError::NoPlatformConfigDir)
}

/// Default location of the settings file.
///
/// # Errors
///
/// See [`settings_dir`].
pub fn settings_file_path() -> Result<PathBuf, SettingsError> {
    Ok(settings_dir()?.join("settings.toml"))
}

/// Loads settings from `path`, returning defaults if the file does not exist.
///
/// # Errors
///
/// [`SettingsError::Io`] for file-system errors other than "not found", and
/// [`SettingsError::Parse`] if the TOML is malformed.
pub fn load_settings(path: &Path) -> Result<EditorSettings, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(EditorSettings::default()),
        Err(e) => Err(SettingsError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Writes `settings` to `path`, creating parent directories.
///
/// # Errors
///
/// [`SettingsError::Io`] for file-system failures or
/// [`SettingsError::Serialize`] if serialization fails.
pub fn save_settings(path: &Path, settings: &EditorSettings) -> Result<(), SettingsError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("PageKit"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("pagekit"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("PageKit")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_default_settings_match_site_behaviour() {
        // Arrange / Act
        let settings = EditorSettings::default();

        // Assert
        assert_eq!(settings.timing.scroll_throttle_ms, 16);
        assert_eq!(settings.timing.resize_debounce_ms, 250);
        assert_eq!(settings.notifications.display_ms, 3_000);
        assert_eq!(settings.editor.discard_policy, DiscardPolicy::Discard);
        assert_eq!(settings.general.log_level, "info");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let settings: EditorSettings = toml::from_str("").expect("empty file is valid");
        assert_eq!(settings, EditorSettings::default());
    }

    #[test]
    fn test_partial_section_overrides_only_named_fields() {
        // Arrange
        let text = r#"
[timing]
resize_debounce_ms = 400

[editor]
discard_policy = "reject-dirty"
"#;

        // Act
        let settings: EditorSettings = toml::from_str(text).expect("deserialize partial");

        // Assert
        assert_eq!(settings.timing.resize_debounce_ms, 400);
        assert_eq!(settings.timing.scroll_throttle_ms, 16);
        assert_eq!(settings.editor.discard_policy, DiscardPolicy::RejectDirty);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("pagekit_settings_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(&path, "[[[ not valid toml").unwrap();

        let result = load_settings(&path);

        assert!(matches!(result, Err(SettingsError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/settings.toml");
        assert_eq!(load_settings(&path).unwrap(), EditorSettings::default());
    }

    #[test]
    fn test_save_and_load_round_trip_via_temp_dir() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("pagekit_settings_{}", Uuid::new_v4()));
        let path = dir.join("nested").join("settings.toml");
        let mut settings = EditorSettings::default();
        settings.general.storage_dir = Some(PathBuf::from("/srv/pagekit"));
        settings.effects.parallax_factor = 0.25;

        // Act
        save_settings(&path, &settings).expect("save");
        let loaded = load_settings(&path).expect("load");

        // Assert
        assert_eq!(loaded, settings);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_shell_options_carry_every_setting() {
        let mut settings = EditorSettings::default();
        settings.timing.scroll_throttle_ms = 32;
        settings.effects.mobile_breakpoint_px = 1_024.0;
        settings.notifications.fade_ms = 0;
        settings.timing.resize_leading = true;

        let options = settings.shell_options();

        assert_eq!(options.scroll_cooldown, Duration::from_millis(32));
        assert!(options.resize_leading);
        assert_eq!(options.resize_effects.mobile_breakpoint, 1_024.0);
        assert_eq!(options.notice_timing.fade, Duration::ZERO);
    }

    #[test]
    fn test_storage_dir_prefers_configured_value() {
        let mut settings = EditorSettings::default();
        settings.general.storage_dir = Some(PathBuf::from("/data"));
        assert_eq!(settings.storage_dir().unwrap(), PathBuf::from("/data"));
    }

    #[test]
    fn test_settings_file_path_ends_with_settings_toml() {
        if let Ok(path) = settings_file_path() {
            assert!(path.ends_with("settings.toml"), "got {path:?}");
        }
    }
}
