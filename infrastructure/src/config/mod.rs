//! Configuration loading with multi-source merging
//!
//! Merges built-in defaults, an optional `stackline.toml`, and
//! `STACKLINE_`-prefixed environment variables (highest priority).

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use stackline_domain::MeetingSettings;
use std::path::{Path, PathBuf};

/// Default facilitation settings applied to newly created meetings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingDefaults {
    pub progressive_stack: bool,
    pub direct_response_window_sec: u32,
    pub max_direct_responses_per_user: u32,
    pub time_per_speaker_sec: u32,
    pub invite_tags: Vec<String>,
}

impl Default for MeetingDefaults {
    fn default() -> Self {
        let settings = MeetingSettings::default();
        Self {
            progressive_stack: settings.progressive_stack,
            direct_response_window_sec: settings.direct_response_window_sec,
            max_direct_responses_per_user: settings.max_direct_responses_per_user,
            time_per_speaker_sec: settings.time_per_speaker_sec,
            invite_tags: Vec::new(),
        }
    }
}

impl MeetingDefaults {
    pub fn to_settings(&self) -> MeetingSettings {
        MeetingSettings {
            progressive_stack: self.progressive_stack,
            direct_response_window_sec: self.direct_response_window_sec,
            max_direct_responses_per_user: self.max_direct_responses_per_user,
            time_per_speaker_sec: self.time_per_speaker_sec,
            invite_tags: self.invite_tags.iter().cloned().collect(),
        }
    }
}

/// Top-level stackline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StacklineConfig {
    /// Tracing filter applied when the binary sets up logging
    /// (overridden by `-v` flags).
    pub log_filter: Option<String>,
    /// Path for the JSONL meeting-event log; disabled when unset.
    pub event_log: Option<PathBuf>,
    pub meeting: MeetingDefaults,
}

/// Configuration loader handling file discovery and merging.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with proper priority.
    ///
    /// Priority (highest to lowest): environment (`STACKLINE_*`), explicit
    /// config path if given, `./stackline.toml`, built-in defaults.
    pub fn load(config_path: Option<&Path>) -> Result<StacklineConfig, Box<figment::Error>> {
        let mut figment =
            Figment::new().merge(Serialized::defaults(StacklineConfig::default()));

        let project = PathBuf::from("stackline.toml");
        if project.exists() {
            figment = figment.merge(Toml::file(&project));
        }
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed("STACKLINE_").split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Built-in defaults only (for `--no-config`).
    pub fn load_defaults() -> StacklineConfig {
        StacklineConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_mirror_domain_settings() {
        let config = ConfigLoader::load_defaults();
        assert!(!config.meeting.progressive_stack);
        assert_eq!(config.meeting.max_direct_responses_per_user, 3);
        assert_eq!(config.meeting.to_settings(), MeetingSettings::default());
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stackline.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
log_filter = "debug"

[meeting]
progressive_stack = true
invite_tags = ["new_to_group"]
"#
        )
        .unwrap();

        let config = ConfigLoader::load(Some(path.as_path())).unwrap();
        assert_eq!(config.log_filter.as_deref(), Some("debug"));
        assert!(config.meeting.progressive_stack);
        let settings = config.meeting.to_settings();
        assert!(settings.invite_tags.contains("new_to_group"));
        // Untouched fields keep their defaults
        assert_eq!(settings.time_per_speaker_sec, 180);
    }
}
