use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::{debug, error, warn};
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::AppDescriptor;

const APP_DIR: &str = "focusguard";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Focus interval in minutes.
    #[serde(default = "default_focus_time")]
    pub focus_time: u32,
    /// Break interval in minutes.
    #[serde(default = "default_break_time")]
    pub break_time: u32,
    #[serde(default, deserialize_with = "deserialize_kill_list")]
    pub app_kill_list: Vec<AppDescriptor>,
    /// Relaunch silenced apps when a break begins or the timer is reset.
    #[serde(default = "default_relaunch_optional")]
    pub relaunch_optional: bool,
    #[serde(default)]
    pub confirmation_policy: ConfirmationPolicy,
}

/// Which termination outcomes count as "silenced".
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationPolicy {
    /// Anything except "target not found" counts as confirmed.
    #[default]
    Lenient,
    /// Only a clean success counts as confirmed.
    Strict,
}

fn default_focus_time() -> u32 {
    25
}

fn default_break_time() -> u32 {
    5
}

fn default_relaunch_optional() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_time: default_focus_time(),
            break_time: default_break_time(),
            app_kill_list: Vec::new(),
            relaunch_optional: default_relaunch_optional(),
            confirmation_policy: ConfirmationPolicy::default(),
        }
    }
}

impl Settings {
    pub fn focus_secs(&self) -> u64 {
        u64::from(self.focus_time) * 60
    }

    pub fn break_secs(&self) -> u64 {
        u64::from(self.break_time) * 60
    }

    fn validate(&self) -> Result<()> {
        if self.focus_time == 0 {
            bail!("focusTime must be at least 1 minute");
        }
        if self.break_time == 0 {
            bail!("breakTime must be at least 1 minute");
        }
        Ok(())
    }
}

// Older writers stored the kill list as a JSON string holding the array.
#[derive(Deserialize)]
#[serde(untagged)]
enum KillListRepr {
    List(Vec<AppDescriptor>),
    Encoded(String),
}

fn deserialize_kill_list<'de, D>(deserializer: D) -> Result<Vec<AppDescriptor>, D::Error>
where
    D: Deserializer<'de>,
{
    match KillListRepr::deserialize(deserializer)? {
        KillListRepr::List(apps) => Ok(apps),
        KillListRepr::Encoded(raw) if raw.trim().is_empty() => Ok(Vec::new()),
        KillListRepr::Encoded(raw) => serde_json::from_str(&raw).map_err(serde::de::Error::custom),
    }
}

pub fn get_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(SETTINGS_FILE)
}

/// Read and validate the settings file, reporting why it could not be used.
pub fn read_settings(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    let settings =
        serde_json::from_str::<Settings>(&content).context("failed to parse settings file")?;
    settings.validate()?;
    Ok(settings)
}

/// Never fails: anything unusable falls back to the defaults.
pub fn load_settings_from(path: &Path) -> Settings {
    if !path.exists() {
        debug!("No settings at {}, using defaults", path.display());
        return Settings::default();
    }
    match read_settings(path) {
        Ok(settings) => settings,
        Err(err) => {
            warn!("Falling back to default settings: {:#}", err);
            Settings::default()
        }
    }
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> bool {
    match write_settings(path, settings) {
        Ok(()) => true,
        Err(err) => {
            error!("Failed to save settings: {:#}", err);
            false
        }
    }
}

fn write_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create settings directory")?;
    }
    let content =
        serde_json::to_string_pretty(settings).context("failed to serialize settings")?;
    fs::write(path, content).context("failed to write settings file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join("nope.json"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.focus_time, 25);
        assert_eq!(settings.break_time, 5);
        assert!(settings.app_kill_list.is_empty());
        assert!(settings.relaunch_optional);
    }

    #[test]
    fn garbage_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_settings_from(&path), Settings::default());
    }

    #[test]
    fn zero_duration_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"focusTime": 0, "breakTime": 5}"#).unwrap();
        assert!(read_settings(&path).is_err());
        assert_eq!(load_settings_from(&path), Settings::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"focusTime": 50}"#).unwrap();
        let settings = load_settings_from(&path);
        assert_eq!(settings.focus_time, 50);
        assert_eq!(settings.break_time, 5);
        assert_eq!(settings.confirmation_policy, ConfirmationPolicy::Lenient);
    }

    #[test]
    fn accepts_string_encoded_kill_list() {
        let json = r#"{
            "focusTime": 25,
            "breakTime": 5,
            "appKillList": "[{\"id\":\"slack\",\"display\":\"Slack\",\"detail\":\"Slack\"}]",
            "relaunchOptional": false
        }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(
            settings.app_kill_list,
            vec![AppDescriptor::new("slack", "Slack", "Slack")]
        );
        assert!(!settings.relaunch_optional);
    }

    #[test]
    fn save_then_load_keeps_kill_list_as_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            focus_time: 30,
            app_kill_list: vec![AppDescriptor::new(
                "slack",
                "Slack",
                "/Applications/Slack.app",
            )],
            confirmation_policy: ConfirmationPolicy::Strict,
            ..Settings::default()
        };
        assert!(save_settings_to(&path, &settings));

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw["appKillList"].is_array());
        assert_eq!(raw["confirmationPolicy"], "strict");
        assert_eq!(load_settings_from(&path), settings);
    }

    #[test]
    fn save_reports_failure_instead_of_panicking() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be.
        let path = dir.path().join("settings.json");
        fs::create_dir(&path).unwrap();
        assert!(!save_settings_to(&path, &Settings::default()));
    }
}
