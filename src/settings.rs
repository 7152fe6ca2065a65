//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/blockdrop/settings.toml (or platform equivalent)

use crate::error::{Error, Result};
use crate::timer::DEFAULT_TICK_INTERVAL;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Keybindings
    pub keys: KeyBindings,
    /// Visual settings
    pub visual: VisualSettings,
    /// Gameplay settings
    pub gameplay: GameplaySettings,
}

/// Key bindings (stored as strings for easy editing)
/// Each action can have one or more keys bound to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_right: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub soft_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub restart: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub quit: Vec<String>,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct KeysVisitor;

    impl<'de> Visitor<'de> for KeysVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or array of strings")
        }

        fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut keys = Vec::new();
            while let Some(key) = seq.next_element::<String>()? {
                keys.push(key);
            }
            Ok(keys)
        }
    }

    deserializer.deserialize_any(KeysVisitor)
}

/// Serialize keys: single key as string, multiple as array
fn serialize_keys<S>(keys: &[String], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeSeq;

    if let [key] = keys {
        serializer.serialize_str(key)
    } else {
        let mut seq = serializer.serialize_seq(Some(keys.len()))?;
        for key in keys {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

/// Visual settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    /// Block style: "solid", "bracket", "round"
    pub block_style: String,
}

/// Gameplay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Gravity period in milliseconds
    pub tick_ms: u64,
    /// Fixed piece sequence seed; random when unset
    pub seed: Option<u64>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec!["Left".to_string(), "a".to_string()],
            move_right: vec!["Right".to_string(), "d".to_string()],
            soft_drop: vec!["Down".to_string(), "s".to_string()],
            rotate: vec!["Up".to_string(), "w".to_string()],
            restart: vec!["r".to_string(), "Enter".to_string()],
            quit: vec!["q".to_string(), "Esc".to_string()],
        }
    }
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            block_style: "solid".to_string(),
        }
    }
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_INTERVAL.as_millis() as u64,
            seed: None,
        }
    }
}

impl GameplaySettings {
    /// Gravity period; zero is bumped to one millisecond
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

impl VisualSettings {
    /// Get the block characters based on style
    pub fn block_chars(&self) -> (&'static str, &'static str) {
        match self.block_style.as_str() {
            "bracket" => ("[]", " ."),
            "round" => ("()", " ."),
            _ => ("██", "  "), // "solid" or default
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "blockdrop", "blockdrop")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from the platform config dir. On first run the
    /// defaults are written there so the user has a file to edit; an
    /// unreadable or malformed file is an error.
    pub fn load() -> Result<Self> {
        let path = Self::settings_path().ok_or(Error::NoConfigDir)?;
        Self::load_or_init(&path)
    }

    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }
        let settings = Self::default();
        settings.save_to(path)?;
        debug!(path = %path.display(), "wrote default settings");
        Ok(settings)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.gameplay.tick_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_single_key_or_list() {
        let settings = Settings::from_toml(
            r#"
            [keys]
            rotate = "x"
            quit = ["q", "Esc"]
            "#,
        )
        .unwrap();
        assert_eq!(settings.keys.rotate, vec!["x"]);
        assert_eq!(settings.keys.quit, vec!["q", "Esc"]);
        // Unspecified bindings keep their defaults
        assert_eq!(settings.keys.move_left, KeyBindings::default().move_left);
    }

    #[test]
    fn test_gameplay_overrides() {
        let settings = Settings::from_toml(
            r#"
            [gameplay]
            tick_ms = 250
            seed = 99
            "#,
        )
        .unwrap();
        assert_eq!(settings.gameplay.tick_interval(), Duration::from_millis(250));
        assert_eq!(settings.gameplay.seed, Some(99));
    }

    #[test]
    fn test_zero_tick_is_clamped() {
        let gameplay = GameplaySettings {
            tick_ms: 0,
            seed: None,
        };
        assert_eq!(gameplay.tick_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_malformed_toml_is_error() {
        let err = Settings::from_toml("[gameplay]\ntick_ms = \"fast\"").unwrap_err();
        assert!(matches!(err, Error::ParseSettings(_)));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = std::env::temp_dir().join(format!("blockdrop-settings-{}", std::process::id()));
        let path = dir.join("settings.toml");
        let mut settings = Settings::default();
        settings.gameplay.tick_ms = 321;
        settings.keys.rotate = vec!["k".to_string()];

        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = std::env::temp_dir().join(format!("blockdrop-init-{}", std::process::id()));
        let path = dir.join("nested").join("settings.toml");
        let _ = fs::remove_dir_all(&dir);

        let settings = Settings::load_or_init(&path).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(path.exists());

        // An existing file is read, not overwritten
        fs::write(&path, "[gameplay]\ntick_ms = 750\n").unwrap();
        let settings = Settings::load_or_init(&path).unwrap();
        assert_eq!(settings.gameplay.tick_ms, 750);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_block_chars() {
        let mut visual = VisualSettings::default();
        assert_eq!(visual.block_chars().0, "██");
        visual.block_style = "bracket".to_string();
        assert_eq!(visual.block_chars().0, "[]");
    }
}
