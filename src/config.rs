// Config module for the persisted launcher configuration

use crate::constants;
use crate::version::VersionOrdering;
use anyhow::Context;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub fn config_dir() -> String {
    std::env::var(constants::CONFIG_DIR_ENV).unwrap_or_else(|_| ".".to_string())
}

pub fn config_path() -> PathBuf {
    Path::new(&config_dir()).join(constants::CONFIG_FILE)
}

/// Launcher settings. Keys match the `launcher_config.json` written by the
/// older launchers, so an existing file keeps working.
///
/// Any key missing from the file falls back to its default; unknown keys are
/// ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub server_url: String,
    pub game_zip_url: String,
    pub patch_version_url: String,
    pub patch_download_url: String,
    pub patch_checksum_url: String,
    pub wow_path: PathBuf,
    pub temp_path: PathBuf,
    pub wow_exe: String,
    pub game_zip_file: String,
    pub auto_update: bool,
    pub check_missing_files: bool,
    pub verify_integrity: bool,
    pub version_ordering: VersionOrdering,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        let (wow_path, temp_path) = if cfg!(windows) {
            ("C:/WoW", "C:/WoW_Launcher_Temp")
        } else {
            ("WoW", "WoW_Launcher_Temp")
        };

        Self {
            server_url: "http://localhost".to_string(),
            game_zip_url: "http://localhost/WOTLKHD.zip".to_string(),
            patch_version_url: "http://localhost/patches/version.txt".to_string(),
            patch_download_url: "http://localhost/patches/latest/patch-Z.MPQ".to_string(),
            patch_checksum_url: "http://localhost/patches/latest/patch-Z.MPQ.sha256".to_string(),
            wow_path: PathBuf::from(wow_path),
            temp_path: PathBuf::from(temp_path),
            wow_exe: "Wow.exe".to_string(),
            game_zip_file: "WOTLKHD.zip".to_string(),
            auto_update: true,
            check_missing_files: true,
            verify_integrity: false,
            version_ordering: VersionOrdering::default(),
        }
    }
}

impl LauncherConfig {
    /// Load the config at `path`, writing the defaults there first if the
    /// file does not exist. Returns the config and whether it was created.
    pub fn load_or_init(path: &Path) -> anyhow::Result<(Self, bool)> {
        if path.exists() {
            return Ok((Self::load(path)?, false));
        }

        let config = Self::default();
        config.save(path)?;
        debug!("Wrote default config to {}", path.display());
        Ok((config, true))
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Full path to the game executable.
    pub fn exe_path(&self) -> PathBuf {
        self.wow_path.join(&self.wow_exe)
    }

    /// Required files for the missing-file check: the executable followed by
    /// the stock client archives.
    pub fn required_files(&self) -> Vec<String> {
        std::iter::once(self.wow_exe.clone())
            .chain(
                constants::REQUIRED_DATA_FILES
                    .iter()
                    .map(|f| f.to_string()),
            )
            .collect()
    }

    /// Return a copy with `key` set to `value`. The value is parsed according
    /// to the type the key already has, so `auto_update` only accepts
    /// `true`/`false` and unknown keys are rejected.
    pub fn with_value(&self, key: &str, value: &str) -> anyhow::Result<Self> {
        let mut doc = serde_json::to_value(self)?;
        let fields = doc
            .as_object_mut()
            .ok_or_else(|| anyhow::anyhow!("Config did not serialize to an object"))?;

        let current = fields.get(key).ok_or_else(|| {
            let mut known: Vec<&str> = fields.keys().map(|k| k.as_str()).collect();
            known.sort_unstable();
            anyhow::anyhow!("Unknown config key '{}'. Known keys: {}", key, known.join(", "))
        })?;

        let parsed = match current {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|_| anyhow::anyhow!("'{}' expects true or false, got '{}'", key, value))?,
            ),
            _ => serde_json::Value::String(value.to_string()),
        };
        fields.insert(key.to_string(), parsed);

        serde_json::from_value(doc).with_context(|| format!("Invalid value '{}' for '{}'", value, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_or_init_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(constants::CONFIG_FILE);

        let (config, created) = LauncherConfig::load_or_init(&path).unwrap();
        assert!(created);
        assert_eq!(config, LauncherConfig::default());
        assert!(path.exists());

        let (reloaded, created) = LauncherConfig::load_or_init(&path).unwrap();
        assert!(!created);
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_partial_file_layers_over_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(constants::CONFIG_FILE);
        std::fs::write(
            &path,
            r#"{ "wow_path": "/games/wotlk", "auto_update": false, "config_file": "launcher_config.json" }"#,
        )
        .unwrap();

        let config = LauncherConfig::load(&path).unwrap();
        assert_eq!(config.wow_path, PathBuf::from("/games/wotlk"));
        assert!(!config.auto_update);
        assert_eq!(config.wow_exe, "Wow.exe");
        assert_eq!(config.version_ordering, VersionOrdering::Lexical);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(constants::CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        assert!(LauncherConfig::load(&path).is_err());
    }

    #[test]
    fn test_required_files_start_with_exe() {
        let config = LauncherConfig {
            wow_exe: "WowClassic.exe".to_string(),
            ..Default::default()
        };
        let files = config.required_files();
        assert_eq!(files[0], "WowClassic.exe");
        assert_eq!(files.len(), 1 + constants::REQUIRED_DATA_FILES.len());
        assert!(files.contains(&"Data/patch-3.MPQ".to_string()));
    }

    #[test]
    fn test_with_value_parses_by_key_type() {
        let config = LauncherConfig::default();

        let updated = config.with_value("verify_integrity", "true").unwrap();
        assert!(updated.verify_integrity);

        let updated = config.with_value("server_url", "http://10.0.0.5").unwrap();
        assert_eq!(updated.server_url, "http://10.0.0.5");

        let updated = config.with_value("version_ordering", "numeric").unwrap();
        assert_eq!(updated.version_ordering, VersionOrdering::Numeric);
    }

    #[test]
    fn test_with_value_rejects_bad_input() {
        let config = LauncherConfig::default();
        assert!(config.with_value("no_such_key", "x").is_err());
        assert!(config.with_value("auto_update", "yes").is_err());
        assert!(config.with_value("version_ordering", "semver").is_err());
    }
}
