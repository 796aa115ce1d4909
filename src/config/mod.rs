use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use dirs::home_dir;
use serde::{Deserialize, Serialize};

use crate::errors::SnapshotError;

const DEFAULT_DIR_NAME: &str = ".forecast_core";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub default_preset: String,
    pub pretty_output: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_preset: "this_month".into(),
            pretty_output: true,
            snapshot_path: None,
        }
    }
}

/// Returns the application data directory, defaulting to `~/.forecast_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("FORECAST_CORE_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_path(app_data_dir().join(CONFIG_FILE))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(&self) -> Result<Config, SnapshotError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            SnapshotError::Config(format!("{}: {err}", self.path.display()))
        })
    }

    pub fn save(&self, config: &Config) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("config.json"));
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("nested").join("config.json"));
        let config = Config {
            default_preset: "next_30_days".into(),
            pretty_output: false,
            snapshot_path: Some(PathBuf::from("/data/snapshot.json")),
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
        assert!(!tmp_path(manager.path()).exists());
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"pretty_output": false}"#).unwrap();
        let config = ConfigManager::with_path(&path).load().unwrap();
        assert_eq!(config.default_preset, "this_month");
        assert!(!config.pretty_output);
    }

    #[test]
    fn malformed_files_report_config_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        let err = ConfigManager::with_path(&path).load().unwrap_err();
        assert!(matches!(err, SnapshotError::Config(_)));
    }
}
