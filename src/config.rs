use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub history: HistoryConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct HistoryConfig {
    // Whether executed commands are logged at all
    pub enabled: bool,
    // Database file name, created under the data directory
    pub database: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    pub max_history_shown: usize,
    pub language: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            database: "history.db".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_history_shown: 10,
            language: "auto".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_path();

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path();
        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    fn get_config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    fn data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("GT_DB_DIR") {
            return PathBuf::from(dir);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".gt")
    }

    /// Whether the history store should be opened at all. `GT_HISTORY=0`
    /// (or `false`) disables it without editing the config file.
    pub fn history_enabled(&self) -> bool {
        std::env::var("GT_HISTORY")
            .ok()
            .map(|v| {
                let v = v.to_lowercase();
                !(v == "0" || v == "false")
            })
            .unwrap_or(self.history.enabled)
    }

    /// Path of the history database. `GT_DB` overrides the configured
    /// file name.
    pub fn history_db_path(&self) -> PathBuf {
        let database = std::env::var("GT_DB").unwrap_or_else(|_| self.history.database.clone());
        Self::data_dir().join(database)
    }

    pub fn get_effective_language(&self) -> String {
        if self.display.language == "auto" {
            // Fall back to the system language
            std::env::var("LANG")
                .unwrap_or_else(|_| "en_US".to_string())
                .split('.')
                .next()
                .unwrap_or("en")
                .to_string()
        } else {
            self.display.language.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_history_on_with_ten_rows() {
        let config = Config::default();
        assert!(config.history.enabled);
        assert_eq!(config.history.database, "history.db");
        assert_eq!(config.display.max_history_shown, 10);
        assert_eq!(config.display.language, "auto");
    }

    #[test]
    fn partial_config_files_fill_in_defaults() {
        let config: Config = toml::from_str("[history]\nenabled = false\n").unwrap();
        assert!(!config.history.enabled);
        assert_eq!(config.history.database, "history.db");
        assert_eq!(config.display.max_history_shown, 10);
    }

    #[test]
    fn explicit_language_wins_over_auto_detection() {
        let mut config = Config::default();
        config.display.language = "zh".to_string();
        assert_eq!(config.get_effective_language(), "zh");
    }
}
