use crate::{Error, Result};
use leadgrid_engine::PAGE_SIZE_OPTIONS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolve the data directory based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. LEADGRID_PATH environment variable (with tilde expansion)
/// 3. XDG data directory
/// 4. ~/.leadgrid (fallback for systems without XDG)
pub fn resolve_data_dir(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("LEADGRID_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("leadgrid"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".leadgrid"));
    }

    Err(Error::Config(
        "Could not determine data path: no HOME directory or XDG data directory found"
            .to_string(),
    ))
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

fn default_page_size() -> usize {
    leadgrid_engine::DEFAULT_PAGE_SIZE
}

fn default_notification_ttl_secs() -> u64 {
    5
}

fn default_max_notifications() -> usize {
    5
}

fn default_table_title() -> String {
    "Leads".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_notification_ttl_secs")]
    pub notification_ttl_secs: u64,
    #[serde(default = "default_max_notifications")]
    pub max_notifications: usize,
    #[serde(default = "default_table_title")]
    pub table_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            notification_ttl_secs: default_notification_ttl_secs(),
            max_notifications: default_max_notifications(),
            table_title: default_table_title(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::default_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(resolve_data_dir(None)?.join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if !PAGE_SIZE_OPTIONS.contains(&self.page_size) {
            return Err(Error::Config(format!(
                "page_size must be one of {:?}, got {}",
                PAGE_SIZE_OPTIONS, self.page_size
            )));
        }
        if self.max_notifications == 0 {
            return Err(Error::Config("max_notifications must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.table_title, "Leads");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            page_size: 20,
            table_title: "Departments".to_string(),
            ..Config::default()
        };
        config.save_to(&config_path)?;

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn test_missing_file_gives_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let loaded = Config::load_from(&temp_dir.path().join("absent.toml"))?;
        assert_eq!(loaded, Config::default());
        Ok(())
    }

    #[test]
    fn test_partial_file_fills_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "page_size = 50\n")?;

        let loaded = Config::load_from(&path)?;
        assert_eq!(loaded.page_size, 50);
        assert_eq!(loaded.max_notifications, 5);
        Ok(())
    }

    #[test]
    fn test_invalid_page_size_rejected() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "page_size = 7\n")?;

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
        Ok(())
    }

    #[test]
    fn test_explicit_path_wins() -> Result<()> {
        let resolved = resolve_data_dir(Some("/tmp/leadgrid-explicit"))?;
        assert_eq!(resolved, PathBuf::from("/tmp/leadgrid-explicit"));
        Ok(())
    }
}
