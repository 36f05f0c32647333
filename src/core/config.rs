use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_CHANDE_URL: &str = "https://chande.net";
pub const DEFAULT_TGJU_URL: &str = "https://www.tgju.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourceConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourcesConfig {
    #[serde(default = "default_chande")]
    pub chande: SourceConfig,
    #[serde(default = "default_tgju")]
    pub tgju: SourceConfig,
}

fn default_chande() -> SourceConfig {
    SourceConfig {
        base_url: DEFAULT_CHANDE_URL.to_string(),
    }
}

fn default_tgju() -> SourceConfig {
    SourceConfig {
        base_url: DEFAULT_TGJU_URL.to_string(),
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        SourcesConfig {
            chande: default_chande(),
            tgju: default_tgju(),
        }
    }
}

fn default_base_currency() -> String {
    "usd".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Extra attempts after a network failure.
    #[serde(default)]
    pub retries: usize,
    #[serde(default)]
    pub sources: SourcesConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            base_currency: default_base_currency(),
            timeout_secs: default_timeout_secs(),
            retries: 0,
            sources: SourcesConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config at the default path, or defaults when it does not exist.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("ir", "nerkh", "nerkh")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        if config.timeout_secs == 0 {
            bail!("timeout_secs must be at least 1");
        }
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
base_currency: eur
timeout_secs: 5
retries: 2
sources:
  chande:
    base_url: "http://example.com/chande"
  tgju:
    base_url: "http://example.com/tgju"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.base_currency, "eur");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.retries, 2);
        assert_eq!(config.sources.chande.base_url, "http://example.com/chande");
        assert_eq!(config.sources.tgju.base_url, "http://example.com/tgju");
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.base_currency, "usd");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.retries, 0);
        assert_eq!(config.sources.chande.base_url, DEFAULT_CHANDE_URL);
        assert_eq!(config.sources.tgju.base_url, DEFAULT_TGJU_URL);

        let partial: AppConfig = serde_yaml::from_str(
            r#"
sources:
  tgju:
    base_url: "http://localhost:9000"
"#,
        )
        .unwrap();
        assert_eq!(partial.sources.chande.base_url, DEFAULT_CHANDE_URL);
        assert_eq!(partial.sources.tgju.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_load_from_path_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("missing.yaml");
        let err = AppConfig::load_from_path(&missing).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));

        let bad = dir.path().join("bad.yaml");
        fs::write(&bad, "timeout_secs: [not, a, number]").unwrap();
        let err = AppConfig::load_from_path(&bad).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "timeout_secs: 0").unwrap();
        let err = AppConfig::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("timeout_secs must be at least 1"));

        fs::write(&path, "timeout_secs: 1").unwrap();
        assert_eq!(AppConfig::load_from_path(&path).unwrap().timeout_secs, 1);
    }
}
