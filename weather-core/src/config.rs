use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// # base_url = "https://api.weatherapi.com"
/// ```
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// weatherapi.com API key.
    pub api_key: Option<String>,

    /// Optional provider host override, mostly for testing against a local server.
    pub base_url: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_deref().map(redact_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Config {
    /// Load config from disk (or defaults on first run), then apply the
    /// `WEATHER_API_KEY` override.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_from_disk()?;
        cfg.apply_env_key(std::env::var(API_KEY_ENV).ok());
        Ok(cfg)
    }

    /// Load only what is stored on disk, ignoring the environment.
    pub fn load_from_disk() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
    }

    /// Replace the file key with an environment-provided one, if non-empty.
    pub fn apply_env_key(&mut self, env_key: Option<String>) {
        if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-lookup", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    /// The API key to use, or a hint on how to configure one.
    pub fn resolve_api_key(&self) -> Result<String> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: run `weather configure` or set {API_KEY_ENV}."
                )
            })
    }
}

/// Mask all but the last four characters of a key, for logs.
pub fn redact_key(key: &str) -> String {
    let count = key.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = key.chars().skip(count - 4).collect();
    format!("****{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.resolve_api_key().unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("Hint: run `weather configure`"));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let cfg = Config {
            api_key: Some("   ".into()),
            ..Config::default()
        };
        assert!(cfg.resolve_api_key().is_err());
    }

    #[test]
    fn set_api_key_trims_input() {
        let mut cfg = Config::default();
        cfg.set_api_key("  KEY \n".into());
        assert_eq!(cfg.resolve_api_key().expect("key must exist"), "KEY");
    }

    #[test]
    fn env_key_overrides_file_key() {
        let mut cfg = Config::from_toml(r#"api_key = "FILE_KEY""#).expect("valid toml");

        cfg.apply_env_key(Some("ENV_KEY".into()));
        assert_eq!(cfg.resolve_api_key().expect("key must exist"), "ENV_KEY");
    }

    #[test]
    fn empty_env_key_keeps_file_key() {
        let mut cfg = Config::from_toml(r#"api_key = "FILE_KEY""#).expect("valid toml");

        cfg.apply_env_key(Some(String::new()));
        cfg.apply_env_key(None);
        assert_eq!(cfg.resolve_api_key().expect("key must exist"), "FILE_KEY");
    }

    #[test]
    fn base_url_is_optional_in_toml() {
        let cfg = Config::from_toml("base_url = \"http://127.0.0.1:9999\"").expect("valid toml");
        assert_eq!(cfg.base_url.as_deref(), Some("http://127.0.0.1:9999"));
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn toml_roundtrip_keeps_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());

        let text = toml::to_string_pretty(&cfg).expect("serializable");
        let back = Config::from_toml(&text).expect("valid toml");
        assert_eq!(back.api_key.as_deref(), Some("KEY"));
    }

    #[test]
    fn redact_key_keeps_only_tail() {
        assert_eq!(redact_key("abcdef123456"), "****3456");
        assert_eq!(redact_key("abc"), "****");
    }

    #[test]
    fn debug_output_is_redacted() {
        let mut cfg = Config::default();
        cfg.set_api_key("supersecretkey".into());
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("supersecret"));
    }
}
