// Rust guideline compliant 2026-02-06

//! Configuration management for baseutils.

use crate::logging::LogFormat;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the repository root.
pub const CONFIG_FILE: &str = "baseutils.toml";

/// Settings for the commit-time lint gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintConfig {
    /// Lint tool looked up on `PATH`.
    #[serde(default = "default_tool")]
    pub tool: String,

    /// Maximum McCabe complexity before a function is flagged.
    #[serde(default = "default_max_complexity")]
    pub max_complexity: u32,

    /// Maximum allowed line length.
    #[serde(default = "default_max_line_length")]
    pub max_line_length: u32,

    /// Whether the tool should print per-code statistics.
    #[serde(default = "default_statistics")]
    pub statistics: bool,

    /// Paths excluded from linting.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

fn default_tool() -> String {
    "flake8".to_string()
}

fn default_max_complexity() -> u32 {
    10
}

fn default_max_line_length() -> u32 {
    160
}

fn default_statistics() -> bool {
    true
}

fn default_exclude() -> Vec<String> {
    vec!["./.git".to_string()]
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            tool: default_tool(),
            max_complexity: default_max_complexity(),
            max_line_length: default_max_line_length(),
            statistics: default_statistics(),
            exclude: default_exclude(),
        }
    }
}

/// Configuration for baseutils tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Lint gate settings.
    #[serde(default)]
    pub lint: LintConfig,

    /// Default log level name.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Default log line format.
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lint: LintConfig::default(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Loads configuration from file and environment variables.
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values
    /// 2. Configuration file at `<dir>/baseutils.toml`
    /// 3. Environment variables with `BASEUTILS_` prefix
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file exists but cannot be read
    /// - Configuration file contains invalid TOML
    /// - Configuration values fail validation
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE);
        Self::load_file(&config_path)
    }

    /// Loads configuration from an explicit file path.
    ///
    /// A missing file yields the defaults, with environment overrides applied.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_file(config_path: &Path) -> Result<Self> {
        let mut config = Self::default();

        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            config = toml::from_str(&content)
                .map_err(|e| crate::Error::Config(format!("Invalid config file: {}", e)))?;
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Applies environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `BASEUTILS_LINT_TOOL` - Lint tool name
    /// - `BASEUTILS_MAX_COMPLEXITY` - Complexity threshold
    /// - `BASEUTILS_MAX_LINE_LENGTH` - Line length threshold
    /// - `BASEUTILS_STATISTICS` - Statistics output (true/false)
    /// - `BASEUTILS_EXCLUDE` - Comma-separated exclude paths
    /// - `BASEUTILS_LOG_LEVEL` - Log level name
    /// - `BASEUTILS_LOG_FORMAT` - Log format (text/json)
    ///
    /// # Errors
    ///
    /// Returns an error if environment variable values are invalid.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("BASEUTILS_LINT_TOOL") {
            self.lint.tool = val;
        }

        if let Ok(val) = std::env::var("BASEUTILS_MAX_COMPLEXITY") {
            self.lint.max_complexity = val.parse().map_err(|_| {
                crate::Error::Config("BASEUTILS_MAX_COMPLEXITY must be a positive number".to_string())
            })?;
        }

        if let Ok(val) = std::env::var("BASEUTILS_MAX_LINE_LENGTH") {
            self.lint.max_line_length = val.parse().map_err(|_| {
                crate::Error::Config("BASEUTILS_MAX_LINE_LENGTH must be a positive number".to_string())
            })?;
        }

        if let Ok(val) = std::env::var("BASEUTILS_STATISTICS") {
            self.lint.statistics = val.parse().map_err(|_| {
                crate::Error::Config("BASEUTILS_STATISTICS must be true or false".to_string())
            })?;
        }

        if let Ok(val) = std::env::var("BASEUTILS_EXCLUDE") {
            self.lint.exclude = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Ok(val) = std::env::var("BASEUTILS_LOG_LEVEL") {
            self.log_level = val;
        }

        if let Ok(val) = std::env::var("BASEUTILS_LOG_FORMAT") {
            self.log_format = match val.as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => {
                    return Err(crate::Error::Config(
                        "BASEUTILS_LOG_FORMAT must be text or json".to_string(),
                    ))
                }
            };
        }

        Ok(())
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the lint tool name is empty
    /// - max_complexity or max_line_length is zero
    /// - log_level is not a known level
    fn validate(&self) -> Result<()> {
        if self.lint.tool.trim().is_empty() {
            return Err(crate::Error::Config("lint.tool cannot be empty".to_string()));
        }

        if self.lint.max_complexity == 0 {
            return Err(crate::Error::Config(
                "lint.max_complexity must be greater than 0".to_string(),
            ));
        }

        if self.lint.max_line_length == 0 {
            return Err(crate::Error::Config(
                "lint.max_line_length must be greater than 0".to_string(),
            ));
        }

        crate::logging::parse_log_level(&self.log_level)
            .map_err(|e| crate::Error::Config(e.to_string()))?;

        Ok(())
    }

    /// Saves the configuration to `<dir>/baseutils.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be created or written
    /// - Serialization fails
    pub fn save(&self, dir: &Path) -> Result<()> {
        let config_path = dir.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Environment variables are process-wide; serialize the tests touching them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_all_env_vars() {
        for key in [
            "BASEUTILS_LINT_TOOL",
            "BASEUTILS_MAX_COMPLEXITY",
            "BASEUTILS_MAX_LINE_LENGTH",
            "BASEUTILS_STATISTICS",
            "BASEUTILS_EXCLUDE",
            "BASEUTILS_LOG_LEVEL",
            "BASEUTILS_LOG_FORMAT",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.lint.tool, "flake8");
        assert_eq!(config.lint.max_complexity, 10);
        assert_eq!(config.lint.max_line_length, 160);
        assert!(config.lint.statistics);
        assert_eq!(config.lint.exclude, vec!["./.git".to_string()]);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_config_load_missing_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_all_env_vars();
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_load_from_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_all_env_vars();
        let temp_dir = TempDir::new().unwrap();
        let content = r#"
log_level = "debug"
log_format = "json"

[lint]
tool = "ruff"
max_complexity = 12
max_line_length = 120
statistics = false
exclude = ["build", "dist"]
"#;
        std::fs::write(temp_dir.path().join(CONFIG_FILE), content).unwrap();

        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config.lint.tool, "ruff");
        assert_eq!(config.lint.max_complexity, 12);
        assert_eq!(config.lint.max_line_length, 120);
        assert!(!config.lint.statistics);
        assert_eq!(config.lint.exclude, vec!["build", "dist"]);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_partial_lint_table_keeps_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_all_env_vars();
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILE), "[lint]\nmax_line_length = 99\n").unwrap();

        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config.lint.max_line_length, 99);
        assert_eq!(config.lint.tool, "flake8");
        assert_eq!(config.lint.max_complexity, 10);
    }

    #[test]
    fn test_config_validation_zero_complexity() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_all_env_vars();
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILE), "[lint]\nmax_complexity = 0\n").unwrap();

        assert!(Config::load(temp_dir.path()).is_err());
    }

    #[test]
    fn test_config_validation_unknown_level() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_all_env_vars();
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILE), "log_level = \"loud\"\n").unwrap();

        assert!(Config::load(temp_dir.path()).is_err());
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_all_env_vars();
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILE), "lint = [").unwrap();

        let err = Config::load(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn test_config_env_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_all_env_vars();
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILE), "[lint]\nmax_complexity = 4\n").unwrap();

        std::env::set_var("BASEUTILS_MAX_COMPLEXITY", "15");
        std::env::set_var("BASEUTILS_EXCLUDE", "a, b,,c");
        std::env::set_var("BASEUTILS_STATISTICS", "false");
        std::env::set_var("BASEUTILS_LOG_FORMAT", "json");
        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config.lint.max_complexity, 15);
        assert_eq!(config.lint.exclude, vec!["a", "b", "c"]);
        assert!(!config.lint.statistics);
        assert_eq!(config.log_format, LogFormat::Json);

        clear_all_env_vars();
    }

    #[test]
    fn test_config_env_invalid_values() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_all_env_vars();
        let temp_dir = TempDir::new().unwrap();

        std::env::set_var("BASEUTILS_MAX_LINE_LENGTH", "wide");
        assert!(Config::load(temp_dir.path()).is_err());
        clear_all_env_vars();

        std::env::set_var("BASEUTILS_LOG_FORMAT", "xml");
        assert!(Config::load(temp_dir.path()).is_err());
        clear_all_env_vars();
    }

    #[test]
    fn test_config_save_and_load() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_all_env_vars();
        let temp_dir = TempDir::new().unwrap();

        let mut original = Config::default();
        original.lint.tool = "pyflakes".to_string();
        original.lint.exclude = vec!["vendor".to_string()];
        original.log_level = "warn".to_string();

        original.save(temp_dir.path()).unwrap();
        let loaded = Config::load(temp_dir.path()).unwrap();
        assert_eq!(original, loaded);
    }
}
