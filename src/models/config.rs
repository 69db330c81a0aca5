//! Configuration for the dashboard.
//!
//! Settings come from TOML files (system-wide, then per-user) and are then
//! overridden by `JOBDASH_*` environment variables. Invalid values fall back to
//! their defaults with a warning, unless `JOBDASH_STRICT_CONFIG=1` is set, in
//! which case loading fails.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const SYSTEM_CONFIG_PATH: &str = "/etc/jobdash/config.toml";
const USER_CONFIG_SUFFIX: &str = "jobdash/config.toml";

/// Dashboard configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub server: ServerConfig,

    pub refresh: RefreshConfig,

    pub display: DisplayConfig,

    pub logging: LoggingConfig,
}

/// Where the job/node info API lives
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the dashboard server, e.g. `http://slurm-info:8080`
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Poll the server periodically in the TUI
    pub auto_refresh: bool,

    /// Jobs refresh interval in seconds
    pub jobs_interval: u64,

    /// Nodes refresh interval in seconds
    pub nodes_interval: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            auto_refresh: false,
            jobs_interval: 30,
            nodes_interval: 60,
        }
    }
}

/// Minimum allowed refresh interval in seconds (prevents tight polling loops)
const MIN_REFRESH_INTERVAL: u64 = 1;

/// Minimum request timeout in seconds
const MIN_TIMEOUT: u64 = 1;

/// Validate that a value meets its minimum.
/// In non-strict mode, corrects invalid values to the default and adds a warning.
/// In strict mode, returns an error for invalid values.
fn validate_minimum(
    value: &mut u64,
    field: &'static str,
    min: u64,
    default: u64,
    strict: bool,
    warnings: &mut Vec<String>,
) -> Result<(), ConfigError> {
    if *value < min {
        let msg = format!("{field} must be at least {min} second(s), got {value}");
        if strict {
            return Err(ConfigError::Invalid(msg));
        }
        warnings.push(format!("{msg} - using default ({default})"));
        *value = default;
    }
    Ok(())
}

impl RefreshConfig {
    /// Validate refresh configuration values.
    /// Returns a list of warnings for invalid values that were corrected to defaults.
    pub fn validate(&mut self, strict: bool) -> Result<Vec<String>, ConfigError> {
        let mut warnings = Vec::new();
        let defaults = Self::default();

        validate_minimum(
            &mut self.jobs_interval,
            "refresh.jobs_interval",
            MIN_REFRESH_INTERVAL,
            defaults.jobs_interval,
            strict,
            &mut warnings,
        )?;

        validate_minimum(
            &mut self.nodes_interval,
            "refresh.nodes_interval",
            MIN_REFRESH_INTERVAL,
            defaults.nodes_interval,
            strict,
            &mut warnings,
        )?;

        Ok(warnings)
    }
}

impl ServerConfig {
    pub fn validate(&mut self, strict: bool) -> Result<Vec<String>, ConfigError> {
        let mut warnings = Vec::new();
        let defaults = Self::default();

        validate_minimum(
            &mut self.timeout_secs,
            "server.timeout_secs",
            MIN_TIMEOUT,
            defaults.timeout_secs,
            strict,
            &mut warnings,
        )?;

        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            let msg = format!(
                "server.base_url must start with http:// or https://, got '{}'",
                self.base_url
            );
            if strict {
                return Err(ConfigError::Invalid(msg));
            }
            warnings.push(format!("{msg} - using default ({})", defaults.base_url));
            self.base_url = defaults.base_url;
        }

        Ok(warnings)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Default TUI view on startup ("jobs" or "nodes")
    pub default_view: String,

    /// Theme name
    pub theme: String,

    /// Job collection shown by default ("active", "running" or "all")
    pub job_scope: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_view: "jobs".to_string(),
            theme: "dark".to_string(),
            job_scope: "active".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file for the TUI. The terminal UI never logs to stderr.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid value '{value}' for {var}: {reason}")]
    Env {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Invalid(String),
}

impl DashboardConfig {
    /// Get the user config file path, respecting XDG_CONFIG_HOME
    ///
    /// Resolution order:
    /// 1. $XDG_CONFIG_HOME/jobdash/config.toml (if XDG_CONFIG_HOME is set)
    /// 2. $HOME/.config/jobdash/config.toml (if HOME is set)
    /// 3. dirs::config_dir()/jobdash/config.toml
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
            && !xdg_config.is_empty()
        {
            return Some(PathBuf::from(xdg_config).join(USER_CONFIG_SUFFIX));
        }

        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(".config").join(USER_CONFIG_SUFFIX));
        }

        dirs::config_dir().map(|dir| dir.join(USER_CONFIG_SUFFIX))
    }

    /// Load configuration from files and environment.
    /// Returns the config and any warnings encountered during loading.
    pub fn load() -> Result<(Self, Vec<String>), ConfigError> {
        let strict = Self::is_strict_mode();
        let mut config = Self::default();
        let mut warnings = Vec::new();

        config.load_config_file(Path::new(SYSTEM_CONFIG_PATH), strict, &mut warnings)?;

        if let Some(user_path) = Self::user_config_path() {
            config.load_config_file(&user_path, strict, &mut warnings)?;
        }

        config.apply_env_overrides(|var| std::env::var(var).ok(), strict, &mut warnings)?;
        warnings.extend(config.validate(strict)?);

        Ok((config, warnings))
    }

    /// Check if strict config mode is enabled via JOBDASH_STRICT_CONFIG
    fn is_strict_mode() -> bool {
        std::env::var("JOBDASH_STRICT_CONFIG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn validate(&mut self, strict: bool) -> Result<Vec<String>, ConfigError> {
        let mut warnings = self.server.validate(strict)?;
        warnings.extend(self.refresh.validate(strict)?);
        Ok(warnings)
    }

    /// Merge a config file into `self`. A missing file is not an error.
    fn load_config_file(
        &mut self,
        path: &Path,
        strict: bool,
        warnings: &mut Vec<String>,
    ) -> Result<(), ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(source) => {
                let err = ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                };
                if strict {
                    return Err(err);
                }
                warnings.push(err.to_string());
                return Ok(());
            }
        };

        match toml::from_str::<DashboardConfig>(&content) {
            Ok(parsed) => {
                tracing::debug!(path = %path.display(), "loaded config file");
                self.merge(parsed);
                Ok(())
            }
            Err(source) => {
                let err = ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                };
                if strict {
                    return Err(err);
                }
                warnings.push(err.to_string());
                Ok(())
            }
        }
    }

    fn merge(&mut self, other: DashboardConfig) {
        self.server = other.server;
        self.refresh = other.refresh;
        self.display = other.display;
        // A later file without a log path keeps the earlier one
        self.logging.file = other.logging.file.or(self.logging.file.take());
    }

    /// Apply `JOBDASH_*` overrides read through `var`.
    fn apply_env_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
        strict: bool,
        warnings: &mut Vec<String>,
    ) -> Result<(), ConfigError> {
        let mut report = |err: ConfigError| -> Result<(), ConfigError> {
            if strict {
                return Err(err);
            }
            warnings.push(format!("{err} - using default"));
            Ok(())
        };

        if let Some(val) = var("JOBDASH_SERVER")
            && !val.is_empty()
        {
            self.server.base_url = val;
        }

        if let Some(val) = var("JOBDASH_TIMEOUT") {
            match parse_seconds(&val, MIN_TIMEOUT) {
                Ok(secs) => self.server.timeout_secs = secs,
                Err(reason) => report(ConfigError::Env {
                    var: "JOBDASH_TIMEOUT",
                    value: val,
                    reason,
                })?,
            }
        }

        if let Some(val) = var("JOBDASH_REFRESH_JOBS") {
            match parse_seconds(&val, MIN_REFRESH_INTERVAL) {
                Ok(secs) => self.refresh.jobs_interval = secs,
                Err(reason) => report(ConfigError::Env {
                    var: "JOBDASH_REFRESH_JOBS",
                    value: val,
                    reason,
                })?,
            }
        }

        if let Some(val) = var("JOBDASH_REFRESH_NODES") {
            match parse_seconds(&val, MIN_REFRESH_INTERVAL) {
                Ok(secs) => self.refresh.nodes_interval = secs,
                Err(reason) => report(ConfigError::Env {
                    var: "JOBDASH_REFRESH_NODES",
                    value: val,
                    reason,
                })?,
            }
        }

        if let Some(val) = var("JOBDASH_THEME") {
            self.display.theme = val;
        }

        Ok(())
    }
}

fn parse_seconds(value: &str, min: u64) -> Result<u64, String> {
    match value.parse::<u64>() {
        Ok(secs) if secs >= min => Ok(secs),
        Ok(_) => Err(format!("must be at least {min} second(s)")),
        Err(_) => Err("expected a positive integer (seconds)".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let mut config = DashboardConfig::default();
        let warnings = config.validate(true).unwrap();
        assert!(warnings.is_empty());
        assert!(!config.refresh.auto_refresh);
        assert_eq!(config.display.job_scope, "active");
    }

    #[test]
    fn test_refresh_validate_zero_interval() {
        let mut config = RefreshConfig {
            auto_refresh: true,
            jobs_interval: 0,
            nodes_interval: 10,
        };

        let warnings = config.validate(false).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("jobs_interval"));
        assert!(warnings[0].contains("at least 1"));
        assert_eq!(config.jobs_interval, RefreshConfig::default().jobs_interval);
    }

    #[test]
    fn test_refresh_validate_strict_mode_error() {
        let mut config = RefreshConfig {
            auto_refresh: false,
            jobs_interval: 5,
            nodes_interval: 0,
        };

        let err = config.validate(true).unwrap_err();
        assert!(err.to_string().contains("nodes_interval"));
    }

    #[test]
    fn test_server_validate_bad_url() {
        let mut config = ServerConfig {
            base_url: "slurm-info:8080".to_string(),
            timeout_secs: 5,
        };

        let warnings = config.validate(false).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(config.base_url, ServerConfig::default().base_url);

        config.base_url = "ftp://nope".to_string();
        assert!(config.validate(true).is_err());
    }

    #[test]
    fn test_toml_partial_file() {
        let parsed: DashboardConfig = toml::from_str(
            r#"
            [server]
            base_url = "https://dash.example.org"

            [refresh]
            auto_refresh = true
            "#,
        )
        .unwrap();

        assert_eq!(parsed.server.base_url, "https://dash.example.org");
        assert_eq!(parsed.server.timeout_secs, 10);
        assert!(parsed.refresh.auto_refresh);
        assert_eq!(parsed.refresh.jobs_interval, 30);
        assert_eq!(parsed.display.theme, "dark");
    }

    #[test]
    fn test_merge_keeps_earlier_log_file() {
        let mut config = DashboardConfig::default();
        config.logging.file = Some(PathBuf::from("/var/log/jobdash.log"));
        config.merge(DashboardConfig::default());
        assert_eq!(
            config.logging.file.as_deref(),
            Some(Path::new("/var/log/jobdash.log"))
        );
    }

    #[test]
    fn test_env_overrides() {
        let mut config = DashboardConfig::default();
        let mut warnings = Vec::new();
        config
            .apply_env_overrides(
                env(&[
                    ("JOBDASH_SERVER", "http://info:9000"),
                    ("JOBDASH_TIMEOUT", "3"),
                    ("JOBDASH_REFRESH_JOBS", "15"),
                    ("JOBDASH_THEME", "light"),
                ]),
                false,
                &mut warnings,
            )
            .unwrap();

        assert!(warnings.is_empty());
        assert_eq!(config.server.base_url, "http://info:9000");
        assert_eq!(config.server.timeout_secs, 3);
        assert_eq!(config.refresh.jobs_interval, 15);
        assert_eq!(config.refresh.nodes_interval, 60);
        assert_eq!(config.display.theme, "light");
    }

    #[test]
    fn test_env_override_invalid_value_warns() {
        let mut config = DashboardConfig::default();
        let mut warnings = Vec::new();
        config
            .apply_env_overrides(
                env(&[("JOBDASH_REFRESH_NODES", "soon")]),
                false,
                &mut warnings,
            )
            .unwrap();

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("JOBDASH_REFRESH_NODES"));
        assert_eq!(config.refresh.nodes_interval, 60);
    }

    #[test]
    fn test_env_override_invalid_value_strict() {
        let mut config = DashboardConfig::default();
        let mut warnings = Vec::new();
        let err = config
            .apply_env_overrides(env(&[("JOBDASH_TIMEOUT", "0")]), true, &mut warnings)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: "JOBDASH_TIMEOUT", .. }));
    }

    #[test]
    fn test_missing_config_file_is_ignored() {
        let mut config = DashboardConfig::default();
        let mut warnings = Vec::new();
        config
            .load_config_file(
                Path::new("/nonexistent/jobdash/config.toml"),
                true,
                &mut warnings,
            )
            .unwrap();
        assert!(warnings.is_empty());
    }
}
