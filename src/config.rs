//! Configuration management with YAML support

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::analytics::{BucketZone, HEATMAP_DAYS, TIMELINE_LIMIT, WEEKLY_DAYS};
use crate::dashboard::DashboardOptions;
use crate::source::SourceKind;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Record source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,

    /// Remote API base URL, e.g. https://example.com/api
    #[serde(default)]
    pub base_url: Option<String>,

    /// Session token; takes precedence over `token_env`
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_token_env")]
    pub token_env: String,

    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

/// Dashboard window and preview sizes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_recent_notes")]
    pub recent_notes: usize,

    #[serde(default = "default_recent_tasks")]
    pub recent_tasks: usize,

    #[serde(default = "default_timeline_limit")]
    pub timeline_limit: usize,

    #[serde(default = "default_weekly_days")]
    pub weekly_days: usize,

    #[serde(default = "default_heatmap_days")]
    pub heatmap_days: usize,

    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,

    /// Zone used to assign records to calendar days: local | utc | +HH:MM
    #[serde(default)]
    pub timezone: BucketZone,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_token_env() -> String {
    "PULSEBOARD_TOKEN".to_string()
}

fn default_snapshot_dir() -> String {
    "~/.local/share/pulseboard/snapshots".to_string()
}

fn default_database_path() -> String {
    "~/.local/share/pulseboard/pulseboard.db".to_string()
}

fn default_recent_notes() -> usize {
    3
}

fn default_recent_tasks() -> usize {
    5
}

fn default_timeline_limit() -> usize {
    TIMELINE_LIMIT
}

fn default_weekly_days() -> usize {
    WEEKLY_DAYS
}

fn default_heatmap_days() -> usize {
    HEATMAP_DAYS
}

fn default_excerpt_chars() -> usize {
    120
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            base_url: None,
            token: None,
            token_env: default_token_env(),
            snapshot_dir: default_snapshot_dir(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_notes: default_recent_notes(),
            recent_tasks: default_recent_tasks(),
            timeline_limit: default_timeline_limit(),
            weekly_days: default_weekly_days(),
            heatmap_days: default_heatmap_days(),
            excerpt_chars: default_excerpt_chars(),
            timezone: BucketZone::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Find the config file to load
    /// Searches in order:
    /// 1. Provided path
    /// 2. ./pulseboard.yaml (current directory)
    /// 3. ~/.config/pulseboard/pulseboard.yaml
    pub fn locate(path: &str) -> Option<PathBuf> {
        let mut search_paths = vec![
            PathBuf::from(shellexpand::tilde(path).to_string()),
            PathBuf::from("pulseboard.yaml"),
        ];
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("pulseboard/pulseboard.yaml"));
        }

        search_paths.into_iter().find(|p| p.exists())
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Get the database path, expanding ~ to home directory
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.database.path).to_string())
    }

    /// Get the snapshot directory for the file source
    pub fn snapshot_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.source.snapshot_dir).to_string())
    }

    /// Session token for the API source: explicit value, else the env var
    pub fn api_token(&self) -> Option<String> {
        self.source
            .token
            .clone()
            .or_else(|| std::env::var(&self.source.token_env).ok())
            .filter(|t| !t.trim().is_empty())
    }

    pub fn dashboard_options(&self) -> DashboardOptions {
        let d = &self.dashboard;
        DashboardOptions {
            windows: crate::analytics::Windows {
                weekly_days: d.weekly_days,
                heatmap_days: d.heatmap_days,
            },
            recent_notes: d.recent_notes,
            recent_tasks: d.recent_tasks,
            timeline_limit: d.timeline_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source.kind, SourceKind::Api);
        assert_eq!(config.dashboard.recent_notes, 3);
        assert_eq!(config.dashboard.recent_tasks, 5);
        assert_eq!(config.dashboard.timeline_limit, 6);
        assert_eq!(config.dashboard.weekly_days, 7);
        assert_eq!(config.dashboard.heatmap_days, 30);
        assert_eq!(config.dashboard.timezone, BucketZone::Local);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
source:
  kind: file
  snapshot_dir: /tmp/pulse
  token: abc123

database:
  path: ~/.local/share/pulseboard/test.db

dashboard:
  recent_tasks: 10
  timezone: utc
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.source.kind, SourceKind::File);
        assert_eq!(config.snapshot_dir(), PathBuf::from("/tmp/pulse"));
        assert_eq!(config.api_token().as_deref(), Some("abc123"));
        assert_eq!(config.dashboard.recent_tasks, 10);
        assert_eq!(config.dashboard.recent_notes, 3);
        assert_eq!(config.dashboard.timezone, BucketZone::Utc);

        let options = config.dashboard_options();
        assert_eq!(options.recent_tasks, 10);
        assert_eq!(options.windows.heatmap_days, 30);
    }

    #[test]
    fn test_bad_timezone_rejected() {
        let yaml = "dashboard:\n  timezone: mars\n";
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_token_from_env() {
        let mut config = Config::default();
        config.source.token_env = "PULSEBOARD_TEST_TOKEN_FROM_ENV".to_string();
        std::env::set_var("PULSEBOARD_TEST_TOKEN_FROM_ENV", "env-token");
        assert_eq!(config.api_token().as_deref(), Some("env-token"));

        config.source.token = Some("explicit".to_string());
        assert_eq!(config.api_token().as_deref(), Some("explicit"));
    }

    #[test]
    fn test_locate_prefers_explicit_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("custom.yaml");
        std::fs::write(&path, "dashboard:\n  recent_tasks: 2\n").unwrap();

        let found = Config::locate(path.to_str().unwrap()).unwrap();
        assert_eq!(found, path);
        assert_eq!(Config::from_file(&found).unwrap().dashboard.recent_tasks, 2);
    }

    #[test]
    fn test_unreadable_config_is_an_error() {
        let err = Config::from_file(Path::new("/nonexistent/pulseboard-test.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "dashboard: [unclosed").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }
}
