use crate::flow::{DEFAULT_CLICK_WINDOW_MS, DEFAULT_REFRESH_SECS};
use crate::persistence::{atomic_write, config_file};
use crate::watchdog::DEFAULT_IDLE_THRESHOLD_SECS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const DEFAULT_CONFIG: &str = r#"
[server]
base_url = "http://localhost:8082"
timeout_secs = 60

[focus]
idle_threshold_secs = 30
encouragement_refresh_secs = 300
click_window_ms = 500
hourly_encouragement = true

[logging]
level = "info"
"#;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub focus: Focus,
    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Focus {
    #[serde(default = "default_idle_threshold_secs")]
    pub idle_threshold_secs: u64,
    #[serde(default = "default_refresh_secs")]
    pub encouragement_refresh_secs: u64,
    #[serde(default = "default_click_window_ms")]
    pub click_window_ms: u64,
    #[serde(default = "default_true")]
    pub hourly_encouragement: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logging {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_base_url() -> String {
    "http://localhost:8082".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_idle_threshold_secs() -> u64 {
    DEFAULT_IDLE_THRESHOLD_SECS
}

fn default_refresh_secs() -> u64 {
    DEFAULT_REFRESH_SECS
}

fn default_click_window_ms() -> u64 {
    DEFAULT_CLICK_WINDOW_MS
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for Server {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Focus {
    fn default() -> Self {
        Self {
            idle_threshold_secs: default_idle_threshold_secs(),
            encouragement_refresh_secs: default_refresh_secs(),
            click_window_ms: default_click_window_ms(),
            hourly_encouragement: true,
        }
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Focus {
    pub fn idle_threshold(&self) -> Duration {
        Duration::from_secs(self.idle_threshold_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.encouragement_refresh_secs)
    }

    pub fn click_window(&self) -> Duration {
        Duration::from_millis(self.click_window_ms)
    }
}

impl Server {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub fn parse(content: &str) -> Result<Config> {
    toml::from_str(content).context("Invalid config file")
}

/// Load `config.toml` from the data directory, writing the defaults on first run
pub fn load_or_init(data_dir: &Path) -> Result<Config> {
    let path = config_file(data_dir);
    if !path.exists() {
        atomic_write(&path, DEFAULT_CONFIG.trim_start())?;
    }
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    parse(&content)
}
