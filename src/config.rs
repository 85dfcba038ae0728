use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{DEDUP_WINDOW_MS, DEFAULT_PAGE_SIZE, POLL_INTERVAL_MS, REQUEST_TIMEOUT_SECS};
use crate::engine::EngineSettings;
use crate::mail::types::MailboxId;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub inbox: InboxConfig,
}

/// Where the mail service lives
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout; 0 disables it
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InboxConfig {
    /// Mailbox opened at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_mailbox: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub auto_refresh: bool,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_dedup_window_ms")]
    pub dedup_window_ms: u64,
}

impl Default for InboxConfig {
    fn default() -> Self {
        Self {
            default_mailbox: None,
            page_size: default_page_size(),
            auto_refresh: false,
            poll_interval_ms: default_poll_interval_ms(),
            dedup_window_ms: default_dedup_window_ms(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    REQUEST_TIMEOUT_SECS
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_poll_interval_ms() -> u64 {
    POLL_INTERVAL_MS
}

fn default_dedup_window_ms() -> u64 {
    DEDUP_WINDOW_MS
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("inbox-sync");
        Ok(dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            anyhow::bail!(
                "Configuration file not found at {}\n\
                 Run `inbox-sync init` to write the defaults, or create it by hand. Example:\n\n\
                 [service]\n\
                 base_url = \"http://localhost:3000\"\n\n\
                 [inbox]\n\
                 default_mailbox = \"you@example.com\"\n\
                 page_size = 10\n\
                 auto_refresh = false",
                path.display()
            );
        }

        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.inbox.page_size == 0 {
            anyhow::bail!("inbox.page_size must be at least 1");
        }
        if self.inbox.poll_interval_ms == 0 {
            anyhow::bail!("inbox.poll_interval_ms must be at least 1");
        }
        if self.service.base_url.trim().is_empty() {
            anyhow::bail!("service.base_url must not be empty");
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let dir = path
            .parent()
            .context("Config path has no parent directory")?;

        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(Self::config_dir()?)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        match self.service.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            mailbox: self
                .inbox
                .default_mailbox
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(MailboxId::new),
            page_size: self.inbox.page_size,
            auto_refresh: self.inbox.auto_refresh,
            poll_interval: Duration::from_millis(self.inbox.poll_interval_ms),
            dedup_window: Duration::from_millis(self.inbox.dedup_window_ms),
        }
    }
}
