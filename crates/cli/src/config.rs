// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.firewatch/config.toml` and includes:
//! - `org_id`: organisation that owns every uploaded blob
//! - `store`: optional path of the offline database
//! - `[remote]`: optional backend connection; without it the store only
//!   accumulates offline writes

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::sync::{self, SyncConfig, DEFAULT_MAX_RETRIES};

const WORK_DIR_NAME: &str = ".firewatch";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "offline.db";
const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Log file written by `fw watch`, next to the store.
pub const LOG_FILE_NAME: &str = "firewatch.log";
/// Lock file held by `fw watch`, next to the store.
pub const LOCK_FILE_NAME: &str = "watch.lock";

/// Project configuration stored in `.firewatch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Organisation ID used in blob paths.
    pub org_id: String,
    /// Optional database path (relative to the project root, absolute, or `~/...`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
    /// Remote backend (optional - if absent, nothing is ever synced).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteSettings>,
}

/// Remote backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// WebSocket URL of the fw-remote server (`ws://...` or `wss://...`).
    pub url: String,
    /// Failed attempts tolerated before a queued mutation is dead-lettered.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Interval between reachability probes in `fw watch`.
    #[serde(default = "default_probe_interval_ms")]
    pub probe_interval_ms: u64,
    /// Max time to wait for a reply to one request, connection included.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_probe_interval_ms() -> u64 {
    5_000
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

/// Returns true if `org_id` is usable as a blob path segment.
pub fn validate_org_id(org_id: &str) -> bool {
    is_path_segment(org_id)
}

/// Returns true if a task or asset ID is usable as a blob path segment.
pub fn validate_record_id(id: &str) -> bool {
    is_path_segment(id)
}

fn is_path_segment(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl RemoteSettings {
    /// Settings for `url` with every tunable at its default.
    pub fn new(url: impl Into<String>) -> Self {
        RemoteSettings {
            url: url.into(),
            max_retries: default_max_retries(),
            probe_interval_ms: default_probe_interval_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }

    /// Validates that the URL is a WebSocket URL.
    ///
    /// Returns an error message if the URL is invalid.
    pub fn validate_url(&self) -> Option<String> {
        let url = &self.url;
        let rest = url
            .strip_prefix("ws://")
            .or_else(|| url.strip_prefix("wss://"));
        match rest {
            Some(host) if !host.is_empty() => None,
            Some(_) => Some(format!("invalid remote URL '{}': missing host", url)),
            None => Some(format!(
                "invalid remote URL '{}': must start with ws:// or wss://",
                url
            )),
        }
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// The `host:port` reachability probes connect to.
    pub fn probe_addr(&self) -> Result<String> {
        sync::probe_address(&self.url).ok_or_else(|| {
            Error::InvalidRemoteUrl(format!(
                "cannot derive host and port from remote URL '{}'",
                self.url
            ))
        })
    }

    /// Connection settings for the WebSocket client.
    pub fn client_config(&self) -> sync::RemoteConfig {
        let mut config = sync::RemoteConfig::new(self.url.clone());
        config.request_timeout = self.request_timeout();
        config
    }
}

impl Config {
    /// Creates a new config for the given organisation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrgId`] if `org_id` is empty or not path safe.
    pub fn new(org_id: String) -> Result<Self> {
        if !validate_org_id(&org_id) {
            return Err(Error::InvalidOrgId(org_id));
        }
        Ok(Config {
            org_id,
            store: None,
            remote: None,
        })
    }

    /// Loads configuration from the given `.firewatch/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        if !validate_org_id(&config.org_id) {
            return Err(Error::InvalidOrgId(config.org_id));
        }
        Ok(config)
    }

    /// Saves configuration to the given `.firewatch/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Returns the remote settings, validated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRemote`] when no `[remote]` section is configured.
    pub fn remote(&self) -> Result<&RemoteSettings> {
        let remote = self.remote.as_ref().ok_or(Error::NoRemote)?;
        if let Some(msg) = remote.validate_url() {
            return Err(Error::Config(msg));
        }
        Ok(remote)
    }

    /// Engine settings derived from this config.
    pub fn sync_config(&self) -> SyncConfig {
        let mut config = SyncConfig::new(self.org_id.clone());
        if let Some(remote) = &self.remote {
            config.max_retries = remote.max_retries;
        }
        config
    }
}

/// Find the .firewatch directory by walking up from the current directory
pub fn find_work_dir() -> Result<PathBuf> {
    find_work_dir_from(&std::env::current_dir()?)
}

/// Find the .firewatch directory by walking up from `start`
pub fn find_work_dir_from(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Get the database path from config
pub fn get_store_path(work_dir: &Path, config: &Config) -> PathBuf {
    match &config.store {
        Some(store) => {
            if let Some(rest) = store.strip_prefix("~/") {
                if let Some(home) = dirs::home_dir() {
                    return home.join(rest);
                }
            }
            let store_path = Path::new(store);
            if store_path.is_absolute() {
                store_path.to_path_buf()
            } else {
                // Relative to work_dir's parent (the project root)
                work_dir.parent().unwrap_or(work_dir).join(store)
            }
        }
        None => work_dir.join(DB_FILE_NAME),
    }
}

/// Directory holding the store, its log and its lock.
pub fn get_data_dir(work_dir: &Path, config: &Config) -> PathBuf {
    let store_path = get_store_path(work_dir, config);
    store_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| work_dir.to_path_buf())
}

/// Initialize a new .firewatch directory at the given path
pub fn init_work_dir(path: &Path, org_id: &str, remote: Option<&str>) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.join(CONFIG_FILE_NAME).exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    let mut config = Config::new(org_id.to_string())?;
    if let Some(url) = remote {
        let settings = RemoteSettings::new(url);
        if let Some(msg) = settings.validate_url() {
            return Err(Error::InvalidRemoteUrl(msg));
        }
        config.remote = Some(settings);
    }

    fs::create_dir_all(&work_dir)?;
    config.save(&work_dir)?;
    write_gitignore(&work_dir)?;

    Ok(work_dir)
}

/// Write a .gitignore file to the work directory.
///
/// The store and the watcher's runtime files are machine-local.
pub fn write_gitignore(work_dir: &Path) -> Result<()> {
    let gitignore_path = work_dir.join(GITIGNORE_FILE_NAME);
    let content = format!(
        "# Offline store\n{DB_FILE_NAME}\n{DB_FILE_NAME}-*\n\n# fw watch runtime files\n{LOG_FILE_NAME}\n{LOCK_FILE_NAME}\n"
    );
    fs::write(&gitignore_path, content)?;
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
