//! policydocs.toml configuration parser.
//!
//! Both binaries load one `Config`: the store target and the push-listener
//! bind address. The file is optional — every setting has a default — and
//! `POLICYDOCS_STORE_PATH` / `POLICYDOCS_TRIGGER_BIND` override whatever the
//! file says. Configuration is constructed once in `main` and passed down;
//! nothing reads it ambiently.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Default config file consulted when no `--config` path is given.
pub const DEFAULT_CONFIG_FILE: &str = "policydocs.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub trigger: TriggerConfig,
}

/// `[store]` — the embedded document store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file path.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("policydocs.redb"),
        }
    }
}

/// `[trigger]` — the change-notification push listener.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TriggerConfig {
    /// Listen address for push deliveries, `host:port`.
    pub bind: String,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Config {
    /// Load configuration for a process.
    ///
    /// An explicit path must exist and parse. With no path, reads
    /// `policydocs.toml` from the working directory if present, otherwise
    /// starts from defaults. Environment overrides apply last.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_overrides(
            env_string("POLICYDOCS_STORE_PATH"),
            env_string("POLICYDOCS_TRIGGER_BIND"),
        );
        Ok(config)
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    fn apply_overrides(&mut self, store_path: Option<String>, trigger_bind: Option<String>) {
        if let Some(path) = store_path {
            self.store.path = PathBuf::from(path);
        }
        if let Some(bind) = trigger_bind {
            self.trigger.bind = bind;
        }
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
