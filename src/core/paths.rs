//! Store path resolution.

use crate::constants;
use anyhow::{Context, Result};
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct StorePaths {
    pub store: PathBuf,
    pub lock: PathBuf,
    pub audit_log: PathBuf,
}

impl StorePaths {
    /// Resolve the store from CLI arg, env var, config value, or the default
    /// `$HOME/Desktop/passwords.txt`.
    pub fn resolve(store_arg: Option<PathBuf>, configured: Option<PathBuf>) -> Result<Self> {
        if let Some(store) = store_arg {
            return Ok(Self::from_store(store));
        }
        if let Some(store) = env::var_os("PASSGEN_STORE").filter(|v| !v.is_empty()) {
            return Ok(Self::from_store(PathBuf::from(store)));
        }
        if let Some(store) = configured {
            return Ok(Self::from_store(store));
        }
        let home = home_dir()?;
        Ok(Self::from_store(
            home.join(constants::DEFAULT_STORE_DIR)
                .join(constants::DEFAULT_STORE_FILE),
        ))
    }

    /// Derive the lock and audit files as hidden siblings of the store.
    pub fn from_store(store: PathBuf) -> Self {
        let lock = sibling(&store, ".lock");
        let audit_log = sibling(&store, ".audit.log");
        Self {
            store,
            lock,
            audit_log,
        }
    }
}

/// Resolve the config file from CLI arg, env var, or `$HOME/.config`.
pub fn resolve_config(config_arg: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(config) = config_arg {
        return Ok(config);
    }
    if let Some(config) = env::var_os("PASSGEN_CONFIG").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(config));
    }
    Ok(home_dir()?.join(constants::DEFAULT_CONFIG_PATH))
}

fn home_dir() -> Result<PathBuf> {
    env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .context("HOME is not set; pass --store or set PASSGEN_STORE")
}

fn sibling(store: &Path, suffix: &str) -> PathBuf {
    let name = store
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from(constants::DEFAULT_STORE_FILE));
    let mut hidden = OsString::from(".");
    hidden.push(name);
    hidden.push(suffix);
    store.with_file_name(hidden)
}

impl std::fmt::Display for StorePaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "store@{}", self.store.display())
    }
}
