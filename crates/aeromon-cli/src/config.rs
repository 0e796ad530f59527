//! CLI configuration file: optional defaults for flags.
//!
//! A small TOML file (`host`, `interval`) merged with `AEROMON_*` env
//! vars via figment. CLI flags always win; the file only supplies
//! defaults so `aeromon sensors` works without arguments.

use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use tracing::debug;

use crate::cli::GlobalOpts;
use crate::error::CliError;

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    /// Default device host.
    pub host: Option<String>,
    /// Default watch interval, humantime-formatted (e.g. "5m").
    pub interval: Option<String>,
}

/// Path of the config file (`~/.config/aeromon/config.toml` on Linux).
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "aeromon")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("aeromon.toml"))
}

/// Load the config file and env overrides; missing file yields defaults.
pub fn load() -> Result<FileConfig, CliError> {
    let path = config_path();
    let config = Figment::new()
        .merge(Toml::file(&path))
        .merge(Env::prefixed("AEROMON_"))
        .extract()
        .map_err(|e| CliError::Config {
            reason: e.to_string(),
        })?;
    debug!(path = %path.display(), "loaded CLI config");
    Ok(config)
}

/// Resolve the device host: flag/env first, then the config file.
pub fn resolve_host(global: &GlobalOpts, file: &FileConfig) -> Result<String, CliError> {
    global
        .host
        .clone()
        .or_else(|| file.host.clone())
        .ok_or_else(|| CliError::NoHost {
            path: config_path().display().to_string(),
        })
}
