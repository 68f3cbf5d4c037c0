//! Client settings: an optional `photopro.ron` in the state directory,
//! overridden by the `PHOTOPRO_SERVER` environment variable and CLI flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use photopro_engine::ClientSettings;
use serde::{Deserialize, Serialize};

pub(crate) const SETTINGS_FILENAME: &str = "photopro.ron";
pub(crate) const SERVER_ENV: &str = "PHOTOPRO_SERVER";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub server: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub log_to_file: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            server: client.base_url,
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.as_secs(),
            log_to_file: true,
        }
    }
}

impl Settings {
    /// Applies overrides; the CLI flag wins over the environment.
    pub fn with_server_overrides(mut self, cli: Option<&str>, env: Option<&str>) -> Self {
        if let Some(server) = cli.or(env).map(str::trim).filter(|s| !s.is_empty()) {
            self.server = server.to_string();
        }
        self
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.server.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..ClientSettings::default()
        }
    }
}

/// Reads the settings file; `Ok(None)` when there is none.
pub(crate) fn load(state_dir: &Path) -> anyhow::Result<Option<Settings>> {
    let path = state_dir.join(SETTINGS_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("reading {}", path.display()));
        }
    };
    let settings =
        ron::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(settings))
}

pub(crate) fn resolve_state_dir(cli: Option<&Path>) -> PathBuf {
    cli.map(Path::to_path_buf)
        .or_else(|| dirs::data_dir().map(|dir| dir.join("photopro")))
        .unwrap_or_else(|| PathBuf::from(".photopro"))
}
