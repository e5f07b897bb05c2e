use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use client_core::DEFAULT_HISTORY_SIZE;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "cellscan.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_url: String,
    pub predict_path: String,
    pub history_size: usize,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            predict_path: "/predict".into(),
            history_size: DEFAULT_HISTORY_SIZE,
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    server_url: Option<String>,
    predict_path: Option<String>,
    history_size: Option<usize>,
    log_filter: Option<String>,
}

impl Settings {
    /// Full prediction URL. `predict_path` may be a path joined onto
    /// `server_url` (`/api/predict` behind a proxy) or an absolute URL.
    pub fn endpoint(&self) -> anyhow::Result<Url> {
        let base = Url::parse(self.server_url.trim())
            .with_context(|| format!("invalid server_url '{}'", self.server_url))?;
        let endpoint = base
            .join(self.predict_path.trim())
            .with_context(|| format!("invalid predict_path '{}'", self.predict_path))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            bail!("unsupported endpoint scheme '{}'", endpoint.scheme());
        }
        Ok(endpoint)
    }

    fn apply_file(&mut self, file_cfg: FileSettings) {
        if let Some(v) = file_cfg.server_url {
            self.server_url = v;
        }
        if let Some(v) = file_cfg.predict_path {
            self.predict_path = v;
        }
        if let Some(v) = file_cfg.history_size {
            self.history_size = v;
        }
        if let Some(v) = file_cfg.log_filter {
            self.log_filter = v;
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("CELLSCAN_SERVER_URL") {
            self.server_url = v;
        }
        if let Some(v) = var("APP__SERVER_URL") {
            self.server_url = v;
        }

        if let Some(v) = var("CELLSCAN_PREDICT_PATH") {
            self.predict_path = v;
        }
        if let Some(v) = var("APP__PREDICT_PATH") {
            self.predict_path = v;
        }

        if let Some(v) = var("CELLSCAN_HISTORY_SIZE") {
            if let Ok(parsed) = v.parse::<usize>() {
                self.history_size = parsed;
            }
        }

        if let Some(v) = var("CELLSCAN_LOG") {
            self.log_filter = v;
        }
    }
}

/// Defaults, then the TOML file, then environment variables. An explicitly
/// named file must exist; the default one is optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_with(config_path, |key| std::env::var(key).ok())
}

fn load_settings_with(
    config_path: Option<&Path>,
    var: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    if let Some(file_cfg) = read_file_settings(&path, required)? {
        settings.apply_file(file_cfg);
    }

    settings.apply_env(var);
    Ok(settings)
}

fn read_file_settings(path: &Path, required: bool) -> anyhow::Result<Option<FileSettings>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };
    let file_cfg = toml::from_str::<FileSettings>(&raw)
        .with_context(|| format!("failed to parse '{}'", path.display()))?;
    Ok(Some(file_cfg))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
