// src/settings.rs
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const ENV_PREFIX: &str = "XRAY_ASSIST";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("invalid backend url {0:?}: expected an http:// or https:// address")]
    InvalidBackendUrl(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub backend_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then `<config_dir>/xray-assist/config.toml` if present, then
    /// `XRAY_ASSIST_*` environment variables.
    pub fn load() -> Result<Self, SettingsError> {
        let file = default_config_path();
        Self::load_from(file.as_deref(), ::config::Environment::with_prefix(ENV_PREFIX))
    }

    pub fn load_from(
        file: Option<&Path>,
        env: ::config::Environment,
    ) -> Result<Self, SettingsError> {
        let mut builder = ::config::Config::builder()
            .set_default("backend_url", DEFAULT_BACKEND_URL)?;

        if let Some(path) = file {
            builder = builder.add_source(::config::File::from(path).required(false));
        }

        let settings: Settings = builder
            .add_source(env)
            .build()?
            .try_deserialize()?;

        settings.validated()
    }

    fn validated(mut self) -> Result<Self, SettingsError> {
        let url = self.backend_url.trim().trim_end_matches('/').to_string();
        let host = url.strip_prefix("http://").or_else(|| url.strip_prefix("https://"));
        if host.map_or(true, str::is_empty) {
            return Err(SettingsError::InvalidBackendUrl(self.backend_url));
        }
        self.backend_url = url;
        Ok(self)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("xray-assist").join("config.toml"))
}
