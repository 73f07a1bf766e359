use anyhow::{Context, Result};
use arcana_core::{DrawMode, Locale, RngState, SessionConfig, Tone};
use arcana_oracle::OracleConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "ARCANA_CONFIG";
pub const DATA_DIR_ENV: &str = "ARCANA_DATA_DIR";
pub const LANG_ENV: &str = "ARCANA_LANG";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub locale: Option<Locale>,
    pub tone: Tone,
    pub draw_mode: DrawMode,
    /// Show per-card meanings in the reading view.
    pub show_meanings: bool,
    pub seed: Option<u64>,
    pub data_dir: Option<PathBuf>,
    pub session: SessionConfig,
    pub oracle: OracleConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            locale: None,
            tone: Tone::default(),
            draw_mode: DrawMode::default(),
            show_meanings: true,
            seed: None,
            data_dir: None,
            session: SessionConfig::default(),
            oracle: OracleConfig::default(),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("arcana").join("config.toml"))
}

impl AppConfig {
    /// Loads `path`, or the default location when `None`. A missing file
    /// yields defaults; a file that does not parse is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let body = std::fs::read_to_string(&path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml_str(&body).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn from_toml_str(body: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(body)
    }

    pub fn locale(&self) -> Locale {
        self.locale.unwrap_or_else(|| {
            let env = std::env::var(LANG_ENV).ok();
            Locale::from_opt(env.as_deref())
        })
    }

    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            return PathBuf::from(dir);
        }
        dirs::data_local_dir()
            .map(|dir| dir.join("arcana"))
            .unwrap_or_else(|| PathBuf::from(".arcana"))
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("arcana.log")
    }

    pub fn rng(&self) -> RngState {
        match self.seed {
            Some(seed) => RngState::from_seed(seed),
            None => RngState::from_entropy(),
        }
    }
}
