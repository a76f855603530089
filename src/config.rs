use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::poller::OverlapPolicy;
use crate::spotify::{TokenStatusPolicy, NOW_PLAYING_URL, TOKEN_URL};
use crate::Error;

lazy_static::lazy_static! {
    pub static ref CONFIG_PATH: PathBuf = {
        let home = home::home_dir().unwrap_or_default();
        #[cfg(windows)]
        return home.join(".nowify");
        #[cfg(not(windows))]
        return home.join(".config/nowify");
    };
}

/// Optional `config.yml`. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds between poll cycles
    pub interval: u64,
    pub overlap: OverlapPolicy,
    pub token_status: TokenStatusPolicy,
    pub token_url: String,
    pub now_playing_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval: 5,
            overlap: OverlapPolicy::default(),
            token_status: TokenStatusPolicy::default(),
            token_url: TOKEN_URL.to_string(),
            now_playing_url: NOW_PLAYING_URL.to_string(),
        }
    }
}

impl Config {
    /// Load the config from `path` if given, otherwise from the first of
    /// `config.yml`, `config.yaml`, and the same names under [`CONFIG_PATH`] that exists.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(path) => Self::from_yaml(&std::fs::read_to_string(path)?),
            None => Self::load_with_fallback([
                PathBuf::from("config.yml"),
                PathBuf::from("config.yaml"),
                CONFIG_PATH.join("config.yml"),
                CONFIG_PATH.join("config.yaml"),
            ]),
        }
    }

    pub fn load_with_fallback<P, I>(paths: I) -> Result<Self, Error>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        match paths.into_iter().find(|p| p.as_ref().exists()) {
            Some(path) => {
                log::debug!("loading config from {}", path.as_ref().display());
                Self::from_yaml(&std::fs::read_to_string(path)?)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml(source: &str) -> Result<Self, Error> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(source)?;
        if config.interval == 0 {
            return Err(Error::config("interval must be at least 1 second"));
        }
        Ok(config)
    }

    pub fn interval(mut self, seconds: u64) -> Self {
        self.interval = seconds;
        self
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs(self.interval.max(1))
    }
}
