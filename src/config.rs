use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::timer::{Countdown, DEFAULT_TOTAL_SECS};

/// Persisted player preferences. Game progress is never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub timer_enabled: bool,
    pub timer_secs: u32,
    pub reshuffle_on_reset: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer_enabled: false,
            timer_secs: DEFAULT_TOTAL_SECS,
            reshuffle_on_reset: false,
        }
    }
}

impl Config {
    /// Countdown built from these settings. A zero duration falls back to the default.
    pub fn countdown(&self) -> Countdown {
        Countdown::new(self.timer_secs, self.timer_enabled).unwrap_or_default()
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "matchit") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("matchit_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
