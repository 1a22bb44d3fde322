use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigIoSnafu, ConfigSerializeSnafu, Result};
use crate::language::Language;

pub const DEFAULT_TAB_WIDTH: usize = 4;
pub const MAX_TAB_WIDTH: usize = 16;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Language selected when no `--language` is given
    pub language: Language,
    /// Columns used to draw a tab in the snippet
    pub tab_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::default(),
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

impl Config {
    /// Keep hand-edited values inside what the renderer can draw
    pub fn sanitized(mut self) -> Self {
        self.tab_width = self.tab_width.clamp(1, MAX_TAB_WIDTH);
        self
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "typr") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("typr_config.json")
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
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg.sanitized(),
            Err(e) => {
                warn!("Ignoring unreadable config {}: {}", self.path.display(), e);
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context(ConfigIoSnafu)?;
        }
        let data = serde_json::to_vec_pretty(cfg).context(ConfigSerializeSnafu)?;
        fs::write(&self.path, data).context(ConfigIoSnafu)
    }
}

/// Config store that keeps everything in memory
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    cfg: std::cell::RefCell<Config>,
}

impl MemoryConfigStore {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg: std::cell::RefCell::new(cfg),
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Config {
        self.cfg.borrow().clone()
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        *self.cfg.borrow_mut() = cfg.clone();
        Ok(())
    }
}
