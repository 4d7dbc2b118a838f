use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::difficulty::Difficulty;
use crate::quiz::{QuizConfig, MIN_SECONDS_PER_QUESTION};

/// Upper bound offered by the menu's time selector
pub const MAX_SECONDS_PER_QUESTION: u32 = 60;

/// Last settings picked on the menu. Scores are never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub difficulty: Difficulty,
    pub seconds_per_question: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            seconds_per_question: 10,
        }
    }
}

impl Config {
    /// Keep a hand-edited file within what the menu can represent
    pub fn clamped(self) -> Self {
        Self {
            seconds_per_question: self
                .seconds_per_question
                .clamp(MIN_SECONDS_PER_QUESTION, MAX_SECONDS_PER_QUESTION),
            ..self
        }
    }
}

impl From<QuizConfig> for Config {
    fn from(qc: QuizConfig) -> Self {
        Self {
            difficulty: qc.difficulty,
            seconds_per_question: qc.seconds_per_question,
        }
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
        let path = if let Some(pd) = ProjectDirs::from("", "", "mathdash") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("mathdash_config.json")
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
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg.clamped(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

/// In-memory store used by `--no-save` and tests
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    cell: std::cell::RefCell<Option<Config>>,
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Config {
        (*self.cell.borrow()).unwrap_or_default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        *self.cell.borrow_mut() = Some(*cfg);
        Ok(())
    }
}
