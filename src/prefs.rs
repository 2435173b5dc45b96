//! Named integer preferences. The only one the game uses is the high score.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use log::{error, info};

use crate::error::GameError;

pub trait Preferences {
    /// Returns 0 for keys that were never set.
    fn get_int(&self, key: &str) -> i64;
    fn set_int(&mut self, key: &str, value: i64) -> Result<(), GameError>;
}

#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, i64>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Preferences for MemoryPreferences {
    fn get_int(&self, key: &str) -> i64 {
        self.values.get(key).copied().unwrap_or(0)
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), GameError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Preferences stored as a flat TOML table, rewritten on every change.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    values: BTreeMap<String, i64>,
}

impl FilePreferences {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents).map_err(|e| {
                error!("Failed to parse preferences {}: {}", path.display(), e);
                GameError::Preferences(e.to_string())
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No preferences at {}, starting empty.", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(FilePreferences { path, values })
    }

    fn save(&self) -> Result<(), GameError> {
        let contents =
            toml::to_string(&self.values).map_err(|e| GameError::Preferences(e.to_string()))?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl Preferences for FilePreferences {
    fn get_int(&self, key: &str) -> i64 {
        self.values.get(key).copied().unwrap_or(0)
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), GameError> {
        self.values.insert(key.to_string(), value);
        self.save()
    }
}
