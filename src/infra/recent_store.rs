use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::config::config_directory;
use crate::error::{AppError, AppResult};
use crate::services::RecentStore;

const RECENT_FILE_NAME: &str = "recent.json";

/// Recent selections kept as a JSON object next to the config file.
pub struct FileRecentStore {
    file_path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileRecentStore {
    pub fn load() -> AppResult<Self> {
        Self::open(config_directory()?.join(RECENT_FILE_NAME))
    }

    pub fn open(file_path: PathBuf) -> AppResult<Self> {
        let entries = match fs::read_to_string(&file_path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
                tracing::warn!(path = %file_path.display(), "ignoring unreadable recent file: {err}");
                BTreeMap::new()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(AppError::Io(err)),
        };

        Ok(Self {
            file_path,
            entries: Mutex::new(entries),
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(entries).map_err(|err| {
            AppError::Configuration(format!("failed to write recent selections: {err}"))
        })?;
        fs::write(&self.file_path, data)?;
        Ok(())
    }
}

impl RecentStore for FileRecentStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value.to_string());
        self.save(&updated)?;
        *entries = updated;
        Ok(())
    }
}

/// In-process store for hosts that do not persist selections.
#[derive(Default)]
pub struct MemoryRecentStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl RecentStore for MemoryRecentStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
