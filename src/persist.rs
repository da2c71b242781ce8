//! Key-value persistence for yards and display preferences
//!
//! The editor stores everything under four string keys. Yards are written as
//! one JSON array; on load they pass through the schema upgrader, so any
//! earlier save format is accepted. Preferences are plain tags validated
//! against closed sets.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ContainerType;
use crate::schema::upgrade_yards;
use crate::store::YardBook;

/// Key of the stored yard collection
pub const YARDS_KEY: &str = "yards_v1";

/// Key of the stored active-yard id
pub const ACTIVE_YARD_KEY: &str = "yards_active_id_v1";

/// Key of the stored colour theme
pub const THEME_KEY: &str = "ssmanager_theme_v1";

/// Key of the stored active tab
pub const TAB_KEY: &str = "ssmanager_active_tab_v1";

/// Errors from a storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access storage file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Storage document is not valid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A string key-value store
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Storage backed by one JSON object on disk, mapping every key to its
/// string value. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level tab of the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Layout,
    Yards,
    Settings,
    Occupants,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Layout, Tab::Yards, Tab::Settings, Tab::Occupants];

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Layout => "layout",
            Tab::Yards => "yards",
            Tab::Settings => "settings",
            Tab::Occupants => "occupants",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.as_str() == tag)
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub theme: Theme,
    pub tab: Tab,
}

/// Load and upgrade the yard collection.
///
/// A collection that is not valid JSON is treated as empty. A missing or
/// stale active id falls back to the first yard.
pub fn load_book(
    storage: &impl Storage,
    catalog: &[ContainerType],
) -> Result<YardBook, StorageError> {
    let yards = match storage.get(YARDS_KEY)? {
        Some(raw) => match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => upgrade_yards(&value, catalog),
            Err(err) => {
                warn!("stored yards are not valid JSON ({}); starting empty", err);
                Vec::new()
            }
        },
        None => Vec::new(),
    };
    let active = storage.get(ACTIVE_YARD_KEY)?.filter(|id| !id.is_empty());
    debug!("loaded {} yard(s)", yards.len());
    Ok(YardBook::new(yards, active))
}

/// Write the yard collection and the active yard id
pub fn save_book(storage: &mut impl Storage, book: &YardBook) -> Result<(), StorageError> {
    storage.set(YARDS_KEY, &serde_json::to_string(book.yards())?)?;
    match book.active_yard_id() {
        Some(id) => storage.set(ACTIVE_YARD_KEY, id),
        None => storage.remove(ACTIVE_YARD_KEY),
    }
}

/// Load display preferences; unknown tags fall back to the defaults
pub fn load_preferences(storage: &impl Storage) -> Result<Preferences, StorageError> {
    let theme = storage.get(THEME_KEY)?.as_deref().and_then(Theme::parse);
    let tab = storage.get(TAB_KEY)?.as_deref().and_then(Tab::parse);
    Ok(Preferences {
        theme: theme.unwrap_or_default(),
        tab: tab.unwrap_or_default(),
    })
}

pub fn save_preferences(
    storage: &mut impl Storage,
    preferences: Preferences,
) -> Result<(), StorageError> {
    storage.set(THEME_KEY, preferences.theme.as_str())?;
    storage.set(TAB_KEY, preferences.tab.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_container_types;
    use crate::units::Unit;

    #[test]
    fn test_missing_collection_is_empty() {
        let storage = MemoryStorage::new();
        let book = load_book(&storage, &default_container_types()).unwrap();
        assert!(book.is_empty());
    }

    #[test]
    fn test_corrupt_collection_is_empty() {
        let mut storage = MemoryStorage::new();
        storage.set(YARDS_KEY, "{not json").unwrap();
        let book = load_book(&storage, &default_container_types()).unwrap();
        assert!(book.is_empty());
    }

    #[test]
    fn test_round_trip_keeps_active_yard() {
        let catalog = default_container_types();
        let mut book = YardBook::default();
        book.create_yard("A", 10.0, 10.0, Unit::Ft, &catalog).unwrap();
        let b = book.create_yard("B", 20.0, 10.0, Unit::Cm, &catalog).unwrap();

        let mut storage = MemoryStorage::new();
        save_book(&mut storage, &book).unwrap();
        let loaded = load_book(&storage, &catalog).unwrap();
        assert_eq!(loaded, book);
        assert_eq!(loaded.active_yard_id(), Some(b.as_str()));
    }

    #[test]
    fn test_preferences_validated() {
        let mut storage = MemoryStorage::new();
        assert_eq!(load_preferences(&storage).unwrap(), Preferences::default());

        storage.set(THEME_KEY, "solarized").unwrap();
        storage.set(TAB_KEY, "occupants").unwrap();
        let prefs = load_preferences(&storage).unwrap();
        assert_eq!(prefs.theme, Theme::Light);
        assert_eq!(prefs.tab, Tab::Occupants);

        save_preferences(
            &mut storage,
            Preferences {
                theme: Theme::Dark,
                tab: Tab::Settings,
            },
        )
        .unwrap();
        assert_eq!(storage.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(storage.get(TAB_KEY).unwrap().as_deref(), Some("settings"));
    }

    #[test]
    fn test_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("state.json"));
        assert_eq!(storage.get(YARDS_KEY).unwrap(), None);
        storage.set(THEME_KEY, "dark").unwrap();
        storage.set(TAB_KEY, "yards").unwrap();

        let reopened = FileStorage::new(storage.path().to_path_buf());
        assert_eq!(reopened.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

        storage.remove(THEME_KEY).unwrap();
        assert_eq!(storage.get(THEME_KEY).unwrap(), None);
        assert_eq!(storage.get(TAB_KEY).unwrap().as_deref(), Some("yards"));
    }
}
