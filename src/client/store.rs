use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::auth::Role;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("HOME environment variable not set")]
    NoHomeDir,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

/// String key/value backend for persisted stores.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// A store whose persisted form is an explicit whitelist of its fields.
pub trait Persisted: Default {
    const KEY: &'static str;
    type Snapshot: Serialize + DeserializeOwned;

    fn snapshot(&self) -> Self::Snapshot;
    fn restore(snapshot: Self::Snapshot) -> Self;

    /// Missing or unreadable snapshots give the default state.
    fn load(storage: &dyn KeyValueStorage) -> Self {
        let raw = match storage.get(Self::KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::default(),
            Err(e) => {
                tracing::warn!("Could not read '{}': {}", Self::KEY, e);
                return Self::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Self::restore(snapshot),
            Err(e) => {
                tracing::warn!("Discarding corrupt '{}' snapshot: {}", Self::KEY, e);
                Self::default()
            }
        }
    }

    fn save(&self, storage: &dyn KeyValueStorage) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(&self.snapshot())?;
        storage.set(Self::KEY, &raw)
    }

    fn clear(storage: &dyn KeyValueStorage) -> Result<(), StorageError> {
        storage.remove(Self::KEY)
    }
}

// Auth

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub token: Option<String>,
    pub username: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthSnapshot {
    token: Option<String>,
    username: Option<String>,
    role: Option<Role>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn sign_in(&mut self, token: String, username: String, role: Role) {
        self.token = Some(token);
        self.username = Some(username);
        self.role = Some(role);
    }

    pub fn sign_out(&mut self) {
        *self = Self::default();
    }
}

impl Persisted for AuthState {
    const KEY: &'static str = "auth";
    type Snapshot = AuthSnapshot;

    fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot {
            token: self.token.clone(),
            username: self.username.clone(),
            role: self.role,
        }
    }

    fn restore(snapshot: AuthSnapshot) -> Self {
        Self {
            token: snapshot.token,
            username: snapshot.username,
            role: snapshot.role,
        }
    }
}

// Theme

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeState {
    pub theme: Theme,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeSnapshot {
    theme: Theme,
}

impl Persisted for ThemeState {
    const KEY: &'static str = "theme";
    type Snapshot = ThemeSnapshot;

    fn snapshot(&self) -> ThemeSnapshot {
        ThemeSnapshot { theme: self.theme }
    }

    fn restore(snapshot: ThemeSnapshot) -> Self {
        Self {
            theme: snapshot.theme,
        }
    }
}

// Layout

pub const DEFAULT_HEADER_HEIGHT: u32 = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutState {
    pub header_height: u32,
    /// Derived from the viewport; never persisted.
    pub content_height: u32,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            header_height: DEFAULT_HEADER_HEIGHT,
            content_height: 0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    header_height: u32,
}

impl LayoutState {
    pub fn recompute(&mut self, viewport_height: u32) {
        self.content_height = viewport_height.saturating_sub(self.header_height);
    }
}

impl Persisted for LayoutState {
    const KEY: &'static str = "layout";
    type Snapshot = LayoutSnapshot;

    fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            header_height: self.header_height,
        }
    }

    fn restore(snapshot: LayoutSnapshot) -> Self {
        Self {
            header_height: snapshot.header_height,
            content_height: 0,
        }
    }
}

// Backends

/// One `<key>.json` file per store under a config directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `ROADMAP_CONFIG_DIR`, else `~/.config/roadmap`.
    pub fn from_env() -> Result<Self, StorageError> {
        let dir = match std::env::var("ROADMAP_CONFIG_DIR") {
            Ok(custom_dir) if !custom_dir.trim().is_empty() => PathBuf::from(custom_dir),
            _ => {
                let home = std::env::var("HOME").map_err(|_| StorageError::NoHomeDir)?;
                PathBuf::from(home).join(".config").join("roadmap")
            }
        };
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}
