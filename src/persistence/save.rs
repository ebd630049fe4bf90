//! Save blob and the key/value stores that hold it.
//!
//! The whole save is one JSON document stored as a single opaque value under
//! [`SAVE_KEY`]. There is no version tag: a blob that fails to parse is
//! logged and treated as "no save", and the game starts fresh.

use glam::Vec3;
use log::{error, info, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::persistence::snapshot::WorldSnapshot;

pub const SAVE_KEY: &str = "verbatim_save";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save store i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("save serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Camera angles in radians: `x` is pitch, `y` is yaw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LookRotation {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec3,
    pub rotation: LookRotation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveGame {
    pub player: PlayerState,
    /// Carried item ids in pickup order.
    pub inventory: Vec<String>,
    pub world: WorldSnapshot,
    #[serde(default)]
    pub has_exited_bathroom: bool,
}

/// A persistent string key/value store.
pub trait SaveStore {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError>;
    fn remove(&mut self, key: &str) -> Result<(), SaveError>;
}

/// Store keeping one `<key>.json` file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SaveStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// In-process store, for tests and sessions that should not touch disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: FxHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        self.values.remove(key);
        Ok(())
    }
}

pub fn save_game(store: &mut dyn SaveStore, save: &SaveGame) -> Result<(), SaveError> {
    let json = serde_json::to_string(save)?;
    store.set(SAVE_KEY, &json).inspect_err(|e| error!("Failed to save game: {}", e))?;
    info!("Game saved ({} bytes)", json.len());
    Ok(())
}

/// Read the save, if there is a usable one.
pub fn load_game(store: &dyn SaveStore) -> Option<SaveGame> {
    let json = match store.get(SAVE_KEY) {
        Ok(Some(json)) => json,
        Ok(None) => return None,
        Err(e) => {
            error!("Failed to read save: {}", e);
            return None;
        }
    };
    match serde_json::from_str(&json) {
        Ok(save) => Some(save),
        Err(e) => {
            warn!("Discarding unreadable save, starting fresh: {}", e);
            None
        }
    }
}

pub fn has_save(store: &dyn SaveStore) -> bool {
    matches!(store.get(SAVE_KEY), Ok(Some(_)))
}
