//! Persistence layer for tasktide
//!
//! The whole store state lives in a single durable slot: one serialized JSON
//! document per store. `StateSlot` abstracts where that document lives;
//! `FileSlot` keeps it in a file written atomically (temp file + rename) so
//! readers never observe a partial write, and `MemorySlot` backs tests and
//! ephemeral stores.
//!
//! The document is versioned (see `migrate`); `PersistedState` is its current
//! shape.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::migrate::CURRENT_VERSION;
use crate::tag::Tag;
use crate::task::Task;
use crate::view::TaskView;

/// File name of the default state document.
pub const STATE_FILE: &str = "state.json";

/// The versioned document a slot stores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub current_view: TaskView,
    #[serde(default)]
    pub selected_tags: Vec<String>,
}

impl PersistedState {
    /// An empty document at the current schema version.
    pub fn empty() -> Self {
        Self {
            version: CURRENT_VERSION,
            ..Self::default()
        }
    }
}

/// A durable slot holding one serialized store document.
///
/// `load` returns `Ok(None)` when nothing has been saved yet; that is the
/// empty-default case, not an error.
pub trait StateSlot: Send {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, json: &str) -> Result<()>;
}

/// File-backed slot with atomic writes.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Slot at the platform data directory, e.g.
    /// `~/.local/share/tasktide/state.json` on Linux.
    pub fn default_location() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "tasktide").ok_or(Error::NoDataDir)?;
        Ok(Self::new(dirs.data_dir().join(STATE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write atomically via temp file + rename so a crash mid-write leaves
    /// the previous document intact.
    fn write_atomic(&self, data: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl StateSlot for FileSlot {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }

    fn save(&self, json: &str) -> Result<()> {
        self.write_atomic(json.as_bytes())
    }
}

/// In-memory slot for tests and ephemeral stores.
#[derive(Debug, Default)]
pub struct MemorySlot {
    document: Mutex<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently stored document, if any.
    pub fn document(&self) -> Option<String> {
        self.document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl StateSlot for MemorySlot {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.document())
    }

    fn save(&self, json: &str) -> Result<()> {
        let mut slot = self
            .document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(json.to_string());
        Ok(())
    }
}
