//! Best-effort persistence of the selected effect.
//!
//! Every [`PreferenceStore`] operation is infallible from the caller's point
//! of view. Failures are logged and otherwise treated as "nothing stored".

use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

pub const SELECTED_EFFECT_KEY: &str = "photoEnhancerSelectedEffectId";

#[derive(Debug, thiserror::Error)]
pub enum PreferenceStoreError {
    #[error("preference storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference storage is corrupt: {0}")]
    Json(#[from] serde_json::Error),
    #[error("preference storage is unavailable")]
    Unavailable,
}

pub trait PreferenceStore {
    /// Stored effect id, or `None` when absent or unreadable.
    fn load(&self) -> Option<String>;
    fn save(&self, effect_id: &str);
    fn clear(&self);
}

/// Preferences kept as a small JSON object on disk.
pub struct JsonFilePreferences {
    path: PathBuf,
}

impl JsonFilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, PreferenceStoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), PreferenceStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn try_load(&self) -> Result<Option<String>, PreferenceStoreError> {
        let map = self.read_map()?;
        Ok(map
            .get(SELECTED_EFFECT_KEY)
            .and_then(Value::as_str)
            .map(str::to_owned))
    }

    fn try_save(&self, effect_id: &str) -> Result<(), PreferenceStoreError> {
        // A corrupt file is replaced rather than blocking the write.
        let mut map = self.read_map().unwrap_or_default();
        map.insert(SELECTED_EFFECT_KEY.into(), Value::String(effect_id.into()));
        self.write_map(&map)
    }

    fn try_clear(&self) -> Result<(), PreferenceStoreError> {
        let mut map = self.read_map()?;
        if map.remove(SELECTED_EFFECT_KEY).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

impl PreferenceStore for JsonFilePreferences {
    fn load(&self) -> Option<String> {
        self.try_load().unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), "could not read preferences: {e}");
            None
        })
    }

    fn save(&self, effect_id: &str) {
        if let Err(e) = self.try_save(effect_id) {
            tracing::warn!(path = %self.path.display(), "could not write preferences: {e}");
        }
    }

    fn clear(&self) {
        if let Err(e) = self.try_clear() {
            tracing::warn!(path = %self.path.display(), "could not clear preferences: {e}");
        }
    }
}

/// In-memory store for tests and for running without persistent storage.
///
/// When switched to failing mode every operation behaves like unavailable
/// storage: loads return `None` and writes are dropped.
#[derive(Default)]
pub struct MemoryPreferences {
    value: RefCell<Option<String>>,
    failing: Cell<bool>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(effect_id: &str) -> Self {
        Self {
            value: RefCell::new(Some(effect_id.into())),
            failing: Cell::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn stored(&self) -> Option<String> {
        self.value.borrow().clone()
    }

    fn check(&self) -> Result<(), PreferenceStoreError> {
        if self.failing.get() {
            Err(PreferenceStoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl PreferenceStore for MemoryPreferences {
    fn load(&self) -> Option<String> {
        match self.check() {
            Ok(()) => self.value.borrow().clone(),
            Err(e) => {
                tracing::warn!("could not read preferences: {e}");
                None
            }
        }
    }

    fn save(&self, effect_id: &str) {
        match self.check() {
            Ok(()) => *self.value.borrow_mut() = Some(effect_id.into()),
            Err(e) => tracing::warn!("could not write preferences: {e}"),
        }
    }

    fn clear(&self) {
        match self.check() {
            Ok(()) => *self.value.borrow_mut() = None,
            Err(e) => tracing::warn!("could not clear preferences: {e}"),
        }
    }
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for std::rc::Rc<T> {
    fn load(&self) -> Option<String> {
        (**self).load()
    }

    fn save(&self, effect_id: &str) {
        (**self).save(effect_id)
    }

    fn clear(&self) {
        (**self).clear()
    }
}
