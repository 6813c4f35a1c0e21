// src/services/storage.rs
use anyhow::{Context, Result};
use log::{debug, error};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use crate::models::LoanCalculatorState;

pub const STORAGE_KEY: &str = "loanCalculatorState";

/// A flat string key-value slot store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn contains(&self, key: &str) -> bool;
}

/// One `<key>.json` file per slot inside a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(contents))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.slot_path(key);
        fs::write(&path, value).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    fn contains(&self, key: &str) -> bool {
        self.slot_path(key).exists()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let slots = self.slots.lock().map_err(|_| anyhow::anyhow!("Memory store lock poisoned"))?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.slots.lock().map_err(|_| anyhow::anyhow!("Memory store lock poisoned"))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn contains(&self, key: &str) -> bool {
        self.slots.lock().map(|slots| slots.contains_key(key)).unwrap_or(false)
    }
}

/// Persists the loan calculator form. Failures are logged and never returned.
pub struct StateStore {
    backend: Box<dyn KeyValueStore>,
}

impl StateStore {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        StateStore { backend }
    }

    pub fn save(&self, state: &LoanCalculatorState) {
        let result = serde_json::to_string(state)
            .context("Failed to serialize loan calculator state")
            .and_then(|json| self.backend.set(STORAGE_KEY, &json));

        match result {
            Ok(()) => debug!("Saved loan calculator state"),
            Err(e) => error!("Error saving loan calculator state: {:#}", e),
        }
    }

    pub fn load(&self) -> Option<LoanCalculatorState> {
        let json = match self.backend.get(STORAGE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                error!("Error reading loan calculator state: {:#}", e);
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(state) => Some(state),
            Err(e) => {
                error!("Error parsing saved loan calculator state: {}", e);
                None
            }
        }
    }

    pub fn has_saved_state(&self) -> bool {
        self.backend.contains(STORAGE_KEY)
    }
}
