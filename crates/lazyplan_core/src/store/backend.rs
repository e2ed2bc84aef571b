//! Store backends: where the whole-store document lives.
//!
//! # Responsibility
//! - Load the store at startup without ever failing the caller.
//! - Replace the persisted document atomically on every save.
//!
//! # Invariants
//! - `load` never returns an error; problems are reported via `LoadStatus`.
//! - `save` writes a sibling temp file and renames it over the target.
//! - Every load/save emits one `event=store_load|store_save` log line.

use super::legacy::decode_store;
use super::{Store, StoreCounts, StoreResult};
use log::{debug, error, info, warn};
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Outcome of a best-effort load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Document read completely.
    Loaded(StoreCounts),
    /// No document yet; starting empty.
    Missing,
    /// Document unreadable or malformed; `store` holds what was decoded
    /// before the failure.
    Recovered { error: String },
}

/// Store plus the status explaining how it was obtained.
#[derive(Debug)]
pub struct LoadOutcome {
    pub store: Store,
    pub status: LoadStatus,
}

/// Persistence contract for the whole store.
pub trait StoreBackend {
    /// Loads the persisted store. Never fails; see `LoadStatus`.
    fn load(&self) -> LoadOutcome;
    /// Replaces the persisted store with `store`.
    fn save(&self, store: &Store) -> StoreResult<()>;
}

/// JSON document on the local file system.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StoreBackend for JsonFileBackend {
    fn load(&self) -> LoadOutcome {
        let started_at = Instant::now();
        info!(
            "event=store_load module=store status=start path={}",
            self.path.display()
        );

        if !self.path.exists() {
            info!(
                "event=store_load module=store status=ok mode=missing duration_ms={}",
                started_at.elapsed().as_millis()
            );
            return LoadOutcome {
                store: Store::default(),
                status: LoadStatus::Missing,
            };
        }

        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) => {
                error!(
                    "event=store_load module=store status=error duration_ms={} error_code=read_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return LoadOutcome {
                    store: Store::default(),
                    status: LoadStatus::Recovered {
                        error: err.to_string(),
                    },
                };
            }
        };

        let outcome = outcome_from_text(&text);
        match &outcome.status {
            LoadStatus::Recovered { error } => warn!(
                "event=store_load module=store status=error duration_ms={} error_code=decode_failed error={}",
                started_at.elapsed().as_millis(),
                error
            ),
            _ => info!(
                "event=store_load module=store status=ok duration_ms={} todos={} goals={} events={} links={}",
                started_at.elapsed().as_millis(),
                outcome.store.todos.len(),
                outcome.store.goals.len(),
                outcome.store.events.len(),
                outcome.store.links.len()
            ),
        }
        outcome
    }

    fn save(&self, store: &Store) -> StoreResult<()> {
        let started_at = Instant::now();
        let result = write_atomically(&self.path, store);
        match &result {
            Ok(()) => debug!(
                "event=store_save module=store status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_save module=store status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

fn write_atomically(path: &Path, store: &Store) -> StoreResult<()> {
    let encoded = store.to_json()?;
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = temp_path(path);
    fs::write(&tmp_path, encoded)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn outcome_from_text(text: &str) -> LoadOutcome {
    let decoded = decode_store(text);
    let status = match decoded.error {
        Some(err) => LoadStatus::Recovered {
            error: err.to_string(),
        },
        None => LoadStatus::Loaded(decoded.store.counts()),
    };
    LoadOutcome {
        store: decoded.store,
        status,
    }
}

/// In-process backend holding the last saved document as text.
///
/// Useful for tests and throwaway sessions; decoding follows the same rules
/// as the file backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    document: RefCell<Option<String>>,
    saves: Cell<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the backend with an existing document.
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: RefCell::new(Some(document.into())),
            saves: Cell::new(0),
        }
    }

    /// Last saved document, if any.
    pub fn document(&self) -> Option<String> {
        self.document.borrow().clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl StoreBackend for MemoryBackend {
    fn load(&self) -> LoadOutcome {
        match self.document.borrow().as_deref() {
            Some(text) => outcome_from_text(text),
            None => LoadOutcome {
                store: Store::default(),
                status: LoadStatus::Missing,
            },
        }
    }

    fn save(&self, store: &Store) -> StoreResult<()> {
        let encoded = store.to_json()?;
        *self.document.borrow_mut() = Some(encoded);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
