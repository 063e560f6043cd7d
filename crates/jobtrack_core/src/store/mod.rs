//! Storage adapter for the item collection.
//!
//! # Responsibility
//! - Persist the whole collection as one JSON array under `STORAGE_KEY`.
//! - Pick a backend once at startup: the SQLite host slot when it opens,
//!   the local JSON file otherwise.
//!
//! # Invariants
//! - `load` never fails: missing or corrupt data yields an empty collection,
//!   and a single bad entry never discards the entries around it.
//! - `save` writes the full collection; there is no diffing and no locking.

use crate::config::{BackendPreference, TrackerConfig};
use crate::db::DbError;
use crate::model::item::{decode_entries, Item};
use log::{info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod file_store;
pub mod sqlite_store;

use file_store::FileItemStore;
use sqlite_store::SqliteSlotStore;

/// Fixed key of the persisted slot.
pub const STORAGE_KEY: &str = "job_tracker_items_v1";

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage backend failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Encode(err) => write!(f, "failed to encode items: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Concrete backend behind an `ItemStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    HostSlot,
    LocalFile,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HostSlot => "host_slot",
            Self::LocalFile => "local_file",
        }
    }
}

/// Capability interface over the persisted slot.
pub trait ItemStore {
    fn backend(&self) -> StoreBackend;
    fn load(&self) -> Vec<Item>;
    fn save(&self, items: &[Item]) -> StoreResult<()>;
}

impl<S: ItemStore + ?Sized> ItemStore for Box<S> {
    fn backend(&self) -> StoreBackend {
        (**self).backend()
    }

    fn load(&self) -> Vec<Item> {
        (**self).load()
    }

    fn save(&self, items: &[Item]) -> StoreResult<()> {
        (**self).save(items)
    }
}

/// Opens the configured store, probing the host slot when `Auto`.
///
/// # Errors
/// - The data directory cannot be created.
/// - `HostSlot` was forced and the slot database cannot be opened.
pub fn open_store(config: &TrackerConfig) -> StoreResult<Box<dyn ItemStore>> {
    std::fs::create_dir_all(&config.data_dir).map_err(|source| StoreError::Io {
        path: config.data_dir.clone(),
        source,
    })?;

    let store: Box<dyn ItemStore> = match config.backend {
        BackendPreference::HostSlot => Box::new(SqliteSlotStore::open(config.db_path())?),
        BackendPreference::LocalFile => Box::new(FileItemStore::in_dir(&config.data_dir)),
        BackendPreference::Auto => match SqliteSlotStore::open(config.db_path()) {
            Ok(store) => Box::new(store),
            Err(err) => {
                warn!(
                    "event=store_probe module=store status=fallback backend=local_file error={}",
                    err
                );
                Box::new(FileItemStore::in_dir(&config.data_dir))
            }
        },
    };

    info!(
        "event=store_open module=store status=ok backend={} preference={}",
        store.backend().as_str(),
        config.backend.as_str()
    );
    Ok(store)
}

/// Decodes slot text entry by entry.
///
/// Text that is not a JSON array yields an empty collection. Inside an array,
/// entries that do not decode as items are skipped and the rest are kept.
pub(crate) fn decode_slot(text: &str, backend: StoreBackend) -> Vec<Item> {
    let entries = match serde_json::from_str::<Vec<Value>>(text) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(
                "event=store_load module=store status=corrupt backend={} error={}",
                backend.as_str(),
                err
            );
            return Vec::new();
        }
    };

    let (items, skipped) = decode_entries(entries);
    if skipped > 0 {
        warn!(
            "event=store_load module=store status=partial backend={} count={} skipped={}",
            backend.as_str(),
            items.len(),
            skipped
        );
    }
    items
}

pub(crate) fn encode_slot(items: &[Item]) -> StoreResult<String> {
    Ok(serde_json::to_string(items)?)
}
