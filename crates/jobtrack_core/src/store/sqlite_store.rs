//! SQLite host slot store.
//!
//! # Responsibility
//! - Keep the collection as JSON text in the `kv_slots` row keyed by
//!   `STORAGE_KEY`.
//!
//! # Invariants
//! - The connection has migrations applied before any slot access.
//! - A write replaces the whole slot value in one statement.

use super::{decode_slot, encode_slot, ItemStore, StoreBackend, StoreResult, STORAGE_KEY};
use crate::db::{open_db, open_db_in_memory};
use crate::model::item::Item;
use log::{debug, error, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Item store backed by a key/value table in SQLite.
pub struct SqliteSlotStore {
    conn: Connection,
}

impl SqliteSlotStore {
    /// Opens (or creates) the slot database at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a throwaway in-memory slot database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    fn read_slot(&self) -> rusqlite::Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [STORAGE_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()
    }
}

impl ItemStore for SqliteSlotStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::HostSlot
    }

    fn load(&self) -> Vec<Item> {
        match self.read_slot() {
            Ok(Some(text)) => {
                let items = decode_slot(&text, self.backend());
                debug!(
                    "event=store_load module=store status=ok backend=host_slot count={}",
                    items.len()
                );
                items
            }
            Ok(None) => {
                debug!("event=store_load module=store status=empty backend=host_slot");
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=error backend=host_slot error={}",
                    err
                );
                Vec::new()
            }
        }
    }

    fn save(&self, items: &[Item]) -> StoreResult<()> {
        let text = encode_slot(items)?;
        self.conn
            .execute(
                "INSERT INTO kv_slots (key, value, updated_at)
                 VALUES (?1, ?2, CAST(strftime('%s', 'now') AS INTEGER) * 1000)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![STORAGE_KEY, text],
            )
            .map_err(|err| {
                error!(
                    "event=store_save module=store status=error backend=host_slot error={}",
                    err
                );
                err
            })?;

        debug!(
            "event=store_save module=store status=ok backend=host_slot count={}",
            items.len()
        );
        Ok(())
    }
}
