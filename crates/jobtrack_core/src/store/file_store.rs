//! Local JSON file store, the fallback when no host slot is available.

use super::{
    decode_slot, encode_slot, ItemStore, StoreBackend, StoreError, StoreResult, STORAGE_KEY,
};
use crate::model::item::Item;
use log::{debug, warn};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Item store writing the slot as `<STORAGE_KEY>.json`.
#[derive(Debug, Clone)]
pub struct FileItemStore {
    path: PathBuf,
}

impl FileItemStore {
    /// Store using the slot file inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::at_path(dir.as_ref().join(format!("{STORAGE_KEY}.json")))
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ItemStore for FileItemStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::LocalFile
    }

    fn load(&self) -> Vec<Item> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => decode_slot(&text, self.backend()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("event=store_load module=store status=empty backend=local_file");
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=error backend=local_file error={}",
                    err
                );
                Vec::new()
            }
        }
    }

    fn save(&self, items: &[Item]) -> StoreResult<()> {
        let text = encode_slot(items)?;
        std::fs::write(&self.path, text).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(
            "event=store_save module=store status=ok backend=local_file count={}",
            items.len()
        );
        Ok(())
    }
}
