//! Tracker session service.
//!
//! # Responsibility
//! - Load the collection once from the store and keep it as the session's
//!   source of truth.
//! - Apply add, edit, delete, mark-done and import as whole-collection
//!   replacements, persisting after each one.
//! - Expose derived views and exports over the current collection.
//!
//! # Invariants
//! - Every mutation takes `&mut self`, so exactly one runs at a time.
//! - Ids created here are unique within the collection.
//! - A failed import or validation leaves the collection untouched.
//! - Save failures are logged and otherwise ignored; they are not retried.

use crate::datetime::now_millis;
use crate::model::id::generate_unique_id;
use crate::model::item::{Item, ItemDraft, ItemId, ItemValidationError};
use crate::store::ItemStore;
use crate::transfer::{self, csv, json, ImportFormat, ImportResult};
use crate::views::board::{bucket_by_priority, priority_counts, PriorityBuckets, PriorityCounts};
use crate::views::filter::filter_items;
use crate::views::upcoming::{upcoming_this_week, UpcomingItem};
use chrono::{DateTime, Local, TimeZone};
use log::{error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Errors from form-driven tracker operations.
#[derive(Debug)]
pub enum TrackerError {
    Validation(ItemValidationError),
    NotFound(ItemId),
    Encode(serde_json::Error),
}

impl Display for TrackerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "application not found: {id}"),
            Self::Encode(err) => write!(f, "failed to encode applications: {err}"),
        }
    }
}

impl Error for TrackerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<ItemValidationError> for TrackerError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// One tracker session over a store.
pub struct JobTracker<S: ItemStore> {
    store: S,
    items: Vec<Item>,
}

impl<S: ItemStore> JobTracker<S> {
    /// Loads the persisted collection from `store`.
    pub fn open(store: S) -> Self {
        let items = store.load();
        info!(
            "event=tracker_open module=tracker status=ok backend={} count={}",
            store.backend().as_str(),
            items.len()
        );
        Self { store, items }
    }

    /// Current collection in stored order (newest additions first).
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Adds a new application from form input, stamped with the current time.
    pub fn add(&mut self, draft: ItemDraft) -> TrackerResult<ItemId> {
        self.add_at(draft, now_millis())
    }

    /// Adds a new application with an explicit creation time.
    ///
    /// # Errors
    /// - `Validation` when company or position is blank.
    pub fn add_at(&mut self, draft: ItemDraft, created_at: i64) -> TrackerResult<ItemId> {
        draft.validate()?;

        let mut taken = self.id_set();
        let id = generate_unique_id(&mut taken);
        let item = Item::from_draft(id.clone(), created_at, draft);

        let mut next = Vec::with_capacity(self.items.len() + 1);
        next.push(item);
        next.extend(self.items.iter().cloned());
        self.replace(next);

        info!(
            "event=item_add module=tracker status=ok id={} total={}",
            id,
            self.items.len()
        );
        Ok(id)
    }

    /// Edit-save: replaces the form fields of item `id`.
    ///
    /// # Errors
    /// - `Validation` when company or position is blank.
    /// - `NotFound` when no item has `id`.
    pub fn update(&mut self, id: &str, draft: ItemDraft) -> TrackerResult<()> {
        draft.validate()?;
        self.ensure_exists(id)?;

        let next = self
            .items
            .iter()
            .cloned()
            .map(|mut item| {
                if item.id == id {
                    item.apply_draft(draft.clone());
                }
                item
            })
            .collect();
        self.replace(next);

        info!("event=item_update module=tracker status=ok id={id}");
        Ok(())
    }

    /// Removes item `id` permanently.
    pub fn delete(&mut self, id: &str) -> TrackerResult<()> {
        self.ensure_exists(id)?;

        let next = self
            .items
            .iter()
            .filter(|item| item.id != id)
            .cloned()
            .collect();
        self.replace(next);

        info!(
            "event=item_delete module=tracker status=ok id={} total={}",
            id,
            self.items.len()
        );
        Ok(())
    }

    /// Completes the follow-up of item `id` (see `Item::mark_done`).
    pub fn mark_done(&mut self, id: &str) -> TrackerResult<()> {
        self.ensure_exists(id)?;

        let next = self
            .items
            .iter()
            .cloned()
            .map(|mut item| {
                if item.id == id {
                    item.mark_done();
                }
                item
            })
            .collect();
        self.replace(next);

        info!("event=item_done module=tracker status=ok id={id}");
        Ok(())
    }

    /// Imports content and prepends the new items. Returns how many were
    /// imported.
    ///
    /// # Errors
    /// - Any `ImportError`; the collection is unchanged.
    pub fn import_text(&mut self, format: ImportFormat, content: &str) -> ImportResult<usize> {
        let parsed = transfer::parse_import(
            format,
            content,
            self.id_set(),
            &Local,
            now_millis(),
        );
        let imported = match parsed {
            Ok(imported) => imported,
            Err(err) => {
                warn!(
                    "event=import module=tracker status=rejected format={} error={}",
                    format.as_str(),
                    err
                );
                return Err(err);
            }
        };

        let count = imported.len();
        let mut next = imported;
        next.extend(self.items.iter().cloned());
        self.replace(next);

        info!(
            "event=import module=tracker status=ok format={} count={} total={}",
            format.as_str(),
            count,
            self.items.len()
        );
        Ok(count)
    }

    /// Reads `path` and imports it, choosing the format from the file name.
    pub fn import_file(&mut self, path: &Path) -> ImportResult<usize> {
        let content = transfer::read_import_file(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.import_text(ImportFormat::from_file_name(&name), &content)
    }

    /// CSV export of the whole collection with local-time `CreatedAt`.
    pub fn export_csv(&self) -> String {
        csv::export_csv(&self.items, &Local)
    }

    /// JSON export of the whole collection.
    pub fn export_json(&self) -> TrackerResult<String> {
        Ok(json::export_json(&self.items)?)
    }

    /// Board columns for the items matching `query`.
    pub fn board(&self, query: &str) -> PriorityBuckets<'_> {
        bucket_by_priority(filter_items(&self.items, query))
    }

    /// Priority totals over the unfiltered collection.
    pub fn counts(&self) -> PriorityCounts {
        priority_counts(&self.items)
    }

    /// Follow-ups due in the week containing `now`.
    pub fn upcoming<Tz>(&self, now: &DateTime<Tz>) -> Vec<UpcomingItem<'_, Tz>>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        upcoming_this_week(&self.items, now)
    }

    fn ensure_exists(&self, id: &str) -> TrackerResult<()> {
        if self.get(id).is_none() {
            return Err(TrackerError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn id_set(&self) -> HashSet<ItemId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    fn replace(&mut self, next: Vec<Item>) {
        self.items = next;
        if let Err(err) = self.store.save(&self.items) {
            error!(
                "event=store_save module=tracker status=error backend={} count={} error={}",
                self.store.backend().as_str(),
                self.items.len(),
                err
            );
        }
    }
}
