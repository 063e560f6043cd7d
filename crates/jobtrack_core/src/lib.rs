//! Core domain logic for the job application tracker.
//! This crate is the single source of truth for item invariants, derived
//! board views and the CSV/JSON transfer formats.

pub mod config;
pub mod datetime;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;
pub mod transfer;
pub mod views;

pub use config::{parse_backend_preference, BackendPreference, ConfigError, TrackerConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::id::generate_id;
pub use model::item::{Item, ItemDraft, ItemId, ItemValidationError, Priority, Status};
pub use service::tracker::{JobTracker, TrackerError, TrackerResult};
pub use store::file_store::FileItemStore;
pub use store::sqlite_store::SqliteSlotStore;
pub use store::{open_store, ItemStore, StoreBackend, StoreError, StoreResult, STORAGE_KEY};
pub use transfer::{ImportError, ImportFormat, ImportResult};
pub use views::board::{bucket_by_priority, priority_counts, PriorityBuckets, PriorityCounts};
pub use views::filter::filter_items;
pub use views::upcoming::{upcoming_this_week, week_bounds, UpcomingItem};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
