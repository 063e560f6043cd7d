//! Job application domain model.
//!
//! # Responsibility
//! - Define the one persisted record shape (`Item`) and its form input.
//! - Generate opaque item ids.
//!
//! # Invariants
//! - Every item is identified by an `ItemId` unique within the collection.
//! - Deletion is a hard delete; there are no tombstones.

pub mod id;
pub mod item;
mod lenient;
