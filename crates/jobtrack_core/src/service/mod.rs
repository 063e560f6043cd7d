//! Use-case services.
//!
//! # Responsibility
//! - Hold the session's authoritative item collection.
//! - Turn user actions into whole-collection replacement plus persistence.

pub mod tracker;
