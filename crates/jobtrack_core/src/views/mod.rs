//! Derived views over the item collection.
//!
//! # Responsibility
//! - Compute search results, priority board columns, priority counts and
//!   the upcoming-this-week list from the raw collection.
//!
//! # Invariants
//! - Views are pure and recomputed on every render; nothing is cached.
//! - Views borrow items; they never mutate the collection.

pub mod board;
pub mod filter;
pub mod upcoming;
