//! Card catalog: decks, instructional cards, and cohorts
//!
//! Read-mostly input for the review engine. The catalog knows which cards a
//! cohort carries and which students are enrolled; per-student review state
//! is tracked separately by the review store, queried rather than held as
//! back-references on these models.

pub mod models;
pub mod storage;

pub use models::*;
pub use storage::{CatalogError, CatalogStorage};
