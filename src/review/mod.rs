//! Cohort review engine
//!
//! This module provides:
//! - Review record tracking per (cohort, student, card)
//! - Assignment fan-out and cascade deletes
//! - Random-draw card selection over the due set
//! - The stateless session controller (start, reveal, grade, list due)

pub mod models;
pub mod selector;
pub mod session;
pub mod storage;

pub use models::*;
pub use session::Reviewer;
pub use storage::{ReviewError, ReviewStore};
