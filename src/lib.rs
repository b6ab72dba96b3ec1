//! studydeck — cohort flashcard review engine
//!
//! Instructors collect cards into decks and assign them to cohorts of
//! students; each student works through the assigned cards in review
//! sessions (show front, reveal back, grade, advance) until nothing is due.
//!
//! The crate is transport-agnostic: `review::Reviewer` exposes the session
//! operations as plain calls taking explicit (cohort, student) ids, and
//! `catalog::CatalogStorage` supplies the deck/card/cohort bookkeeping
//! around them. All state lives in JSON files under a data directory.

pub mod catalog;
pub mod review;

pub use catalog::{CatalogError, CatalogStorage};
pub use review::{GradeOutcome, NextCard, ReviewError, ReviewStore, Reviewer};
