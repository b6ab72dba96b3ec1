//! Data models for the review engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Review status of one card for one student within one cohort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewStatus {
    /// Assigned but the student has not entered a session yet
    NotStarted,
    /// In the active pass, still due
    Learning,
    /// Graded correct, done for this pass
    Reviewed,
}

impl Default for ReviewStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// One student's progress on one card within one cohort.
///
/// Exactly one record exists per (cohort, student, card) triple once the
/// card is assigned; a missing record reads as NotStarted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub cohort_id: Uuid,
    pub student_id: Uuid,
    pub card_id: Uuid,
    #[serde(default)]
    pub status: ReviewStatus,
    pub updated_at: DateTime<Utc>,
}

impl ReviewRecord {
    pub fn new(cohort_id: Uuid, student_id: Uuid, card_id: Uuid) -> Self {
        Self {
            cohort_id,
            student_id,
            card_id,
            status: ReviewStatus::NotStarted,
            updated_at: Utc::now(),
        }
    }
}

/// How the student graded their own recall of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GradeOutcome {
    Correct,
    Incorrect,
}

/// Result of advancing a session: another card to show, or nothing left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NextCard {
    Card { card_id: Uuid },
    Complete,
}

impl NextCard {
    pub fn card_id(&self) -> Option<Uuid> {
        match self {
            Self::Card { card_id } => Some(*card_id),
            Self::Complete => None,
        }
    }
}

/// Per-student progress counts for a cohort
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewProgress {
    pub total: usize,
    pub not_started: usize,
    pub learning: usize,
    pub reviewed: usize,
}

impl ReviewProgress {
    pub fn from_records(records: &[ReviewRecord]) -> Self {
        let mut progress = Self {
            total: records.len(),
            ..Self::default()
        };
        for record in records {
            match record.status {
                ReviewStatus::NotStarted => progress.not_started += 1,
                ReviewStatus::Learning => progress.learning += 1,
                ReviewStatus::Reviewed => progress.reviewed += 1,
            }
        }
        progress
    }
}
