//! Durable storage for review records
//!
//! Directory structure:
//! ```text
//! {data_dir}/records/
//! └── {cohort-id}/
//!     └── {student-id}.json   # Array of ReviewRecords for that student
//! ```
//!
//! Records are partitioned by (cohort, student), so bulk enumeration for a
//! session is a single file read and two students never share a file.
//! Writes go through a temp file plus rename, so a record file is never
//! observed half-written.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use super::models::{ReviewRecord, ReviewStatus};

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No cards to review in cohort {0}")]
    EmptyCohort(Uuid),

    #[error("No review record for card {0}")]
    CardNotFound(Uuid),

    #[error("Concurrent update on card {0}, retry the grading call")]
    Conflict(Uuid),
}

pub type Result<T> = std::result::Result<T, ReviewError>;

/// File-backed store for review records
pub struct ReviewStore {
    records_dir: PathBuf,
}

impl ReviewStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        let records_dir = data_dir.join("records");
        fs::create_dir_all(&records_dir)?;

        Ok(Self { records_dir })
    }

    fn cohort_dir(&self, cohort_id: Uuid) -> PathBuf {
        self.records_dir.join(cohort_id.to_string())
    }

    fn records_path(&self, cohort_id: Uuid, student_id: Uuid) -> PathBuf {
        self.cohort_dir(cohort_id)
            .join(format!("{}.json", student_id))
    }

    /// All review records for one student in one cohort. A missing file
    /// reads as an empty set, matching the absence-is-NotStarted rule.
    pub fn records(&self, cohort_id: Uuid, student_id: Uuid) -> Result<Vec<ReviewRecord>> {
        let path = self.records_path(cohort_id, student_id);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)?;
        let records: Vec<ReviewRecord> = serde_json::from_str(&content)?;
        Ok(records)
    }

    /// Write the full record set for a student in one commit. The temp file
    /// plus rename keeps the commit all-or-nothing.
    fn save_records(
        &self,
        cohort_id: Uuid,
        student_id: Uuid,
        records: &[ReviewRecord],
    ) -> Result<()> {
        let dir = self.cohort_dir(cohort_id);
        fs::create_dir_all(&dir)?;

        let path = self.records_path(cohort_id, student_id);
        let tmp = dir.join(format!("{}.json.tmp", student_id));
        fs::write(&tmp, serde_json::to_string_pretty(records)?)?;
        fs::rename(&tmp, &path)?;

        Ok(())
    }

    /// Insert or replace a single record
    pub fn upsert_record(&self, record: &ReviewRecord) -> Result<()> {
        let mut records = self.records(record.cohort_id, record.student_id)?;

        match records.iter().position(|r| r.card_id == record.card_id) {
            Some(pos) => records[pos] = record.clone(),
            None => records.push(record.clone()),
        }

        self.save_records(record.cohort_id, record.student_id, &records)
    }

    /// Compare-and-set commit of a single status transition.
    ///
    /// Re-reads the record at commit time: if it already holds `to` the
    /// commit is an idempotent no-op (a retried grading call), and if it
    /// holds anything other than `expected` the caller lost a race and gets
    /// Conflict. The record itself missing is NotFound, never fabricated.
    pub fn commit_status(
        &self,
        cohort_id: Uuid,
        student_id: Uuid,
        card_id: Uuid,
        expected: ReviewStatus,
        to: ReviewStatus,
    ) -> Result<()> {
        let mut records = self.records(cohort_id, student_id)?;
        let record = records
            .iter_mut()
            .find(|r| r.card_id == card_id)
            .ok_or(ReviewError::CardNotFound(card_id))?;

        if record.status == to {
            return Ok(());
        }
        if record.status != expected {
            return Err(ReviewError::Conflict(card_id));
        }

        record.status = to;
        record.updated_at = Utc::now();
        self.save_records(cohort_id, student_id, &records)
    }

    /// Promote every NotStarted record to Learning in a single commit and
    /// return the updated set. Used at session start; Reviewed records are
    /// left alone.
    pub fn promote_not_started(
        &self,
        cohort_id: Uuid,
        student_id: Uuid,
    ) -> Result<Vec<ReviewRecord>> {
        let mut records = self.records(cohort_id, student_id)?;

        let mut changed = false;
        for record in records.iter_mut() {
            if record.status == ReviewStatus::NotStarted {
                record.status = ReviewStatus::Learning;
                record.updated_at = Utc::now();
                changed = true;
            }
        }

        if changed {
            self.save_records(cohort_id, student_id, &records)?;
        }

        Ok(records)
    }

    // ==================== Assignment Fan-Out ====================

    /// Create NotStarted records for every (student, card) pair.
    ///
    /// Called when cards are assigned to a cohort, and again with a single
    /// student when someone enrolls into a cohort that already has cards.
    /// Existing records keep their status, so re-assignment is idempotent.
    pub fn assign_cards(
        &self,
        cohort_id: Uuid,
        student_ids: &[Uuid],
        card_ids: &[Uuid],
    ) -> Result<()> {
        for &student_id in student_ids {
            let mut records = self.records(cohort_id, student_id)?;

            let mut added = false;
            for &card_id in card_ids {
                if records.iter().any(|r| r.card_id == card_id) {
                    continue;
                }
                records.push(ReviewRecord::new(cohort_id, student_id, card_id));
                added = true;
            }

            if added {
                self.save_records(cohort_id, student_id, &records)?;
            }
        }

        log::debug!(
            "assigned {} card(s) to {} student(s) in cohort {}",
            card_ids.len(),
            student_ids.len(),
            cohort_id
        );
        Ok(())
    }

    // ==================== Cascade Deletes ====================

    /// Remove every student's record for a card withdrawn from the cohort
    pub fn remove_card(&self, cohort_id: Uuid, card_id: Uuid) -> Result<()> {
        let dir = self.cohort_dir(cohort_id);
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if !path.extension().map(|e| e == "json").unwrap_or(false) {
                continue;
            }

            let content = fs::read_to_string(&path)?;
            let mut records: Vec<ReviewRecord> = serde_json::from_str(&content)?;
            let before = records.len();
            records.retain(|r| r.card_id != card_id);

            if records.len() != before {
                if let Some(student_id) = records.first().map(|r| r.student_id) {
                    self.save_records(cohort_id, student_id, &records)?;
                } else {
                    fs::remove_file(&path)?;
                }
            }
        }

        Ok(())
    }

    /// Remove all records for a student who left the cohort
    pub fn remove_student(&self, cohort_id: Uuid, student_id: Uuid) -> Result<()> {
        let path = self.records_path(cohort_id, student_id);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}
