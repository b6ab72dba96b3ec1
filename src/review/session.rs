//! Review session controller
//!
//! Drives the show-front → reveal-back → grade loop for one (cohort,
//! student) pair. No session state is held between calls: every operation
//! re-derives the due set from the persisted records plus the card id the
//! caller passes in, so a crash between interactions loses at most the
//! in-flight transition.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use super::models::{GradeOutcome, NextCard, ReviewProgress, ReviewStatus};
use super::selector;
use super::storage::{Result, ReviewError, ReviewStore};

/// Session controller over a review record store.
///
/// Interactions for one (cohort, student) pair are serialized through a
/// per-pair mutex, so a double-submitted grading request is applied once;
/// the store's compare-and-set commit catches races from other processes.
pub struct Reviewer<R: Rng = StdRng> {
    store: ReviewStore,
    rng: Mutex<R>,
    session_locks: Mutex<HashMap<(Uuid, Uuid), Arc<Mutex<()>>>>,
}

impl Reviewer<StdRng> {
    pub fn new(store: ReviewStore) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }
}

impl<R: Rng> Reviewer<R> {
    /// Build with an explicit random source, seeded in tests for
    /// reproducible selection.
    pub fn with_rng(store: ReviewStore, rng: R) -> Self {
        Self {
            store,
            rng: Mutex::new(rng),
            session_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &ReviewStore {
        &self.store
    }

    /// Run `f` while holding the (cohort, student) interaction lock.
    ///
    /// The entry is dropped from the map afterwards unless another caller
    /// is still holding or waiting on it, so the map only carries pairs
    /// with in-flight interactions.
    fn with_session_lock<T>(
        &self,
        cohort_id: Uuid,
        student_id: Uuid,
        f: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        let key = (cohort_id, student_id);
        let lock = {
            let mut locks = self.session_locks.lock().unwrap();
            locks.entry(key).or_default().clone()
        };

        let result = {
            let _guard = lock.lock().unwrap();
            f()
        };

        let mut locks = self.session_locks.lock().unwrap();
        if let Some(entry) = locks.get(&key) {
            // Two strong refs means the map's and ours: no other waiter
            if Arc::strong_count(entry) == 2 {
                locks.remove(&key);
            }
        }

        result
    }

    #[cfg(test)]
    fn session_lock_count(&self) -> usize {
        self.session_locks.lock().unwrap().len()
    }

    fn pick(&self, due: &[Uuid]) -> NextCard {
        let mut rng = self.rng.lock().unwrap();
        match selector::next_card(due, &mut *rng) {
            Some(card_id) => NextCard::Card { card_id },
            None => NextCard::Complete,
        }
    }

    /// Enter a session: promote every NotStarted record to Learning in one
    /// commit, then draw the first card from the due set.
    ///
    /// A cohort with no records at all is a caller error (EmptyCohort). If
    /// records exist but everything is already Reviewed, the session is
    /// reported Complete rather than failing.
    pub fn start_session(&self, cohort_id: Uuid, student_id: Uuid) -> Result<NextCard> {
        self.with_session_lock(cohort_id, student_id, || {
            let records = self.store.records(cohort_id, student_id)?;
            if records.is_empty() {
                return Err(ReviewError::EmptyCohort(cohort_id));
            }

            let records = self.store.promote_not_started(cohort_id, student_id)?;
            let due = selector::due_cards(&records);
            log::info!(
                "session start for student {} in cohort {}: {} card(s) due",
                student_id,
                cohort_id,
                due.len()
            );

            Ok(self.pick(&due))
        })
    }

    /// Flip the current card to its back. No status change; only validates
    /// that the card is actually part of this student's record set.
    pub fn reveal_back(&self, cohort_id: Uuid, student_id: Uuid, card_id: Uuid) -> Result<()> {
        let records = self.store.records(cohort_id, student_id)?;
        if !records.iter().any(|r| r.card_id == card_id) {
            return Err(ReviewError::CardNotFound(card_id));
        }
        Ok(())
    }

    /// Grade the shown card and advance the session.
    ///
    /// Correct marks the record Reviewed (idempotent if it already is);
    /// Incorrect leaves it Learning, so the card stays in the pass and may
    /// be redrawn immediately. Grading is allowed straight from the front,
    /// as an implicit reveal-plus-grade.
    pub fn grade(
        &self,
        cohort_id: Uuid,
        student_id: Uuid,
        card_id: Uuid,
        outcome: GradeOutcome,
    ) -> Result<NextCard> {
        self.with_session_lock(cohort_id, student_id, || {
            let mut records = self.store.records(cohort_id, student_id)?;
            let status = records
                .iter()
                .find(|r| r.card_id == card_id)
                .map(|r| r.status)
                .ok_or(ReviewError::CardNotFound(card_id))?;

            if outcome == GradeOutcome::Correct && status != ReviewStatus::Reviewed {
                self.store.commit_status(
                    cohort_id,
                    student_id,
                    card_id,
                    status,
                    ReviewStatus::Reviewed,
                )?;
                records = self.store.records(cohort_id, student_id)?;
            }

            let due = selector::due_cards(&records);
            log::debug!(
                "graded card {} as {:?} for student {}: {} card(s) still due",
                card_id,
                outcome,
                student_id,
                due.len()
            );

            Ok(self.pick(&due))
        })
    }

    /// Cards still due in the active pass, for progress rendering
    pub fn list_due(&self, cohort_id: Uuid, student_id: Uuid) -> Result<Vec<Uuid>> {
        let records = self.store.records(cohort_id, student_id)?;
        Ok(selector::due_cards(&records))
    }

    /// Status counts across the student's record set
    pub fn progress(&self, cohort_id: Uuid, student_id: Uuid) -> Result<ReviewProgress> {
        let records = self.store.records(cohort_id, student_id)?;
        Ok(ReviewProgress::from_records(&records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn reviewer(
        card_count: usize,
    ) -> (tempfile::TempDir, Reviewer<StdRng>, Uuid, Uuid, Vec<Uuid>) {
        let dir = tempdir().unwrap();
        let store = ReviewStore::new(dir.path().to_path_buf()).unwrap();

        let cohort = Uuid::new_v4();
        let student = Uuid::new_v4();
        let cards: Vec<Uuid> = (0..card_count).map(|_| Uuid::new_v4()).collect();
        store.assign_cards(cohort, &[student], &cards).unwrap();

        let reviewer = Reviewer::with_rng(store, StdRng::seed_from_u64(99));
        (dir, reviewer, cohort, student, cards)
    }

    #[test]
    fn start_promotes_all_records_and_returns_due_card() {
        let (_dir, reviewer, cohort, student, cards) = reviewer(3);

        let first = reviewer.start_session(cohort, student).unwrap();

        let card_id = first.card_id().expect("session should not be complete");
        assert!(cards.contains(&card_id));

        let records = reviewer.store().records(cohort, student).unwrap();
        assert!(records.iter().all(|r| r.status == ReviewStatus::Learning));
    }

    #[test]
    fn start_with_no_records_is_empty_cohort() {
        let dir = tempdir().unwrap();
        let store = ReviewStore::new(dir.path().to_path_buf()).unwrap();
        let reviewer = Reviewer::with_rng(store, StdRng::seed_from_u64(1));

        let cohort = Uuid::new_v4();
        let student = Uuid::new_v4();
        let err = reviewer.start_session(cohort, student).unwrap_err();

        assert!(matches!(err, ReviewError::EmptyCohort(id) if id == cohort));
        // No records fabricated by the failed start
        assert!(reviewer.store().records(cohort, student).unwrap().is_empty());
    }

    #[test]
    fn start_when_everything_reviewed_reports_complete() {
        let (_dir, reviewer, cohort, student, cards) = reviewer(2);

        reviewer.start_session(cohort, student).unwrap();
        for &card in &cards {
            reviewer
                .grade(cohort, student, card, GradeOutcome::Correct)
                .unwrap();
        }

        let restart = reviewer.start_session(cohort, student).unwrap();
        assert_eq!(restart, NextCard::Complete);
    }

    #[test]
    fn correct_grades_terminate_within_card_count_steps() {
        let (_dir, reviewer, cohort, student, cards) = reviewer(5);

        let mut next = reviewer.start_session(cohort, student).unwrap();
        let mut steps = 0;
        while let Some(card_id) = next.card_id() {
            next = reviewer
                .grade(cohort, student, card_id, GradeOutcome::Correct)
                .unwrap();
            steps += 1;
            assert!(steps <= cards.len(), "session did not terminate in N steps");
        }

        assert_eq!(steps, cards.len());
        assert!(reviewer.list_due(cohort, student).unwrap().is_empty());
    }

    #[test]
    fn incorrect_never_shrinks_the_due_set() {
        let (_dir, reviewer, cohort, student, _cards) = reviewer(3);

        let first = reviewer.start_session(cohort, student).unwrap();
        let card_id = first.card_id().unwrap();
        let due_before = reviewer.list_due(cohort, student).unwrap();

        let next = reviewer
            .grade(cohort, student, card_id, GradeOutcome::Incorrect)
            .unwrap();

        let due_after = reviewer.list_due(cohort, student).unwrap();
        assert_eq!(due_before.len(), due_after.len());
        assert!(due_after.contains(&next.card_id().unwrap()));
    }

    #[test]
    fn single_card_graded_incorrect_reselects_itself() {
        let (_dir, reviewer, cohort, student, cards) = reviewer(1);

        let first = reviewer.start_session(cohort, student).unwrap();
        assert_eq!(first.card_id(), Some(cards[0]));

        let next = reviewer
            .grade(cohort, student, cards[0], GradeOutcome::Incorrect)
            .unwrap();
        assert_eq!(next.card_id(), Some(cards[0]));
    }

    #[test]
    fn regrading_reviewed_card_correct_is_a_noop() {
        let (_dir, reviewer, cohort, student, _cards) = reviewer(3);

        let first = reviewer.start_session(cohort, student).unwrap();
        let card_id = first.card_id().unwrap();

        reviewer
            .grade(cohort, student, card_id, GradeOutcome::Correct)
            .unwrap();
        let due_before = reviewer.list_due(cohort, student).unwrap();

        // Retry of the same grading call, e.g. a double-click
        reviewer
            .grade(cohort, student, card_id, GradeOutcome::Correct)
            .unwrap();

        let due_after = reviewer.list_due(cohort, student).unwrap();
        assert_eq!(due_before, due_after);

        let records = reviewer.store().records(cohort, student).unwrap();
        let record = records.iter().find(|r| r.card_id == card_id).unwrap();
        assert_eq!(record.status, ReviewStatus::Reviewed);
    }

    #[test]
    fn grading_unknown_card_is_not_found_and_mutates_nothing() {
        let (_dir, reviewer, cohort, student, _cards) = reviewer(2);

        reviewer.start_session(cohort, student).unwrap();
        let before = reviewer.store().records(cohort, student).unwrap();

        let missing = Uuid::new_v4();
        let err = reviewer
            .grade(cohort, student, missing, GradeOutcome::Correct)
            .unwrap_err();
        assert!(matches!(err, ReviewError::CardNotFound(id) if id == missing));

        let after = reviewer.store().records(cohort, student).unwrap();
        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(after.iter()) {
            assert_eq!(b.status, a.status);
        }
    }

    #[test]
    fn reveal_back_validates_the_card() {
        let (_dir, reviewer, cohort, student, cards) = reviewer(2);

        reviewer.start_session(cohort, student).unwrap();

        reviewer.reveal_back(cohort, student, cards[0]).unwrap();
        let err = reviewer
            .reveal_back(cohort, student, Uuid::new_v4())
            .unwrap_err();
        assert!(matches!(err, ReviewError::CardNotFound(_)));
    }

    #[test]
    fn three_card_pass_runs_to_completion() {
        let (_dir, reviewer, cohort, student, cards) = reviewer(3);

        // Start: all three promoted to Learning, one drawn
        let first = reviewer.start_session(cohort, student).unwrap();
        let first_id = first.card_id().unwrap();
        assert_eq!(reviewer.list_due(cohort, student).unwrap().len(), 3);

        // Reveal, then grade Correct: due set shrinks to two
        reviewer.reveal_back(cohort, student, first_id).unwrap();
        let second = reviewer
            .grade(cohort, student, first_id, GradeOutcome::Correct)
            .unwrap();
        let second_id = second.card_id().unwrap();
        let due = reviewer.list_due(cohort, student).unwrap();
        assert_eq!(due.len(), 2);
        assert!(due.contains(&second_id));
        assert!(!due.contains(&first_id));

        // Incorrect keeps the due set at two
        let third = reviewer
            .grade(cohort, student, second_id, GradeOutcome::Incorrect)
            .unwrap();
        assert_eq!(reviewer.list_due(cohort, student).unwrap().len(), 2);

        // Grade the remaining two correct in whatever order they come up
        let mut next = third;
        while let Some(card_id) = next.card_id() {
            next = reviewer
                .grade(cohort, student, card_id, GradeOutcome::Correct)
                .unwrap();
        }

        assert_eq!(next, NextCard::Complete);
        assert!(reviewer.list_due(cohort, student).unwrap().is_empty());
        let progress = reviewer.progress(cohort, student).unwrap();
        assert_eq!(progress.reviewed, cards.len());
    }

    #[test]
    fn session_locks_do_not_accumulate() {
        let (_dir, reviewer, cohort, student, _cards) = reviewer(2);

        let first = reviewer.start_session(cohort, student).unwrap();
        reviewer
            .grade(cohort, student, first.card_id().unwrap(), GradeOutcome::Incorrect)
            .unwrap();

        // No interaction in flight, so no lock entry should remain
        assert_eq!(reviewer.session_lock_count(), 0);

        // Failed interactions release their entry too
        let other_cohort = Uuid::new_v4();
        assert!(reviewer.start_session(other_cohort, student).is_err());
        assert_eq!(reviewer.session_lock_count(), 0);
    }

    #[test]
    fn progress_counts_each_status() {
        let (_dir, reviewer, cohort, student, _cards) = reviewer(3);

        let first = reviewer.start_session(cohort, student).unwrap();
        reviewer
            .grade(cohort, student, first.card_id().unwrap(), GradeOutcome::Correct)
            .unwrap();

        let progress = reviewer.progress(cohort, student).unwrap();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.not_started, 0);
        assert_eq!(progress.learning, 2);
        assert_eq!(progress.reviewed, 1);
    }
}
