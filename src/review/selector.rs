//! Card selection for review sessions
//!
//! Selection is a uniform random draw over the due set rather than a fixed
//! order, so a student cannot anticipate cards by position. Draws are
//! independent: the same card may come up twice in a row by chance.

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use super::models::{ReviewRecord, ReviewStatus};

/// Cards still due in the active pass (Learning status). Pure function of
/// the current records; preserves record order.
pub fn due_cards(records: &[ReviewRecord]) -> Vec<Uuid> {
    records
        .iter()
        .filter(|r| r.status == ReviewStatus::Learning)
        .map(|r| r.card_id)
        .collect()
}

/// Draw the next card uniformly at random from the due set.
///
/// Returns None when the due set is empty, which marks the session complete.
pub fn next_card<R: Rng>(due: &[Uuid], rng: &mut R) -> Option<Uuid> {
    due.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(status: ReviewStatus) -> ReviewRecord {
        let mut r = ReviewRecord::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        r.status = status;
        r
    }

    #[test]
    fn due_cards_returns_only_learning() {
        let records = vec![
            record(ReviewStatus::NotStarted),
            record(ReviewStatus::Learning),
            record(ReviewStatus::Reviewed),
            record(ReviewStatus::Learning),
        ];

        let due = due_cards(&records);

        assert_eq!(due.len(), 2);
        assert_eq!(due[0], records[1].card_id);
        assert_eq!(due[1], records[3].card_id);
    }

    #[test]
    fn next_card_empty_due_set_is_none() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(next_card(&[], &mut rng), None);
    }

    #[test]
    fn next_card_single_candidate_is_always_picked() {
        let mut rng = StdRng::seed_from_u64(7);
        let only = Uuid::new_v4();

        for _ in 0..10 {
            assert_eq!(next_card(&[only], &mut rng), Some(only));
        }
    }

    #[test]
    fn next_card_draws_from_due_set() {
        let mut rng = StdRng::seed_from_u64(42);
        let due: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();

        for _ in 0..50 {
            let picked = next_card(&due, &mut rng).unwrap();
            assert!(due.contains(&picked));
        }
    }

    #[test]
    fn next_card_eventually_covers_all_candidates() {
        let mut rng = StdRng::seed_from_u64(1);
        let due: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();

        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(next_card(&due, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), due.len());
    }
}
