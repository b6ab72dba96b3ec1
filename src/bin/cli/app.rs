use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use uuid::Uuid;

use studydeck::catalog::{CatalogStorage, Cohort};
use studydeck::review::{ReviewStore, Reviewer};

/// Shared application state for CLI commands
pub struct App {
    pub catalog: CatalogStorage,
    pub reviewer: Reviewer,
}

impl App {
    /// Initialize from the given or default data directory
    pub fn new(data_dir: Option<&Path>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(path) => path.to_path_buf(),
            None => Self::default_data_dir()?,
        };

        let catalog = CatalogStorage::new(data_dir.clone())
            .context("Failed to initialize catalog storage")?;
        let store =
            ReviewStore::new(data_dir).context("Failed to initialize review store")?;

        Ok(Self {
            catalog,
            reviewer: Reviewer::new(store),
        })
    }

    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("studydeck"))
            .context("Failed to get data directory")
    }

    // The operations below touch both the catalog and the review store, in
    // that order: catalog first, then record fan-out or cascade, so a
    // failure never leaves records pointing at an assignment the catalog
    // does not know about.

    /// Assign cards to a cohort and fan out NotStarted records to every
    /// enrolled student
    pub fn assign_cards(&self, cohort_id: Uuid, card_ids: &[Uuid]) -> Result<Cohort> {
        let cohort = self.catalog.add_cards_to_cohort(cohort_id, card_ids)?;
        self.reviewer
            .store()
            .assign_cards(cohort_id, &cohort.student_ids, card_ids)?;
        Ok(cohort)
    }

    /// Enroll a student, back-filling records for cards already assigned
    pub fn enroll_student(&self, cohort_id: Uuid, student_id: Uuid) -> Result<Cohort> {
        let cohort = self.catalog.enroll_student(cohort_id, student_id)?;
        self.reviewer
            .store()
            .assign_cards(cohort_id, &[student_id], &cohort.card_ids)?;
        Ok(cohort)
    }

    /// Withdraw a student and drop all their records for the cohort
    pub fn withdraw_student(&self, cohort_id: Uuid, student_id: Uuid) -> Result<Cohort> {
        let cohort = self.catalog.withdraw_student(cohort_id, student_id)?;
        self.reviewer.store().remove_student(cohort_id, student_id)?;
        Ok(cohort)
    }

    /// Remove cards from a cohort and cascade into every student's records
    pub fn remove_cards(&self, cohort_id: Uuid, card_ids: &[Uuid]) -> Result<Cohort> {
        let cohort = self.catalog.remove_cards_from_cohort(cohort_id, card_ids)?;
        for &card_id in card_ids {
            self.reviewer.store().remove_card(cohort_id, card_id)?;
        }
        Ok(cohort)
    }

    /// Delete a card, scrubbing it from every cohort that carries it and
    /// from every student's records before it leaves the catalog
    pub fn delete_card(&self, card_id: Uuid) -> Result<()> {
        for cohort in self.catalog.list_cohorts()? {
            if cohort.has_card(card_id) {
                self.remove_cards(cohort.id, &[card_id])?;
            }
        }
        self.catalog.delete_card(card_id)?;
        Ok(())
    }

    /// Delete a deck and all its cards, with the same per-card cascade
    pub fn delete_deck(&self, deck_id: Uuid) -> Result<()> {
        for card in self.catalog.list_cards(deck_id)? {
            self.delete_card(card.id)?;
        }
        self.catalog.delete_deck(deck_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studydeck::review::ReviewStatus;
    use tempfile::tempdir;

    fn app() -> (tempfile::TempDir, App) {
        let dir = tempdir().unwrap();
        let app = App::new(Some(dir.path())).unwrap();
        (dir, app)
    }

    #[test]
    fn delete_card_cascades_into_cohorts_and_records() {
        let (_dir, app) = app();
        let owner = Uuid::new_v4();
        let student = Uuid::new_v4();

        let deck = app.catalog.create_deck(owner, "Latin".into(), None).unwrap();
        let card = app
            .catalog
            .create_card(deck.id, "aqua".into(), "water".into())
            .unwrap();
        let cohort = app.catalog.create_cohort(owner, "Latin 101".into()).unwrap();
        app.enroll_student(cohort.id, student).unwrap();
        app.assign_cards(cohort.id, &[card.id]).unwrap();

        app.delete_card(card.id).unwrap();

        assert!(app.catalog.cohort_card_ids(cohort.id).unwrap().is_empty());
        assert!(app
            .reviewer
            .store()
            .records(cohort.id, student)
            .unwrap()
            .is_empty());
        assert!(app.catalog.get_card(card.id).is_err());
    }

    #[test]
    fn delete_deck_cascades_through_every_card() {
        let (_dir, app) = app();
        let owner = Uuid::new_v4();
        let student = Uuid::new_v4();

        let deck = app.catalog.create_deck(owner, "Latin".into(), None).unwrap();
        let kept_deck = app.catalog.create_deck(owner, "Greek".into(), None).unwrap();
        let doomed = app
            .catalog
            .create_card(deck.id, "aqua".into(), "water".into())
            .unwrap();
        let kept = app
            .catalog
            .create_card(kept_deck.id, "hydor".into(), "water".into())
            .unwrap();

        let cohort = app.catalog.create_cohort(owner, "Classics".into()).unwrap();
        app.enroll_student(cohort.id, student).unwrap();
        app.assign_cards(cohort.id, &[doomed.id, kept.id]).unwrap();

        app.delete_deck(deck.id).unwrap();

        assert_eq!(
            app.catalog.cohort_card_ids(cohort.id).unwrap(),
            vec![kept.id]
        );
        let records = app.reviewer.store().records(cohort.id, student).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].card_id, kept.id);
        assert_eq!(records[0].status, ReviewStatus::NotStarted);
        assert!(app.catalog.get_deck(deck.id).is_err());
    }
}
