//! Storage operations for the card catalog
//!
//! Directory structure:
//! ```text
//! {data_dir}/
//! ├── decks.json           # Array of all decks
//! ├── cards/
//! │   └── {card-id}.json   # Individual card files
//! └── cohorts/
//!     └── {cohort-id}.json # Cohort with member and card id lists
//! ```

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use super::models::*;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Deck not found: {0}")]
    DeckNotFound(Uuid),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    #[error("Cohort not found: {0}")]
    CohortNotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Storage manager for decks, cards, and cohorts
pub struct CatalogStorage {
    data_dir: PathBuf,
}

impl CatalogStorage {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        let storage = Self { data_dir };
        storage.init()?;
        Ok(storage)
    }

    fn cards_dir(&self) -> PathBuf {
        self.data_dir.join("cards")
    }

    fn cohorts_dir(&self) -> PathBuf {
        self.data_dir.join("cohorts")
    }

    fn decks_path(&self) -> PathBuf {
        self.data_dir.join("decks.json")
    }

    fn card_path(&self, card_id: Uuid) -> PathBuf {
        self.cards_dir().join(format!("{}.json", card_id))
    }

    fn cohort_path(&self, cohort_id: Uuid) -> PathBuf {
        self.cohorts_dir().join(format!("{}.json", cohort_id))
    }

    /// Initialize the catalog directories
    fn init(&self) -> Result<()> {
        fs::create_dir_all(self.cards_dir())?;
        fs::create_dir_all(self.cohorts_dir())?;

        let decks_path = self.decks_path();
        if !decks_path.exists() {
            let empty: Vec<Deck> = Vec::new();
            fs::write(&decks_path, serde_json::to_string_pretty(&empty)?)?;
        }

        Ok(())
    }

    // ==================== Deck Operations ====================

    /// List all decks
    pub fn list_decks(&self) -> Result<Vec<Deck>> {
        let decks_path = self.decks_path();
        if !decks_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&decks_path)?;
        let decks: Vec<Deck> = serde_json::from_str(&content)?;
        Ok(decks)
    }

    /// Get a specific deck
    pub fn get_deck(&self, deck_id: Uuid) -> Result<Deck> {
        let decks = self.list_decks()?;
        decks
            .into_iter()
            .find(|d| d.id == deck_id)
            .ok_or(CatalogError::DeckNotFound(deck_id))
    }

    /// Create a new deck
    pub fn create_deck(
        &self,
        owner_id: Uuid,
        name: String,
        description: Option<String>,
    ) -> Result<Deck> {
        let mut deck = Deck::new(owner_id, name);
        deck.description = description;

        let mut decks = self.list_decks()?;
        decks.push(deck.clone());
        fs::write(self.decks_path(), serde_json::to_string_pretty(&decks)?)?;

        Ok(deck)
    }

    /// Update a deck
    pub fn update_deck(&self, deck: &Deck) -> Result<()> {
        let mut decks = self.list_decks()?;
        let pos = decks
            .iter()
            .position(|d| d.id == deck.id)
            .ok_or(CatalogError::DeckNotFound(deck.id))?;

        decks[pos] = deck.clone();
        fs::write(self.decks_path(), serde_json::to_string_pretty(&decks)?)?;

        Ok(())
    }

    /// Delete a deck and all its cards
    pub fn delete_deck(&self, deck_id: Uuid) -> Result<()> {
        let cards = self.list_cards(deck_id)?;
        for card in cards {
            let path = self.card_path(card.id);
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }

        let mut decks = self.list_decks()?;
        decks.retain(|d| d.id != deck_id);
        fs::write(self.decks_path(), serde_json::to_string_pretty(&decks)?)?;

        Ok(())
    }

    fn update_deck_card_count(&self, deck_id: Uuid) -> Result<()> {
        let cards = self.list_cards(deck_id)?;
        let mut deck = self.get_deck(deck_id)?;
        deck.card_count = cards.len();
        deck.updated_at = Utc::now();
        self.update_deck(&deck)?;
        Ok(())
    }

    // ==================== Card Operations ====================

    /// List all cards in a deck
    pub fn list_cards(&self, deck_id: Uuid) -> Result<Vec<Card>> {
        let cards_dir = self.cards_dir();
        if !cards_dir.exists() {
            return Ok(Vec::new());
        }

        let mut cards = Vec::new();
        for entry in fs::read_dir(&cards_dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                let card: Card = serde_json::from_str(&content)?;
                if card.deck_id == deck_id {
                    cards.push(card);
                }
            }
        }

        cards.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(cards)
    }

    /// Get a specific card
    pub fn get_card(&self, card_id: Uuid) -> Result<Card> {
        let card_path = self.card_path(card_id);
        if !card_path.exists() {
            return Err(CatalogError::CardNotFound(card_id));
        }

        let content = fs::read_to_string(&card_path)?;
        let card: Card = serde_json::from_str(&content)?;
        Ok(card)
    }

    /// Create a new card in a deck
    pub fn create_card(&self, deck_id: Uuid, front: String, back: String) -> Result<Card> {
        // Deck must exist before a card can join it
        self.get_deck(deck_id)?;

        let card = Card::new(deck_id, front, back);
        fs::write(self.card_path(card.id), serde_json::to_string_pretty(&card)?)?;

        self.update_deck_card_count(deck_id)?;

        Ok(card)
    }

    /// Delete a card
    pub fn delete_card(&self, card_id: Uuid) -> Result<()> {
        let card = self.get_card(card_id)?;

        fs::remove_file(self.card_path(card_id))?;
        self.update_deck_card_count(card.deck_id)?;

        Ok(())
    }

    // ==================== Cohort Operations ====================

    /// List all cohorts
    pub fn list_cohorts(&self) -> Result<Vec<Cohort>> {
        let cohorts_dir = self.cohorts_dir();
        if !cohorts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut cohorts = Vec::new();
        for entry in fs::read_dir(&cohorts_dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                let cohort: Cohort = serde_json::from_str(&content)?;
                cohorts.push(cohort);
            }
        }

        cohorts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(cohorts)
    }

    /// Get a specific cohort
    pub fn get_cohort(&self, cohort_id: Uuid) -> Result<Cohort> {
        let path = self.cohort_path(cohort_id);
        if !path.exists() {
            return Err(CatalogError::CohortNotFound(cohort_id));
        }

        let content = fs::read_to_string(&path)?;
        let cohort: Cohort = serde_json::from_str(&content)?;
        Ok(cohort)
    }

    /// Create a new cohort
    pub fn create_cohort(&self, owner_id: Uuid, name: String) -> Result<Cohort> {
        let cohort = Cohort::new(owner_id, name);
        self.save_cohort(&cohort)?;
        Ok(cohort)
    }

    fn save_cohort(&self, cohort: &Cohort) -> Result<()> {
        let path = self.cohort_path(cohort.id);
        fs::write(path, serde_json::to_string_pretty(cohort)?)?;
        Ok(())
    }

    /// Enroll a student into a cohort. Idempotent.
    pub fn enroll_student(&self, cohort_id: Uuid, student_id: Uuid) -> Result<Cohort> {
        let mut cohort = self.get_cohort(cohort_id)?;
        if !cohort.has_student(student_id) {
            cohort.student_ids.push(student_id);
            cohort.updated_at = Utc::now();
            self.save_cohort(&cohort)?;
        }
        Ok(cohort)
    }

    /// Withdraw a student from a cohort
    pub fn withdraw_student(&self, cohort_id: Uuid, student_id: Uuid) -> Result<Cohort> {
        let mut cohort = self.get_cohort(cohort_id)?;
        cohort.student_ids.retain(|&id| id != student_id);
        cohort.updated_at = Utc::now();
        self.save_cohort(&cohort)?;
        Ok(cohort)
    }

    /// Record that cards are assigned to a cohort. Every card must exist;
    /// already-assigned cards are skipped.
    pub fn add_cards_to_cohort(&self, cohort_id: Uuid, card_ids: &[Uuid]) -> Result<Cohort> {
        let mut cohort = self.get_cohort(cohort_id)?;

        for &card_id in card_ids {
            self.get_card(card_id)?;
            if !cohort.has_card(card_id) {
                cohort.card_ids.push(card_id);
            }
        }

        cohort.updated_at = Utc::now();
        self.save_cohort(&cohort)?;
        Ok(cohort)
    }

    /// Remove cards from a cohort
    pub fn remove_cards_from_cohort(&self, cohort_id: Uuid, card_ids: &[Uuid]) -> Result<Cohort> {
        let mut cohort = self.get_cohort(cohort_id)?;
        cohort.card_ids.retain(|id| !card_ids.contains(id));
        cohort.updated_at = Utc::now();
        self.save_cohort(&cohort)?;
        Ok(cohort)
    }

    /// Ids of all cards assigned to a cohort
    pub fn cohort_card_ids(&self, cohort_id: Uuid) -> Result<Vec<Uuid>> {
        Ok(self.get_cohort(cohort_id)?.card_ids)
    }
}
