//! Data models for decks, cards, and cohorts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A deck is an instructor's collection of cards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub card_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deck {
    pub fn new(owner_id: Uuid, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name,
            description: None,
            card_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// An instructional card with a question (front) and answer (back)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub front: String,
    pub back: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    pub fn new(deck_id: Uuid, front: String, back: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            deck_id,
            front,
            back,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A cohort groups enrolled students with the cards assigned to them.
///
/// Membership and assignment live here as plain id lists; which cards a
/// given student has actually reviewed is the review store's business.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cohort {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub student_ids: Vec<Uuid>,
    #[serde(default)]
    pub card_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cohort {
    pub fn new(owner_id: Uuid, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name,
            student_ids: Vec::new(),
            card_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_student(&self, student_id: Uuid) -> bool {
        self.student_ids.contains(&student_id)
    }

    pub fn has_card(&self, card_id: Uuid) -> bool {
        self.card_ids.contains(&card_id)
    }
}
