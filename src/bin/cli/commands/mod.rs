pub mod card;
pub mod cohort;
pub mod deck;
pub mod review;
