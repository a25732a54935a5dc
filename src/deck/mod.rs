// src/deck/mod.rs
// This module holds the word decks and the collection that owns them.

pub mod defaults;
pub mod loader;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix carried by the ids of the built-in seed decks.
pub const DEFAULT_DECK_PREFIX: &str = "default-";

/// Represents a single vocabulary word and its review state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: String,
    pub term: String,
    pub definition: String,
    pub example: String,
    pub difficulty: u8,                         // 0 (easy) to 5 (hard)
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_review: DateTime<Utc>,
    pub review_count: u32,
}

impl Word {
    /// A word that has never been reviewed and is due immediately.
    pub fn new(id: &str, term: &str, definition: &str, example: &str, now: DateTime<Utc>) -> Self {
        Word {
            id: id.to_string(),
            term: term.to_string(),
            definition: definition.to_string(),
            example: example.to_string(),
            difficulty: 0,
            last_reviewed: None,
            next_review: now,
            review_count: 0,
        }
    }

    pub fn is_new(&self) -> bool {
        self.review_count == 0
    }
}

/// A named, ordered collection of words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: String,
    pub name: String,
    pub description: String,
    pub words: Vec<Word>,
    pub created: DateTime<Utc>,
    pub last_studied: Option<DateTime<Utc>>,
}

impl Deck {
    pub fn is_default(&self) -> bool {
        self.id.starts_with(DEFAULT_DECK_PREFIX)
    }

    pub fn word(&self, word_id: &str) -> Option<&Word> {
        self.words.iter().find(|w| w.id == word_id)
    }

    /// Words whose next review is at or before `now`, in deck order.
    pub fn due_words(&self, now: DateTime<Utc>) -> Vec<&Word> {
        self.words.iter().filter(|w| crate::scheduler::is_due(w, now)).collect()
    }
}

/// A word flagged as difficult, tagged with where it lives.
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultWord {
    pub word: Word,
    pub deck_id: String,
    pub deck_name: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum DeckError {
    #[error("deck not found: {0}")]
    DeckNotFound(String),
    #[error("word {word_id} not found in deck {deck_id}")]
    WordNotFound { deck_id: String, word_id: String },
}

/// Owns every deck the user can study: the seed decks plus any loaded from disk.
#[derive(Debug, Clone, Default)]
pub struct DeckCollection {
    decks: Vec<Deck>,
}

impl DeckCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// A collection pre-populated with the built-in decks.
    pub fn with_defaults() -> Self {
        DeckCollection { decks: defaults::default_decks() }
    }

    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }

    pub fn deck(&self, deck_id: &str) -> Option<&Deck> {
        self.decks.iter().find(|d| d.id == deck_id)
    }

    fn deck_mut(&mut self, deck_id: &str) -> Result<&mut Deck, DeckError> {
        self.decks
            .iter_mut()
            .find(|d| d.id == deck_id)
            .ok_or_else(|| DeckError::DeckNotFound(deck_id.to_string()))
    }

    /// Adds a deck, replacing any existing deck with the same id.
    pub fn insert_deck(&mut self, deck: Deck) {
        match self.decks.iter_mut().find(|d| d.id == deck.id) {
            Some(existing) => *existing = deck,
            None => self.decks.push(deck),
        }
    }

    pub fn find_word(&self, deck_id: &str, word_id: &str) -> Result<&Word, DeckError> {
        let deck = self
            .deck(deck_id)
            .ok_or_else(|| DeckError::DeckNotFound(deck_id.to_string()))?;
        deck.word(word_id).ok_or_else(|| DeckError::WordNotFound {
            deck_id: deck_id.to_string(),
            word_id: word_id.to_string(),
        })
    }

    /// Writes an updated word back into its deck, keeping its position.
    pub fn replace_word(&mut self, deck_id: &str, word: Word) -> Result<(), DeckError> {
        let deck = self.deck_mut(deck_id)?;
        let slot = deck
            .words
            .iter_mut()
            .find(|w| w.id == word.id)
            .ok_or_else(|| DeckError::WordNotFound {
                deck_id: deck_id.to_string(),
                word_id: word.id.clone(),
            })?;
        *slot = word;
        Ok(())
    }

    pub fn mark_studied(&mut self, deck_id: &str, now: DateTime<Utc>) -> Result<(), DeckError> {
        self.deck_mut(deck_id)?.last_studied = Some(now);
        Ok(())
    }

    /// Every word at or above `threshold` difficulty, across all decks.
    pub fn difficult_words(&self, threshold: u8) -> Vec<DifficultWord> {
        self.decks
            .iter()
            .flat_map(|deck| {
                deck.words.iter().filter(|w| w.difficulty >= threshold).map(move |w| DifficultWord {
                    word: w.clone(),
                    deck_id: deck.id.clone(),
                    deck_name: deck.name.clone(),
                })
            })
            .collect()
    }

    pub fn due_words(&self, deck_id: &str, now: DateTime<Utc>) -> Result<Vec<&Word>, DeckError> {
        self.deck(deck_id)
            .map(|d| d.due_words(now))
            .ok_or_else(|| DeckError::DeckNotFound(deck_id.to_string()))
    }
}
