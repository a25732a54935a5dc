// WordBrick - lib.rs
// Vocabulary decks, a small spaced-repetition scheduler and study statistics.

pub mod config;
pub mod deck;
pub mod scheduler;
pub mod session;
pub mod statistics;
pub mod storage;

pub use config::Config;
pub use deck::{Deck, DeckCollection, DeckError, Word};
pub use scheduler::{IntervalTableScheduler, Outcome, Scheduler};
pub use session::StudySession;
pub use statistics::{DeckStats, StatisticsState};
