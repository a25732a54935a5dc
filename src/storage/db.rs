// src/storage/db.rs
// Manages the SQLite database for storing word review state and statistics.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension};

use super::StorageError;
use crate::deck::{Deck, DeckCollection, Word};
use crate::scheduler::MAX_DIFFICULTY;
use crate::statistics::StatisticsState;

const DB_FILENAME: &str = "wordbrick.db";
const STATISTICS_KEY: &str = "statistics";

pub struct DatabaseManager {
    conn: Connection,
}

/// One stored row of `word_state`.
struct StoredWordState {
    deck_id: String,
    word_id: String,
    difficulty: i64,
    last_reviewed: Option<String>,
    next_review: String,
    review_count: u32,
}

impl DatabaseManager {
    /// Opens (creating if needed) the database inside `dir`.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(dir)?;
        let db_path = dir.join(DB_FILENAME);
        info!("Opening review database at {:?}", db_path);
        Self::from_connection(Connection::open(db_path)?)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        let manager = DatabaseManager { conn };
        manager.init_schema()?;
        Ok(manager)
    }

    /// Creates the necessary tables if they don't already exist.
    fn init_schema(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS word_state (
                deck_id         TEXT NOT NULL,
                word_id         TEXT NOT NULL,
                difficulty      INTEGER NOT NULL,
                last_reviewed   TEXT,
                next_review     TEXT NOT NULL,
                review_count    INTEGER NOT NULL,
                PRIMARY KEY (deck_id, word_id)
            );
            CREATE TABLE IF NOT EXISTS deck_state (
                deck_id         TEXT PRIMARY KEY,
                last_studied    TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS user_deck (
                id              TEXT PRIMARY KEY,
                body            TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS app_state (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Updates the review state of a single word.
    /// Uses `INSERT OR REPLACE` to handle both new and existing words.
    pub fn update_word_state(&self, deck_id: &str, word: &Word) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO word_state (deck_id, word_id, difficulty, last_reviewed, next_review, review_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                deck_id,
                word.id,
                word.difficulty,
                word.last_reviewed.map(|t| t.to_rfc3339()),
                word.next_review.to_rfc3339(),
                word.review_count,
            ],
        )?;
        Ok(())
    }

    /// Records when a deck was last studied; a deck never studied has no row.
    pub fn update_deck_state(&self, deck: &Deck) -> Result<(), StorageError> {
        match deck.last_studied {
            Some(last_studied) => self.conn.execute(
                "INSERT OR REPLACE INTO deck_state (deck_id, last_studied) VALUES (?1, ?2)",
                params![deck.id, last_studied.to_rfc3339()],
            )?,
            None => self
                .conn
                .execute("DELETE FROM deck_state WHERE deck_id = ?1", params![deck.id])?,
        };
        Ok(())
    }

    /// Restores `last_studied` on every deck that has a stored row.
    pub fn apply_deck_states(&self, decks: &mut DeckCollection) -> Result<usize, StorageError> {
        let mut stmt = self.conn.prepare("SELECT deck_id, last_studied FROM deck_state")?;
        let rows = stmt.query_map([], |row| {
            let deck_id: String = row.get(0)?;
            let last_studied: String = row.get(1)?;
            Ok((deck_id, last_studied))
        })?;

        let mut applied = 0;
        for row in rows {
            let (deck_id, last_studied) = row?;
            let last_studied = parse_timestamp(&last_studied)?;
            match decks.mark_studied(&deck_id, last_studied) {
                Ok(()) => applied += 1,
                Err(e) => warn!("Skipping stored deck state: {}", e),
            }
        }
        debug!("Applied {} stored deck states.", applied);
        Ok(applied)
    }

    /// Copies every stored review state onto the matching word in `decks`.
    /// Rows for words that no longer exist are skipped. Returns how many words were updated.
    pub fn apply_word_states(&self, decks: &mut DeckCollection) -> Result<usize, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT deck_id, word_id, difficulty, last_reviewed, next_review, review_count FROM word_state",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(StoredWordState {
                deck_id: row.get(0)?,
                word_id: row.get(1)?,
                difficulty: row.get(2)?,
                last_reviewed: row.get(3)?,
                next_review: row.get(4)?,
                review_count: row.get(5)?,
            })
        })?;

        let mut applied = 0;
        for row in rows {
            let state = row?;
            let mut word = match decks.find_word(&state.deck_id, &state.word_id) {
                Ok(word) => word.clone(),
                Err(e) => {
                    warn!("Skipping stored state: {}", e);
                    continue;
                }
            };
            if !(0..=i64::from(MAX_DIFFICULTY)).contains(&state.difficulty) {
                warn!(
                    "Clamping stored difficulty {} of word {} in deck {}",
                    state.difficulty, state.word_id, state.deck_id
                );
            }
            word.difficulty = state.difficulty.clamp(0, i64::from(MAX_DIFFICULTY)) as u8;
            word.last_reviewed = state.last_reviewed.as_deref().map(parse_timestamp).transpose()?;
            word.next_review = parse_timestamp(&state.next_review)?;
            word.review_count = state.review_count;
            // The lookup above succeeded, so this cannot miss.
            if decks.replace_word(&state.deck_id, word).is_ok() {
                applied += 1;
            }
        }
        debug!("Applied {} stored word states.", applied);
        Ok(applied)
    }

    /// Stores a deck loaded from a word list so it survives restarts.
    /// Saving over an existing deck id drops the review state recorded for the
    /// old words, since the new list reuses the same word ids.
    pub fn save_user_deck(&self, deck: &Deck) -> Result<(), StorageError> {
        let body = serde_json::to_string(deck)?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM word_state WHERE deck_id = ?1", params![deck.id])?;
        tx.execute("DELETE FROM deck_state WHERE deck_id = ?1", params![deck.id])?;
        tx.execute(
            "INSERT OR REPLACE INTO user_deck (id, body) VALUES (?1, ?2)",
            params![deck.id, body],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn load_user_decks(&self) -> Result<Vec<Deck>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT body FROM user_deck ORDER BY id")?;
        let bodies = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut decks = Vec::new();
        for body in bodies {
            decks.push(serde_json::from_str(&body?)?);
        }
        info!("Loaded {} user deck(s).", decks.len());
        Ok(decks)
    }

    pub fn save_statistics(&self, stats: &StatisticsState) -> Result<(), StorageError> {
        let json = serde_json::to_string(stats)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO app_state (key, value) VALUES (?1, ?2)",
            params![STATISTICS_KEY, json],
        )?;
        Ok(())
    }

    /// Loads the saved statistics, or a fresh state if none were saved yet.
    pub fn load_statistics(&self) -> Result<StatisticsState, StorageError> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM app_state WHERE key = ?1",
                params![STATISTICS_KEY],
                |row| row.get(0),
            )
            .optional()?;
        match json {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(StatisticsState::default()),
        }
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|source| StorageError::Timestamp { value: value.to_string(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{IntervalTableScheduler, Outcome, Scheduler};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 2, 7, 15, 0).unwrap()
    }

    #[test]
    fn test_statistics_round_trip() {
        let db = DatabaseManager::open_in_memory().unwrap();
        assert_eq!(db.load_statistics().unwrap(), StatisticsState::default());

        let mut stats = StatisticsState::new();
        stats.record_review("default-toefl", true, now());
        stats.record_review("default-gre", false, now());
        db.save_statistics(&stats).unwrap();
        assert_eq!(db.load_statistics().unwrap(), stats);

        stats.record_review("default-gre", true, now());
        db.save_statistics(&stats).unwrap();
        assert_eq!(db.load_statistics().unwrap().total_reviewed, 3);
    }

    #[test]
    fn test_word_state_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let scheduler = IntervalTableScheduler::new();
        let mut decks = DeckCollection::with_defaults();
        let word = decks.find_word("default-business", "word-12").unwrap().clone();
        let updated = scheduler.record_outcome(&word, Outcome::Incorrect, now());
        {
            let db = DatabaseManager::open(dir.path()).unwrap();
            db.update_word_state("default-business", &updated).unwrap();
        }

        let db = DatabaseManager::open(dir.path()).unwrap();
        assert_eq!(db.apply_word_states(&mut decks).unwrap(), 1);
        assert_eq!(decks.find_word("default-business", "word-12").unwrap(), &updated);
    }

    #[test]
    fn test_user_deck_round_trip() {
        let db = DatabaseManager::open_in_memory().unwrap();
        let mut deck = crate::deck::defaults::default_decks().remove(0);
        deck.id = "user-copy".to_string();
        db.save_user_deck(&deck).unwrap();
        // Saving again replaces rather than duplicates.
        db.save_user_deck(&deck).unwrap();
        assert_eq!(db.load_user_decks().unwrap(), vec![deck]);
    }

    #[test]
    fn test_resaving_deck_drops_old_review_state() {
        let db = DatabaseManager::open_in_memory().unwrap();
        let scheduler = IntervalTableScheduler::new();

        let first = Deck {
            id: "user-x".to_string(),
            name: "List A".to_string(),
            description: String::new(),
            words: vec![Word::new("user-x-word-1", "oldterm", "old", "", now())],
            created: now(),
            last_studied: None,
        };
        db.save_user_deck(&first).unwrap();
        let mut missed = first.words[0].clone();
        for _ in 0..3 {
            missed = scheduler.record_outcome(&missed, Outcome::Incorrect, now());
        }
        db.update_word_state("user-x", &missed).unwrap();
        let mut studied = first.clone();
        studied.last_studied = Some(now());
        db.update_deck_state(&studied).unwrap();

        let mut second = first.clone();
        second.name = "List B".to_string();
        second.words = vec![Word::new("user-x-word-1", "brandnew", "new", "", now())];
        db.save_user_deck(&second).unwrap();

        let mut decks = DeckCollection::new();
        for deck in db.load_user_decks().unwrap() {
            decks.insert_deck(deck);
        }
        assert_eq!(db.apply_word_states(&mut decks).unwrap(), 0);
        assert_eq!(db.apply_deck_states(&mut decks).unwrap(), 0);

        let word = decks.find_word("user-x", "user-x-word-1").unwrap();
        assert_eq!(word.term, "brandnew");
        assert_eq!(word.difficulty, 0);
        assert_eq!(word.review_count, 0);
        assert_eq!(decks.deck("user-x").unwrap().last_studied, None);
    }

    #[test]
    fn test_deck_state_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut decks = DeckCollection::with_defaults();
        decks.mark_studied("default-gre", now()).unwrap();
        {
            let db = DatabaseManager::open(dir.path()).unwrap();
            db.update_deck_state(decks.deck("default-gre").unwrap()).unwrap();
            db.update_deck_state(decks.deck("default-toefl").unwrap()).unwrap();
        }

        let db = DatabaseManager::open(dir.path()).unwrap();
        let mut reloaded = DeckCollection::with_defaults();
        assert_eq!(db.apply_deck_states(&mut reloaded).unwrap(), 1);
        assert_eq!(reloaded.deck("default-gre").unwrap().last_studied, Some(now()));
        assert_eq!(reloaded.deck("default-toefl").unwrap().last_studied, None);
    }

    #[test]
    fn test_out_of_range_difficulty_is_clamped_on_load() {
        let db = DatabaseManager::open_in_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO word_state VALUES ('default-gre', 'word-7', 9, NULL, ?1, 2)",
                params![now().to_rfc3339()],
            )
            .unwrap();
        let mut decks = DeckCollection::with_defaults();
        assert_eq!(db.apply_word_states(&mut decks).unwrap(), 1);

        let word = decks.find_word("default-gre", "word-7").unwrap();
        assert_eq!(word.difficulty, 5);
        let updated = IntervalTableScheduler::new().record_outcome(word, Outcome::Correct, now());
        assert_eq!(updated.difficulty, 4);
    }

    #[test]
    fn test_unknown_rows_are_skipped() {
        let db = DatabaseManager::open_in_memory().unwrap();
        let ghost = crate::deck::Word::new("ghost", "boo", "", "", now());
        db.update_word_state("user-gone", &ghost).unwrap();

        let mut decks = DeckCollection::with_defaults();
        assert_eq!(db.apply_word_states(&mut decks).unwrap(), 0);
    }

    #[test]
    fn test_bad_timestamp_is_reported() {
        let db = DatabaseManager::open_in_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO word_state VALUES ('default-gre', 'word-6', 1, NULL, 'yesterday', 1)",
                [],
            )
            .unwrap();
        let mut decks = DeckCollection::with_defaults();
        assert!(matches!(
            db.apply_word_states(&mut decks),
            Err(StorageError::Timestamp { .. })
        ));
    }
}
