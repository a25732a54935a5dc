// src/storage/replay_log.rs
// Manages the plain-text review log for recovery purposes.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::deck::Word;
use crate::scheduler::Outcome;

const LOG_FILENAME: &str = "reviews.log";

pub struct ReplayLogger {
    log_path: PathBuf,
}

impl ReplayLogger {
    /// Creates a logger writing to `dir/txn/reviews.log`.
    pub fn new(dir: &Path) -> Result<Self, std::io::Error> {
        let path = dir.join("txn");
        fs::create_dir_all(&path)?;
        Ok(ReplayLogger { log_path: path.join(LOG_FILENAME) })
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Logs a single review, with the word as it was stored afterwards.
    pub fn log_review(
        &self,
        deck_id: &str,
        word: &Word,
        outcome: Outcome,
        now: DateTime<Utc>,
    ) -> Result<(), std::io::Error> {
        // Open the file in append mode, creating it if it doesn't exist.
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        // Format: timestamp_iso,deck_id,word_id,outcome,difficulty,review_count
        let log_entry = format!(
            "{},{},{},{:?},{},{}\n",
            now.to_rfc3339(), deck_id, word.id, outcome, word.difficulty, word.review_count
        );

        file.write_all(log_entry.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let logger = ReplayLogger::new(dir.path()).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let mut word = Word::new("word-3", "affluent", "", "", now);
        word.difficulty = 2;
        word.review_count = 1;

        logger.log_review("default-toefl", &word, Outcome::Incorrect, now).unwrap();
        logger.log_review("default-toefl", &word, Outcome::Correct, now).unwrap();

        let text = fs::read_to_string(logger.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "2024-06-01T10:00:00+00:00,default-toefl,word-3,Incorrect,2,1");
        assert!(lines[1].contains(",Correct,"));
    }
}
