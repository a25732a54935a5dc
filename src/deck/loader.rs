// src/deck/loader.rs
// This file contains the logic for reading word lists from disk.

use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use chrono::{DateTime, Utc};
use log::info;
use serde::Deserialize;
use thiserror::Error;

// We need to bring our structs into scope from the parent module (deck/mod.rs)
use super::{Deck, Word};

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("could not read word list: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// One line of a word list file.
#[derive(Debug, Deserialize)]
struct WordEntry {
    term: String,
    definition: String,
    #[serde(default)]
    example: String,
}

/// Reads a newline-delimited JSON word list into a fresh deck.
/// Every word starts unreviewed and due at `now`.
pub fn load_word_list(
    path: &Path,
    deck_id: &str,
    name: &str,
    now: DateTime<Utc>,
) -> Result<Deck, LoaderError> {
    info!("Attempting to load word list from: {:?}", path);
    let file = fs::File::open(path)?;
    let deck = parse_word_list(BufReader::new(file), deck_id, name, now)?;
    info!("Loaded {} words into deck {}.", deck.words.len(), deck_id);
    Ok(deck)
}

fn parse_word_list<R: BufRead>(
    reader: R,
    deck_id: &str,
    name: &str,
    now: DateTime<Utc>,
) -> Result<Deck, LoaderError> {
    let mut words = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry: WordEntry = serde_json::from_str(&line)
            .map_err(|source| LoaderError::Parse { line: index + 1, source })?;
        let id = format!("{}-word-{}", deck_id, words.len() + 1);
        words.push(Word::new(&id, &entry.term, &entry.definition, &entry.example, now));
    }

    Ok(Deck {
        id: deck_id.to_string(),
        name: name.to_string(),
        description: String::new(),
        words,
        created: now,
        last_studied: None,
    })
}
