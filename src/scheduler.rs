// src/scheduler.rs
// Contains the logic for the spaced repetition system.

use chrono::{DateTime, Duration, Utc};
use log::debug;

use crate::deck::Word;

/// Highest difficulty a word can reach.
pub const MAX_DIFFICULTY: u8 = 5;

/// Base review intervals in days, indexed by how many times a word was reviewed.
pub const BASE_INTERVALS: [u32; 6] = [1, 3, 7, 14, 30, 90];

/// Interval after a missed word, whatever its history.
pub const RELEARN_INTERVAL_DAYS: u32 = 1;

/// Represents the user's answer for a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl Outcome {
    pub fn is_correct(self) -> bool {
        self == Outcome::Correct
    }
}

impl From<bool> for Outcome {
    fn from(is_correct: bool) -> Self {
        if is_correct {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        }
    }
}

/// A trait defining the core behavior of any scheduling algorithm.
pub trait Scheduler {
    /// Returns the word as it should be stored after this review.
    fn record_outcome(&self, word: &Word, outcome: Outcome, now: DateTime<Utc>) -> Word;
}

/// Fixed interval table, shortened as a word gets harder.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntervalTableScheduler;

impl IntervalTableScheduler {
    pub fn new() -> Self {
        IntervalTableScheduler
    }
}

impl Scheduler for IntervalTableScheduler {
    fn record_outcome(&self, word: &Word, outcome: Outcome, now: DateTime<Utc>) -> Word {
        let difficulty = next_difficulty(word.difficulty, outcome);
        let interval = match outcome {
            Outcome::Correct => next_interval(word.review_count, difficulty),
            Outcome::Incorrect => RELEARN_INTERVAL_DAYS,
        };

        debug!(
            "word {}: {:?}, difficulty {} -> {}, next review in {} day(s)",
            word.id, outcome, word.difficulty, difficulty, interval
        );

        Word {
            difficulty,
            last_reviewed: Some(now),
            next_review: now + Duration::days(i64::from(interval)),
            review_count: word.review_count + 1,
            ..word.clone()
        }
    }
}

/// Misses raise difficulty twice as fast as hits lower it.
/// The result is always within [0, MAX_DIFFICULTY], even for an out-of-range input.
pub fn next_difficulty(difficulty: u8, outcome: Outcome) -> u8 {
    let difficulty = difficulty.min(MAX_DIFFICULTY);
    match outcome {
        Outcome::Correct => difficulty.saturating_sub(1),
        Outcome::Incorrect => difficulty.saturating_add(2).min(MAX_DIFFICULTY),
    }
}

/// Days until the next review after a correct answer.
pub fn next_interval(review_count: u32, difficulty: u8) -> u32 {
    let level = (review_count as usize).min(BASE_INTERVALS.len() - 1);
    // 1.0 at difficulty 0 down to 0.5 at difficulty 5
    let factor = 1.0 - f64::from(difficulty.min(MAX_DIFFICULTY)) / 10.0;
    (f64::from(BASE_INTERVALS[level]) * factor).ceil() as u32
}

pub fn is_due(word: &Word, now: DateTime<Utc>) -> bool {
    word.next_review <= now
}
