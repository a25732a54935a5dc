// src/session.rs
// Drives one study sitting: picks the due words, then feeds every answer to
// the scheduler and the statistics with the same event.

use chrono::{DateTime, TimeZone, Utc};
use log::debug;
use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::config::Config;
use crate::deck::{Deck, DeckCollection, DeckError, Word};
use crate::scheduler::{Outcome, Scheduler};
use crate::statistics::StatisticsState;

pub struct StudySession {
    deck_id: String,
    review_queue: Vec<String>,
    session_total: usize,
    session_reviews_complete: usize,
    missed_this_session: Vec<String>,
}

impl StudySession {
    /// Queues up to `cards_per_session` words of `deck` that are due at `now`.
    pub fn new(deck: &Deck, config: &Config, now: DateTime<Utc>) -> Self {
        let (mut fresh, mut seen): (Vec<&Word>, Vec<&Word>) =
            deck.due_words(now).into_iter().partition(|w| w.is_new());

        for group in [&mut fresh, &mut seen] {
            if cfg!(test) {
                group.sort_unstable_by(|a, b| a.id.cmp(&b.id));
            } else {
                group.shuffle(&mut thread_rng());
            }
        }

        let mut served: Vec<String> = if config.review_new_cards_first {
            fresh.iter().chain(seen.iter()).map(|w| w.id.clone()).collect()
        } else {
            let mut all: Vec<String> =
                fresh.iter().chain(seen.iter()).map(|w| w.id.clone()).collect();
            if !cfg!(test) {
                all.shuffle(&mut thread_rng());
            }
            all
        };
        served.truncate(config.cards_per_session);
        // .pop() takes from the end, so the first word to serve goes last.
        served.reverse();

        let session_total = served.len();
        debug!("Session for deck {}: {} word(s) queued", deck.id, session_total);

        StudySession {
            deck_id: deck.id.clone(),
            review_queue: served,
            session_total,
            session_reviews_complete: 0,
            missed_this_session: Vec::new(),
        }
    }

    /// A session with nothing queued, for recording answers to words the
    /// caller picks itself.
    pub fn for_deck(deck_id: &str) -> Self {
        StudySession {
            deck_id: deck_id.to_string(),
            review_queue: Vec::new(),
            session_total: 0,
            session_reviews_complete: 0,
            missed_this_session: Vec::new(),
        }
    }

    pub fn deck_id(&self) -> &str {
        &self.deck_id
    }

    /// Id of the next word to show, if any are left.
    pub fn next_word(&mut self) -> Option<String> {
        self.review_queue.pop()
    }

    /// Records an answer: reschedules the word, writes it back into `decks`
    /// and counts the review in `stats`. The calendar day for the streak is
    /// taken in the time zone of `now`.
    pub fn answer<Tz: TimeZone>(
        &mut self,
        word_id: &str,
        is_correct: bool,
        scheduler: &dyn Scheduler,
        decks: &mut DeckCollection,
        stats: &mut StatisticsState,
        now: DateTime<Tz>,
    ) -> Result<Word, DeckError> {
        let now_utc = now.with_timezone(&Utc);
        let word = decks.find_word(&self.deck_id, word_id)?;
        let updated = scheduler.record_outcome(word, Outcome::from(is_correct), now_utc);

        decks.replace_word(&self.deck_id, updated.clone())?;
        decks.mark_studied(&self.deck_id, now_utc)?;
        stats.record_review(&self.deck_id, is_correct, now);

        self.session_reviews_complete += 1;
        if !is_correct && !self.missed_this_session.iter().any(|id| id == word_id) {
            self.missed_this_session.push(word_id.to_string());
        }
        Ok(updated)
    }

    pub fn reviews_complete(&self) -> usize {
        self.session_reviews_complete
    }

    pub fn total_session_words(&self) -> usize {
        self.session_total
    }

    pub fn missed_words(&self) -> &[String] {
        &self.missed_this_session
    }

    pub fn is_done(&self) -> bool {
        self.review_queue.is_empty()
    }
}
