// src/statistics.rs
// Review counters, per-deck totals and the daily study streak.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use log::debug;
use serde::{Deserialize, Serialize};

/// Review totals for one deck.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckStats {
    pub reviewed: u32,
    pub correct: u32,
    pub incorrect: u32,
}

impl DeckStats {
    fn record(&mut self, is_correct: bool) {
        self.reviewed += 1;
        if is_correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
    }
}

/// Everything the app knows about the user's study history.
///
/// The value is owned by whoever drives the study session and saved through
/// the storage layer; the only mutation is [`StatisticsState::record_review`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsState {
    pub total_reviewed: u32,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub streak_days: u32,
    pub last_study_date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub study_history: BTreeMap<NaiveDate, u32>,
    #[serde(default)]
    pub deck_stats: HashMap<String, DeckStats>,
}

impl StatisticsState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one answered card.
    ///
    /// The calendar day is taken in the time zone of `now`, so callers that
    /// want local-day streaks pass `Local::now()` and tests can pin a zone.
    /// Timestamps are trusted as given: a clock that jumps backwards can reset
    /// the streak.
    pub fn record_review<Tz: TimeZone>(
        &mut self,
        deck_id: &str,
        is_correct: bool,
        now: DateTime<Tz>,
    ) {
        self.total_reviewed += 1;
        if is_correct {
            self.correct_count += 1;
        } else {
            self.incorrect_count += 1;
        }

        self.deck_stats.entry(deck_id.to_string()).or_default().record(is_correct);

        let today = now.date_naive();
        *self.study_history.entry(today).or_insert(0) += 1;

        let previous_day = self
            .last_study_date
            .as_ref()
            .map(|last| last.with_timezone(&now.timezone()).date_naive());
        self.streak_days = next_streak(self.streak_days, previous_day, today);
        self.last_study_date = Some(now.fixed_offset());

        debug!(
            "review recorded for deck {} (correct: {}), streak {} day(s)",
            deck_id, is_correct, self.streak_days
        );
    }

    /// Percentage of correct answers, rounded; 0 before any review.
    pub fn accuracy(&self) -> u32 {
        if self.total_reviewed == 0 {
            return 0;
        }
        (f64::from(self.correct_count) / f64::from(self.total_reviewed) * 100.0).round() as u32
    }

    pub fn streak_days(&self) -> u32 {
        self.streak_days
    }

    /// Totals for a deck; zeros if it was never reviewed.
    pub fn deck_stats(&self, deck_id: &str) -> DeckStats {
        self.deck_stats.get(deck_id).copied().unwrap_or_default()
    }

    pub fn reviews_on(&self, date: NaiveDate) -> u32 {
        self.study_history.get(&date).copied().unwrap_or(0)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn next_streak(streak: u32, previous_day: Option<NaiveDate>, today: NaiveDate) -> u32 {
    match previous_day {
        None => 1,
        Some(day) if Some(day) == today.pred_opt() => streak + 1,
        Some(day) if day != today => 1,
        // Same day: more reviews never lengthen the streak.
        Some(_) => streak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_counters_are_additive() {
        let mut stats = StatisticsState::new();
        for i in 0..7 {
            stats.record_review("default-gre", i % 3 != 0, at(1, 10));
        }
        assert_eq!(stats.total_reviewed, 7);
        assert_eq!(stats.correct_count + stats.incorrect_count, 7);
        assert_eq!(stats.correct_count, 4);
        let deck = stats.deck_stats("default-gre");
        assert_eq!(deck.reviewed, deck.correct + deck.incorrect);
        assert_eq!(deck.reviewed, 7);
    }

    #[test]
    fn test_streak_scenario() {
        let mut stats = StatisticsState::new();
        assert_eq!(stats.streak_days(), 0);

        stats.record_review("d", true, at(1, 9));
        assert_eq!(stats.streak_days(), 1);

        stats.record_review("d", true, at(2, 9));
        assert_eq!(stats.streak_days(), 2);

        stats.record_review("d", false, at(2, 21));
        assert_eq!(stats.streak_days(), 2);

        stats.record_review("d", true, at(4, 9));
        assert_eq!(stats.streak_days(), 1);
    }

    #[test]
    fn test_streak_crosses_month_boundary() {
        let mut stats = StatisticsState::new();
        stats.record_review("d", true, Utc.with_ymd_and_hms(2024, 2, 29, 23, 0, 0).unwrap());
        stats.record_review("d", true, Utc.with_ymd_and_hms(2024, 3, 1, 0, 30, 0).unwrap());
        assert_eq!(stats.streak_days(), 2);
    }

    #[test]
    fn test_day_boundary_follows_time_zone() {
        // 23:30 UTC on the 1st is already the 2nd at UTC+2.
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let mut stats = StatisticsState::new();
        stats.record_review("d", true, at(1, 12).with_timezone(&plus_two));
        let late = at(1, 23) + Duration::minutes(30);
        stats.record_review("d", true, late.with_timezone(&plus_two));

        assert_eq!(stats.streak_days(), 2);
        assert_eq!(stats.reviews_on(NaiveDate::from_ymd_opt(2024, 2, 2).unwrap()), 1);
    }

    #[test]
    fn test_clock_skew_resets_streak() {
        let mut stats = StatisticsState::new();
        stats.record_review("d", true, at(5, 9));
        stats.record_review("d", true, at(6, 9));
        stats.record_review("d", true, at(3, 9));
        assert_eq!(stats.streak_days(), 1);
    }

    #[test]
    fn test_history_counts_per_day() {
        let mut stats = StatisticsState::new();
        stats.record_review("a", true, at(1, 8));
        stats.record_review("a", true, at(1, 18));
        stats.record_review("b", false, at(3, 8));
        assert_eq!(stats.reviews_on(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()), 2);
        assert_eq!(stats.reviews_on(NaiveDate::from_ymd_opt(2024, 2, 2).unwrap()), 0);
        assert_eq!(stats.reviews_on(NaiveDate::from_ymd_opt(2024, 2, 3).unwrap()), 1);
        assert_eq!(stats.last_study_date, Some(at(3, 8).fixed_offset()));
    }

    #[test]
    fn test_accuracy() {
        let mut stats = StatisticsState::new();
        assert_eq!(stats.accuracy(), 0);
        for correct in [true, true, true, false] {
            stats.record_review("d", correct, at(1, 9));
        }
        assert_eq!(stats.accuracy(), 75);

        stats.record_review("d", false, at(1, 10));
        stats.record_review("d", true, at(1, 11));
        // 4 of 6 = 66.67
        assert_eq!(stats.accuracy(), 67);
    }

    #[test]
    fn test_decks_are_independent() {
        let mut stats = StatisticsState::new();
        stats.record_review("a", true, at(1, 9));
        let before = stats.deck_stats("a");
        stats.record_review("b", false, at(1, 10));
        stats.record_review("b", false, at(1, 11));
        assert_eq!(stats.deck_stats("a"), before);
        assert_eq!(stats.deck_stats("b"), DeckStats { reviewed: 2, correct: 0, incorrect: 2 });
    }

    #[test]
    fn test_unknown_deck_is_zero_and_not_inserted() {
        let stats = StatisticsState::new();
        assert_eq!(stats.deck_stats("missing"), DeckStats::default());
        assert!(stats.deck_stats.is_empty());
    }

    #[test]
    fn test_reset() {
        let mut stats = StatisticsState::new();
        stats.record_review("a", true, at(1, 9));
        stats.reset();
        assert_eq!(stats, StatisticsState::default());
        assert_eq!(stats.last_study_date, None);
    }
}
