// src/deck/defaults.rs
// The decks every new install starts with.

use chrono::{DateTime, TimeZone, Utc};

use super::{Deck, Word};

// (id, term, definition, example)
type SeedWord = (&'static str, &'static str, &'static str, &'static str);

#[rustfmt::skip]
const TOEFL: &[SeedWord] = &[
    ("word-1", "abate", "to become less intense or widespread", "The storm abated during the night."),
    ("word-2", "admonish", "to express warning or disapproval to someone", "The teacher admonished the students for their poor behavior."),
    ("word-3", "affluent", "having a great deal of money; wealthy", "He grew up in an affluent neighborhood."),
    ("word-4", "ambiguous", "open to more than one interpretation; not clear or decided", "The results of the experiment were ambiguous."),
    ("word-5", "benevolent", "well-meaning and kindly", "The benevolent organization provides food for the homeless."),
];

#[rustfmt::skip]
const GRE: &[SeedWord] = &[
    ("word-6", "aberration", "a departure from what is normal, usual, or expected", "The warm weather in January was an aberration."),
    ("word-7", "abridge", "shorten (a book, movie, speech, or other text) without losing the sense", "The novel has been abridged to make it suitable for children."),
    ("word-8", "abscond", "leave hurriedly and secretly, typically to escape from custody or avoid arrest", "The suspect absconded before the police arrived."),
    ("word-9", "acumen", "the ability to make good judgments and quick decisions", "Her business acumen has led to the company's success."),
    ("word-10", "alacrity", "brisk and cheerful readiness", "She accepted the invitation with alacrity."),
];

#[rustfmt::skip]
const BUSINESS: &[SeedWord] = &[
    ("word-11", "acquisition", "the purchase of one company by another", "The acquisition of the startup cost the company $10 million."),
    ("word-12", "assets", "property owned by a company that has value", "The company's assets include buildings, equipment, and investments."),
    ("word-13", "benchmark", "a standard or point of reference against which things may be compared", "The company's performance will be measured against industry benchmarks."),
    ("word-14", "leverage", "use borrowed capital for an investment, expecting the profits to be greater than the interest payable", "The company leveraged its assets to finance the new project."),
    ("word-15", "overhead", "the ongoing expenses of operating a business", "The company reduced overhead by moving to a smaller office."),
];

/// All seed decks were created on the same date.
fn seed_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).single().unwrap_or_default()
}

fn build(id: &str, name: &str, description: &str, words: &[SeedWord]) -> Deck {
    let created = seed_date();
    Deck {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        words: words
            .iter()
            .map(|(id, term, definition, example)| {
                Word::new(id, term, definition, example, created)
            })
            .collect(),
        created,
        last_studied: None,
    }
}

pub fn default_decks() -> Vec<Deck> {
    vec![
        build("default-toefl", "TOEFL Essentials", "Common words from the TOEFL exam", TOEFL),
        build("default-gre", "GRE Vocabulary", "Advanced words for the GRE", GRE),
        build(
            "default-business",
            "Business English",
            "Terms used in professional settings",
            BUSINESS,
        ),
    ]
}
