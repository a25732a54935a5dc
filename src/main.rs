// WordBrick - main.rs
// Command-line front end: loads decks and history, runs one command, saves.

use std::env;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::Path;

use chrono::{Local, Utc};
use log::info;

use wordbrick::deck::{loader, DEFAULT_DECK_PREFIX};
use wordbrick::storage::{DatabaseManager, ReplayLogger};
use wordbrick::{
    Config, DeckCollection, IntervalTableScheduler, Outcome, StatisticsState, StudySession,
};

const SETTINGS_FILE: &str = "wordbrick.json";

const USAGE: &str = "Usage: wordbrick <command>
  decks                                   list decks
  review <deck-id> <word-id> <correct|incorrect>
  study <deck-id>                         study due words interactively
  stats [deck-id]                         show statistics
  difficult                               list difficult words
  import <path.jsonl> <deck-id> <name>    load a word list from disk";

/// Everything a command needs, loaded from the data directory.
struct App {
    config: Config,
    db: DatabaseManager,
    logger: ReplayLogger,
    decks: DeckCollection,
    stats: StatisticsState,
}

impl App {
    fn load(config: Config) -> Result<Self, Box<dyn Error>> {
        let db = DatabaseManager::open(&config.data_directory)?;
        let logger = ReplayLogger::new(&config.data_directory)?;

        let mut decks = DeckCollection::with_defaults();
        for deck in db.load_user_decks()? {
            decks.insert_deck(deck);
        }
        db.apply_word_states(&mut decks)?;
        db.apply_deck_states(&mut decks)?;
        let stats = db.load_statistics()?;

        Ok(App { config, db, logger, decks, stats })
    }

    /// Runs both halves of the core for one answer and persists the result.
    fn record(
        &mut self,
        session: &mut StudySession,
        word_id: &str,
        is_correct: bool,
    ) -> Result<(), Box<dyn Error>> {
        let scheduler = IntervalTableScheduler::new();
        let now = Local::now();
        let updated =
            session.answer(word_id, is_correct, &scheduler, &mut self.decks, &mut self.stats, now)?;

        let deck_id = session.deck_id();
        self.db.update_word_state(deck_id, &updated)?;
        if let Some(deck) = self.decks.deck(deck_id) {
            self.db.update_deck_state(deck)?;
        }
        self.db.save_statistics(&self.stats)?;
        let outcome = Outcome::from(is_correct);
        self.logger.log_review(deck_id, &updated, outcome, now.with_timezone(&Utc))?;

        println!(
            "{} -> difficulty {}, next review {}",
            updated.term,
            updated.difficulty,
            updated.next_review.with_timezone(&Local).format("%Y-%m-%d")
        );
        Ok(())
    }
}

fn list_decks(app: &App) {
    let now = Utc::now();
    for deck in app.decks.decks() {
        println!(
            "{:<20} {:<24} {:>3} words, {:>3} due",
            deck.id,
            deck.name,
            deck.words.len(),
            deck.due_words(now).len()
        );
    }
}

fn show_stats(app: &App, deck_id: Option<&str>) {
    let stats = &app.stats;
    match deck_id {
        Some(id) => {
            let deck = stats.deck_stats(id);
            println!(
                "{}: {} reviewed, {} correct, {} incorrect",
                id, deck.reviewed, deck.correct, deck.incorrect
            );
        }
        None => {
            println!("Reviewed:  {}", stats.total_reviewed);
            println!("Accuracy:  {}%", stats.accuracy());
            println!("Streak:    {} day(s)", stats.streak_days());
            let last_day = stats.last_study_date.map(|d| d.with_timezone(&Local).date_naive());
            if let Some(today) = last_day {
                println!("Last day:  {} ({} review(s))", today, stats.reviews_on(today));
            }
        }
    }
}

fn list_difficult(app: &App) {
    let words = app.decks.difficult_words(app.config.difficult_threshold);
    if words.is_empty() {
        println!("No difficult words yet.");
    }
    for entry in words {
        println!(
            "{:<16} {:<20} difficulty {}",
            entry.word.term, entry.deck_name, entry.word.difficulty
        );
    }
}

fn study(app: &mut App, deck_id: &str) -> Result<(), Box<dyn Error>> {
    let deck = app.decks.deck(deck_id).ok_or_else(|| format!("Deck not found: {}", deck_id))?;
    let mut session = StudySession::new(deck, &app.config, Utc::now());
    if session.total_session_words() == 0 {
        println!("Nothing due in {}.", deck_id);
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while let Some(word_id) = session.next_word() {
        let word = app.decks.find_word(deck_id, &word_id)?.clone();
        print!(
            "\n[{}/{}] {}  (enter to reveal) ",
            session.reviews_complete() + 1,
            session.total_session_words(),
            word.term
        );
        io::stdout().flush()?;
        if lines.next().transpose()?.is_none() {
            break;
        }
        println!("{}", word.definition);
        if app.config.show_examples && !word.example.is_empty() {
            println!("  e.g. {}", word.example);
        }
        print!("Did you know it? [y/n] ");
        io::stdout().flush()?;
        let answer = match lines.next().transpose()? {
            Some(answer) => answer,
            None => break,
        };
        app.record(&mut session, &word_id, answer.trim().eq_ignore_ascii_case("y"))?;
    }

    println!(
        "\nSession done: {} reviewed, {} missed.",
        session.reviews_complete(),
        session.missed_words().len()
    );
    Ok(())
}

fn review(
    app: &mut App,
    deck_id: &str,
    word_id: &str,
    outcome: &str,
) -> Result<(), Box<dyn Error>> {
    let is_correct = match outcome {
        "correct" => true,
        "incorrect" => false,
        other => return Err(format!("Expected correct or incorrect, got {:?}", other).into()),
    };
    // Validate the reference before anything is recorded.
    app.decks.find_word(deck_id, word_id)?;
    let mut session = StudySession::for_deck(deck_id);
    app.record(&mut session, word_id, is_correct)
}

fn import(app: &mut App, path: &str, deck_id: &str, name: &str) -> Result<(), Box<dyn Error>> {
    if deck_id.starts_with(DEFAULT_DECK_PREFIX) {
        return Err(format!("Deck ids starting with {:?} are reserved", DEFAULT_DECK_PREFIX).into());
    }
    let deck = loader::load_word_list(Path::new(path), deck_id, name, Utc::now())?;
    app.db.save_user_deck(&deck)?;
    println!("Imported {} words into {}.", deck.words.len(), deck.id);
    app.decks.insert_deck(deck);
    Ok(())
}

pub fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // --- Get the command from command-line arguments ---
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{}", USAGE);
        return Err("missing command".into());
    };

    let config = Config::load(Path::new(SETTINGS_FILE));
    info!("Using data directory {:?}", config.data_directory);
    let mut app = App::load(config)?;

    match (command.as_str(), &args[1..]) {
        ("decks", []) => list_decks(&app),
        ("stats", []) => show_stats(&app, None),
        ("stats", [deck_id]) => show_stats(&app, Some(deck_id.as_str())),
        ("difficult", []) => list_difficult(&app),
        ("study", [deck_id]) => study(&mut app, deck_id)?,
        ("review", [deck_id, word_id, outcome]) => review(&mut app, deck_id, word_id, outcome)?,
        ("import", [path, deck_id, name]) => import(&mut app, path, deck_id, name)?,
        _ => {
            eprintln!("{}", USAGE);
            return Err(format!("unrecognised command: {}", args.join(" ")).into());
        }
    }
    Ok(())
}
