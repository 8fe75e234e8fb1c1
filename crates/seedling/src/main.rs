//! seedling - spaced-repetition vocabulary practice
//!
//! This is the command-line front end. It wires together:
//! - Configuration loading
//! - Logging
//! - Persistence backend selection
//! - The state store and core engine

mod learn;
mod script;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, Local};
use clap::{Parser, Subcommand};
use seedling_api::{SessionMode, Track, COLLECTION_THRESHOLD};
use seedling_config::{load_config, load_or_default, BackendKind, Settings, StorageSettings};
use seedling_core::{can_claim, is_done, month_summary, CoreEngine, CoreEvent, SessionQueue, StateStore};
use seedling_store::{FileBackend, MemoryBackend, PersistenceBackend, SqliteBackend};
use seedling_util::{
    default_config_path, format_datetime_full, is_mock_time_active, local_day, Clock, ItemId, SystemClock,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::learn::{run_session, stars};
use crate::script::{matches_script, script_hint};

/// seedling - learn Chinese characters and English words a little every day
#[derive(Parser, Debug)]
#[command(name = "seedling", version)]
#[command(about = "Spaced-repetition vocabulary practice with a daily watering garden", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/seedling/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data directory override (or set SEEDLING_DATA_DIR env var)
    #[arg(short, long, env = "SEEDLING_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a word or character
    Add {
        track: Track,
        /// The text to add; several words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Remove a word by its text or id
    Delete { track: Track, text: String },

    /// Show a track's library, newest first
    List {
        track: Track,
        /// Only show items containing this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Start a learning or review session
    Learn {
        track: Track,
        /// "new" for unlearned items, "review" for due items
        #[arg(short, long, default_value = "new")]
        mode: SessionMode,
    },

    /// Claim today's water for a finished track
    Water { track: Track },

    /// Show today's tasks and the garden
    Status,

    /// Show which days had finished sessions
    Calendar {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => {
            let path = default_config_path();
            load_or_default(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))?
        }
    };

    if let Some(dir) = &args.data_dir {
        settings = settings.with_data_dir(dir);
    }
    if let Some(level) = &args.log_level {
        settings = settings.with_log_level(level);
    }
    Ok(settings)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn open_backend(storage: &StorageSettings) -> Result<Arc<dyn PersistenceBackend>> {
    let backend: Arc<dyn PersistenceBackend> = match storage.backend {
        BackendKind::Sqlite => {
            std::fs::create_dir_all(storage.data_dir()).with_context(|| {
                format!("Failed to create data directory {:?}", storage.data_dir())
            })?;
            let db_path = storage.database_path();
            let backend = SqliteBackend::open(&db_path)
                .with_context(|| format!("Failed to open database {:?}", db_path))?;
            info!(db_path = %db_path.display(), "Store initialized");
            Arc::new(backend)
        }
        BackendKind::File => {
            let backend = FileBackend::open(storage.data_dir()).with_context(|| {
                format!("Failed to open data directory {:?}", storage.data_dir())
            })?;
            info!(dir = %storage.data_dir().display(), "Store initialized");
            Arc::new(backend)
        }
        BackendKind::Memory => {
            warn!("Using the memory backend, nothing will be kept after exit");
            Arc::new(MemoryBackend::new())
        }
    };

    if !backend.is_healthy() {
        warn!(backend = %storage.backend, "Store reports unhealthy");
    }
    Ok(backend)
}

fn find_item_id(engine: &CoreEngine, track: Track, text: &str) -> Option<ItemId> {
    let state = engine.snapshot();
    let needle = text.trim().to_lowercase();
    state
        .track_items(track)
        .find(|i| i.id.as_str() == text.trim() || i.text.to_lowercase() == needle)
        .map(|i| i.id.clone())
}

fn clock_line(now: &DateTime<Local>, mock: bool) -> String {
    let line = format_datetime_full(now);
    if mock {
        format!("{} (mock time)", line)
    } else {
        line
    }
}

fn run(command: Command, engine: &mut CoreEngine, clock: &dyn Clock) -> Result<()> {
    let today = clock.today();

    match command {
        Command::Add { track, text } => {
            let text = text.join(" ");
            if !matches_script(&text, track) {
                bail!("Cannot add {:?} to {}: {}", text.trim(), track, script_hint(track));
            }
            match engine.add_item(&text, track)? {
                CoreEvent::ItemAdded { text, .. } => println!("Added {} to {}.", text, track),
                other => debug!(event = ?other, "Unexpected event"),
            }
        }

        Command::Delete { track, text } => {
            let Some(id) = find_item_id(engine, track, &text) else {
                println!("No {} item matches {:?}.", track, text);
                return Ok(());
            };
            engine.delete_item(&id);
            println!("Deleted {:?} from {}.", text, track);
        }

        Command::List { track, search } => {
            let state = engine.snapshot();
            let items = state.library(track, search.as_deref());
            if items.is_empty() {
                println!("No {} items.", track);
            }
            for item in items {
                let reviewed = item
                    .last_reviewed
                    .map(|at| local_day(&at).to_string())
                    .unwrap_or_else(|| "never".into());
                println!(
                    "{}  {}  due {}  reviewed {}  [{}]",
                    item.text,
                    stars(item.familiarity),
                    item.next_due_date,
                    reviewed,
                    item.id
                );
            }
        }

        Command::Learn { track, mode } => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            let summary = run_session(engine, track, mode, stdin.lock(), &mut stdout)?;
            debug!(?summary, "Learning run finished");
        }

        Command::Water { track } => {
            let state = engine.snapshot();
            if !is_done(&state, track, today) {
                println!("Finish a {} session today before claiming water.", track);
                return Ok(());
            }
            for event in engine.claim_water(track)? {
                match event {
                    CoreEvent::WaterClaimed { water_level, .. } => {
                        println!("Watered! {}/{}", water_level, COLLECTION_THRESHOLD);
                    }
                    CoreEvent::PlantCollected { collected_count } => {
                        println!("Your plant is fully grown! Plants collected: {}", collected_count);
                    }
                    _ => {}
                }
            }
        }

        Command::Status => {
            let state = engine.snapshot();
            println!("{}", clock_line(&clock.now(), is_mock_time_active()));
            for track in Track::ALL {
                let progress = state.progress(track);
                let new = SessionQueue::build(&state, track, SessionMode::New, today).len();
                let due = SessionQueue::build(&state, track, SessionMode::Review, today).len();
                let task = if can_claim(&state, track, today) {
                    "done, water waiting"
                } else if is_done(&state, track, today) {
                    "done"
                } else {
                    "not done"
                };
                println!(
                    "{:<8} {:>3}/{:<3} mastered today  {} new  {} due  today: {}",
                    track.as_str(), progress.mastered_today, progress.total, new, due, task
                );
            }
            println!(
                "Garden: water {}/{}, plants collected {}",
                state.garden.water_level, COLLECTION_THRESHOLD, state.garden.collected_count
            );
        }

        Command::Calendar { year, month } => {
            let year = year.unwrap_or(today.year());
            let month = month.unwrap_or(today.month());
            let state = engine.snapshot();
            let days = month_summary(&state.engagement_log, year, month);
            if days.is_empty() {
                bail!("Invalid month {}-{}", year, month);
            }

            println!("{:04}-{:02}", year, month);
            for marks in days {
                let mark = if marks.all() {
                    "✔✔"
                } else if marks.any() {
                    "✔"
                } else {
                    ""
                };
                let tracks: Vec<&str> = marks.tracks.iter().map(|t| t.as_str()).collect();
                println!("{}  {:<2} {}", marks.day, mark, tracks.join(", "));
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(&args)?;

    init_logging(&settings.log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "seedling starting");

    let backend = open_backend(&settings.storage)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = StateStore::open(backend, settings.storage.key.clone(), Arc::clone(&clock));
    let mut engine = CoreEngine::new(store);

    run(args.command, &mut engine, clock.as_ref())?;

    if engine.store().failed_writes() > 0 {
        warn!(
            failed = engine.store().failed_writes(),
            "Some changes could not be saved"
        );
    }
    Ok(())
}
