//! Case Trainer - swipe through scenario cases in the terminal
//!
//! Single-deck, resumable, self-contained CLI application.
//! Progress is saved after every answer and restored on the next run.

use case_swipe_trainer::catalog::Catalog;
use case_swipe_trainer::cli::{compose, dispatch, Display, Flow, InputHandler};
use case_swipe_trainer::config::AppConfig;
use case_swipe_trainer::session::{
    FileStore, MemoryStore, Phase, ProgressStore, RevealPacer, SessionMachine,
};
use clap::Parser;
use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Upper bound on how long one input poll blocks
const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(name = "case-trainer")]
#[command(version, about = "Swipe right if it happened, left if it did not")]
struct Args {
    /// Path to the case deck (JSON array)
    #[arg(short, long, default_value = "data/cases.json")]
    cases: PathBuf,

    /// Path to a TOML configuration file
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Directory for saved progress (overrides the config file)
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Forget saved progress and start from the first case
    #[arg(long)]
    reset: bool,

    /// Keep progress in memory only
    #[arg(long)]
    no_save: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Log file (defaults to case-trainer.log in the state directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Route tracing output to a file; the terminal belongs to the UI
fn init_logging(args: &Args, config: &AppConfig) -> Result<(), Box<dyn Error>> {
    let path = match &args.log_file {
        Some(path) => path.clone(),
        None => {
            fs::create_dir_all(&config.storage.state_dir)?;
            config.storage.state_dir.join("case-trainer.log")
        }
    };
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(dir) = &args.state_dir {
        config.storage.state_dir = dir.clone();
    }

    init_logging(&args, &config)?;

    let catalog = Catalog::load(&args.cases)?;

    if args.no_save {
        run(catalog, MemoryStore::new(), &config, args.reset)
    } else {
        let store = FileStore::new(&config.storage.state_dir);
        run(catalog, store, &config, args.reset)
    }
}

fn run<S: ProgressStore>(
    catalog: Catalog,
    store: S,
    config: &AppConfig,
    reset: bool,
) -> Result<(), Box<dyn Error>> {
    let mut session = SessionMachine::new(catalog, store);
    if reset {
        session.reset_progress();
    }

    let mut pacer = RevealPacer::new(config.pacing.reveal_delay());
    // Resumed mid-verdict: reveal it again
    if session.phase() == Phase::Verdict {
        pacer.schedule_reveal(session.epoch(), Instant::now());
    }

    let display = Display::alternate()?;
    InputHandler::enable_capture()?;
    let mut input = InputHandler::new(&config.terminal, config.gesture.velocity_window());

    let result = event_loop(&mut session, &mut pacer, &display, &mut input, config);

    // Cleanup
    InputHandler::disable_capture()?;
    display.shutdown()?;
    drop(display);
    result?;

    // Summary
    let snap = session.snapshot();
    if let Some(summary) = session.summary() {
        println!("All cases done: {} / {}", summary.score, summary.total);
        if let Some(tier) = summary.tier(&config.tiers) {
            println!("{}: {}", tier.label, tier.message);
        }
    } else {
        println!(
            "Stopped at case {} of {} with {} points",
            snap.position + 1,
            snap.total,
            snap.score
        );
    }

    Ok(())
}

fn event_loop<S: ProgressStore>(
    session: &mut SessionMachine<S>,
    pacer: &mut RevealPacer,
    display: &Display,
    input: &mut InputHandler,
    config: &AppConfig,
) -> Result<(), Box<dyn Error>> {
    let mut dirty = true;

    loop {
        let now = Instant::now();
        if pacer.tick(now, session.epoch()) {
            dirty = true;
        }

        if dirty {
            let revealed = pacer.is_revealed(session.epoch());
            display.render(&compose(&*session, &config.tiers, revealed))?;
            dirty = false;
        }

        // Wake up in time for a pending reveal
        let timeout = pacer
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now).min(IDLE_POLL))
            .unwrap_or(IDLE_POLL);

        let Some(event) = input.read_event(timeout)? else {
            continue;
        };

        match dispatch(session, pacer, &config.gesture, event, Instant::now()) {
            Flow::Quit => break,
            Flow::Redraw => dirty = true,
            Flow::Continue => {}
        }
    }

    Ok(())
}
