//! `felt-sim`: play all-bot games and emit completed hands as JSON lines.
//!
//! ```no_run
//! use std::io;
//! let args = ["felt-sim", "--hands", "50", "--seed", "7", "--output", "data/sim.jsonl"];
//! let code = felt_table::sim::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! Without `--output` the records go to stdout and the summary line to
//! stderr, so stdout stays valid JSONL.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use felt_engine::errors::GameError;
use felt_engine::logger::HandLogger;
use thiserror::Error;

use crate::errors::StoreError;
use crate::settings::{self, SettingsError};
use crate::store::parse_policies;
use crate::table::{GameOptions, Table};

const DEFAULT_POLICIES: &str = "conservative,risk_taker,mathematical,bluffer";

#[derive(Parser, Debug)]
#[command(
    name = "felt-sim",
    version,
    about = "Simulate Texas Hold'em hands between algorithmic opponents"
)]
pub struct SimArgs {
    /// Number of hands to play
    #[arg(long, default_value_t = 100)]
    pub hands: u64,
    /// Comma-separated opponent policies, one per seat
    #[arg(long, default_value = DEFAULT_POLICIES)]
    pub policies: String,
    /// RNG seed for dealing and strategy sampling
    #[arg(long)]
    pub seed: Option<u64>,
    /// Monte Carlo trials per decision
    #[arg(long)]
    pub rollouts: Option<usize>,
    /// Write JSONL hand records to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Print the resolved settings and their sources, then exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse `args` and run the simulation. Returns the process exit code.
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
    let parsed = match SimArgs::try_parse_from(&argv) {
        Ok(parsed) => parsed,
        Err(e) => {
            use clap::error::ErrorKind;
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{e}").is_err() {
                        return 2;
                    }
                    0
                }
                _ => {
                    let _ = write!(err, "{e}");
                    2
                }
            };
        }
    };

    match simulate(&parsed, out, err) {
        Ok(()) => 0,
        Err(e) => {
            let _ = writeln!(err, "Error: {e}");
            2
        }
    }
}

fn simulate(args: &SimArgs, out: &mut dyn Write, err: &mut dyn Write) -> Result<(), SimError> {
    let resolved = settings::load_with_sources()?;
    if args.show_config {
        let json = serde_json::to_string_pretty(&resolved.to_json())
            .map_err(std::io::Error::other)?;
        writeln!(out, "{json}")?;
        return Ok(());
    }
    if args.hands == 0 {
        return Err(SimError::InvalidInput("hands must be >= 1".into()));
    }

    let policies = parse_policies(&args.policies)?;
    if policies.len() < 2 {
        return Err(SimError::InvalidInput(
            "at least two policies are needed".into(),
        ));
    }
    let mut options = GameOptions::all_bots(&policies, &resolved.settings);
    if let Some(seed) = args.seed {
        options.seed = Some(seed);
    }
    if let Some(rollouts) = args.rollouts {
        options.rollouts = rollouts;
    }

    let mut table = Table::new(&options)?;
    tracing::info!(
        seed = table.game().seed(),
        seats = policies.len(),
        hands = args.hands,
        "starting simulation"
    );

    let (played, game_over) = match &args.output {
        Some(path) => {
            let mut logger = HandLogger::create(path)?;
            let result = play(&mut table, args.hands, &mut logger)?;
            writeln!(out, "Simulated: {} hands", result.0)?;
            result
        }
        None => {
            let mut logger = HandLogger::new(&mut *out);
            let result = play(&mut table, args.hands, &mut logger)?;
            writeln!(err, "Simulated: {} hands", result.0)?;
            result
        }
    };
    if game_over {
        writeln!(err, "Game over after {played} hands: one seat holds every chip")?;
    }
    tracing::info!(played, game_over, "simulation finished");
    Ok(())
}

/// Play until `hands` are complete or only one seat has chips left.
fn play<W: Write>(
    table: &mut Table,
    hands: u64,
    logger: &mut HandLogger<W>,
) -> Result<(u64, bool), SimError> {
    let mut written = 0;
    loop {
        for record in &table.history()[written..] {
            logger.write(record)?;
        }
        written = table.history().len();
        if written as u64 >= hands {
            return Ok((written as u64, false));
        }
        match table.next_hand() {
            Ok(()) => {}
            Err(GameError::NotEnoughPlayers { .. }) => return Ok((written as u64, true)),
            Err(e) => return Err(e.into()),
        }
    }
}
