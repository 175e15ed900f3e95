use anyhow::{Context, Result};
use clap::Parser;
use ghost_chase_ai::play::{play_match, MatchRules};
use ghost_chase_ai::solver::{SearchConfig, DEFAULT_DEPTH, DEFAULT_REVERSE_PENALTY};
use ghost_chase_ai::state::{GameState, Outcome};
use ghost_chase_ai::utils::{classic_state, scenario_from_str_array};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Depth limit for the lookahead search
    #[clap(short, long, default_value_t = DEFAULT_DEPTH)]
    depth: u32,

    /// Seed for every random choice; omit for a different game each run
    #[clap(short, long)]
    seed: Option<u64>,

    /// Stop after this many turns
    #[clap(short, long, default_value_t = 1000)]
    turns: u32,

    /// Fraction of a reversing move's score taken off as a penalty
    #[clap(long, default_value_t = DEFAULT_REVERSE_PENALTY)]
    reverse_penalty: f64,

    /// Only print the final board
    #[clap(short, long)]
    quiet: bool,

    /// Path to a scenario file (maze rows with P and R/K/C/O markers); plays the classic maze if omitted
    scenario_file: Option<PathBuf>,
}

fn read_scenario_file(path: &PathBuf) -> Result<GameState> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    // spaces are floor, so only line endings and blank trailing lines are dropped
    let mut lines: Vec<&str> = content.lines().map(|s| s.trim_end_matches('\r')).collect();
    while lines.last().is_some_and(|s| s.is_empty()) {
        lines.pop();
    }

    scenario_from_str_array(&lines)
        .with_context(|| format!("Invalid scenario in {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let (state, rules) = match &args.scenario_file {
        Some(path) => {
            println!("Loaded scenario from {}\n", path.display());
            (read_scenario_file(path)?, MatchRules::new(args.turns))
        }
        None => (classic_state()?, MatchRules::classic(args.turns)),
    };

    let mut config = SearchConfig::new(args.depth).with_reverse_penalty(args.reverse_penalty);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    println!("Initial state:\n{}\n", state);
    println!("Playing with search depth {}...\n", args.depth);

    let mut last_board = state.to_string();
    let report = play_match(state, &config, &rules, |turn, direction, next| {
        last_board = next.to_string();
        if !args.quiet {
            println!("Turn {}: {}\n{}\n", turn, direction, last_board);
        }
    })
    .context("Search failed")?;

    match report.outcome {
        Outcome::Win => println!("Cleared the maze!"),
        Outcome::Lose => println!("Caught by a ghost."),
        Outcome::Alive => println!("Turn limit reached."),
    }
    println!("Turns: {}", report.turns);
    println!("Pellets eaten: {}", report.pellets_eaten);
    println!("Ghosts eaten: {}", report.ghosts_eaten);
    println!("\nFinal board state:\n{}\n", last_board);
    Ok(())
}
