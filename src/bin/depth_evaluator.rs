use anyhow::Result;
use clap::Parser;
use ghost_chase_ai::play::{play_match, MatchReport, MatchRules};
use ghost_chase_ai::solver::SearchConfig;
use ghost_chase_ai::state::Outcome;
use ghost_chase_ai::utils::classic_state;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Search depths to compare
    #[clap(short, long, value_delimiter = ',', default_values_t = vec![1, 2, 3])]
    depths: Vec<u32>,

    /// Number of seeded games per depth
    #[clap(short, long, default_value_t = 10)]
    games: u64,

    /// Seed of the first game; game i uses start_seed + i
    #[clap(long, default_value_t = 0)]
    start_seed: u64,

    /// Turn limit per game
    #[clap(short, long, default_value_t = 600)]
    turns: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    println!(
        "Evaluating depths {:?} over {} games each...",
        args.depths, args.games
    );

    let mut summary: Vec<(u32, Vec<MatchReport>)> = Vec::new();
    for &depth in &args.depths {
        println!("\nDepth {}", depth);
        let mut reports = Vec::new();
        for game_idx in 0..args.games {
            let seed = args.start_seed + game_idx;
            let config = SearchConfig::new(depth).with_seed(seed);
            let report = play_match(classic_state()?, &config, &MatchRules::classic(args.turns), |_, _, _| {})?;
            info!(depth, seed, ?report, "game finished");
            println!(
                "  Seed: {:<4}, Outcome: {:<6}, Turns: {:<5}, Pellets: {:<4}, Ghosts: {}",
                seed,
                format!("{:?}", report.outcome),
                report.turns,
                report.pellets_eaten,
                report.ghosts_eaten
            );
            reports.push(report);
        }
        summary.push((depth, reports));
    }

    println!("\n--- Evaluation Complete ---");
    println!("Games per depth: {}", args.games);
    println!("\n--- Averages ---");

    for (depth, reports) in &summary {
        if reports.is_empty() {
            println!("Depth {}: No games played.", depth);
            continue;
        }
        let n = reports.len() as f64;
        let wins = reports.iter().filter(|r| r.outcome == Outcome::Win).count();
        let avg_pellets = reports.iter().map(|r| r.pellets_eaten as f64).sum::<f64>() / n;
        // a game that ends alive ran out of turns, which counts as surviving all of them
        let avg_turns = reports.iter().map(|r| r.turns as f64).sum::<f64>() / n;
        println!(
            "Depth {:<3}: Wins = {}/{}, Average Pellets = {:.2}, Average Survival = {:.1} turns",
            depth,
            wins,
            reports.len(),
            avg_pellets,
            avg_turns
        );
    }
    Ok(())
}
