//! Tournament seating command line.
//!
//! Usage:
//!   cargo run --release --bin seat_tournament -- optimize --players 20 --tables 2 \
//!       --rounds 10 --games 20 --attempts 10 --runs 5 --iterations 100000
//!   cargo run --release --bin seat_tournament -- report schedule.json
//!   cargo run --release --bin seat_tournament -- names 25 --output participants.json

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use seating_optimizer::optimizer::{OptimizeOpponents, OptimizerConfig, RunProgress};
use seating_optimizer::participants::Participants;
use seating_optimizer::persistence::{
    load_participants, load_schedule, save_participants, save_schedule,
};
use seating_optimizer::report;
use seating_optimizer::schedule::{Configuration, Schedule};

#[derive(Parser)]
#[command(name = "seat_tournament")]
#[command(about = "Build tournament seatings where every pair of players meets evenly")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and optimize a schedule.
    Optimize {
        /// Configuration JSON file (overrides the geometry flags)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of players
        #[arg(long)]
        players: Option<usize>,
        /// Number of tables
        #[arg(long)]
        tables: Option<usize>,
        /// Number of rounds
        #[arg(long)]
        rounds: Option<usize>,
        /// Total number of games
        #[arg(long)]
        games: Option<usize>,
        /// Games per player
        #[arg(long)]
        attempts: Option<usize>,
        /// Independent optimization runs
        #[arg(long, default_value = "3")]
        runs: usize,
        /// Swap attempts per run
        #[arg(short, long, default_value = "100000")]
        iterations: u64,
        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// Worker threads for --parallel (default: all cores)
        #[arg(short, long)]
        threads: Option<usize>,
        /// Run the restarts in parallel
        #[arg(long)]
        parallel: bool,
        /// Minimize the legacy score without the zero-meeting term
        #[arg(long)]
        legacy_score: bool,
        /// Where to save the best schedule
        #[arg(short, long, default_value = "schedule.json")]
        output: PathBuf,
        /// Participant file; generated names are used when absent
        #[arg(short, long)]
        participants: Option<PathBuf>,
    },

    /// Print the reports of a saved schedule.
    Report {
        /// Schedule JSON file
        schedule: PathBuf,
        /// Participant file for named listings
        #[arg(short, long)]
        participants: Option<PathBuf>,
    },

    /// Generate participant names.
    Names {
        /// How many names
        count: usize,
        /// Save them as a participant file instead of printing
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Optimize {
            config,
            players,
            tables,
            rounds,
            games,
            attempts,
            runs,
            iterations,
            seed,
            threads,
            parallel,
            legacy_score,
            output,
            participants,
        } => {
            let configuration = match config {
                Some(path) => Configuration::from_json_file(&path)
                    .with_context(|| format!("loading configuration {}", path.display()))?,
                None => match (players, tables, rounds, games, attempts) {
                    (Some(p), Some(t), Some(r), Some(g), Some(a)) => {
                        let configuration = Configuration::new(p, t, r, g, a);
                        configuration.validate()?;
                        configuration
                    }
                    _ => bail!(
                        "either --config or all of --players --tables --rounds --games --attempts are required"
                    ),
                },
            };

            let participants = match participants {
                Some(path) => load_participants(&path)
                    .with_context(|| format!("loading participants {}", path.display()))?,
                None => Participants::create(configuration.num_players),
            };

            let mut optimizer_config = if legacy_score {
                OptimizerConfig::legacy()
            } else {
                OptimizerConfig::default()
            };
            if let Some(s) = seed {
                optimizer_config = optimizer_config.with_seed(s);
            }
            if let Some(t) = threads {
                optimizer_config = optimizer_config.with_threads(t);
            }

            println!("=================================================");
            println!("  Tournament Seating Optimizer");
            println!("=================================================");
            println!(
                "Players: {}, tables: {}, rounds: {}, games: {}, games per player: {}",
                configuration.num_players,
                configuration.num_tables,
                configuration.num_rounds,
                configuration.num_games,
                configuration.num_attempts
            );
            println!("Runs: {}, iterations per run: {}", runs, iterations);
            println!();

            let mut optimizer = OptimizeOpponents::new(optimizer_config);
            let best = if parallel {
                optimizer.optimize_parallel(&configuration, &participants, runs, iterations)?
            } else {
                let mut bar: Option<(usize, ProgressBar)> = None;
                let best = optimizer.optimize_with_callback(
                    &configuration,
                    &participants,
                    runs,
                    iterations,
                    |progress: &RunProgress| update_bar(&mut bar, progress),
                )?;
                if let Some((_, bar)) = bar {
                    bar.finish();
                }
                best
            };

            println!();
            println!("{}", report::run_summary(optimizer.stats()));

            let Some(best) = best else {
                println!("No runs requested, nothing to save.");
                return Ok(());
            };

            print_reports(&best.schedule, Some(&participants));
            save_schedule(&best.schedule, &output)
                .with_context(|| format!("saving schedule {}", output.display()))?;
            info!(path = %output.display(), score = best.score, "best schedule saved");
        }

        Commands::Report {
            schedule,
            participants,
        } => {
            let mut loaded = load_schedule(&schedule)
                .with_context(|| format!("loading schedule {}", schedule.display()))?;
            loaded.update_games_from_slots();

            let participants = participants
                .map(|path| load_participants(&path))
                .transpose()?;

            if !loaded.is_valid() {
                for error in loaded.validation_errors() {
                    println!("invalid: {}", error);
                }
            }
            print_reports(&loaded, participants.as_ref());
        }

        Commands::Names { count, output } => {
            let participants = Participants::create(count);
            match output {
                Some(path) => save_participants(&participants, &path)
                    .with_context(|| format!("saving participants {}", path.display()))?,
                None => {
                    for person in &participants.people {
                        println!("{:>3}: {}", person.id, person.name);
                    }
                }
            }
        }
    }

    Ok(())
}

fn update_bar(bar: &mut Option<(usize, ProgressBar)>, progress: &RunProgress) {
    let needs_new = bar.as_ref().map_or(true, |(run, _)| *run != progress.run);
    if needs_new {
        if let Some((_, old)) = bar.take() {
            old.finish();
        }
        let style = ProgressStyle::with_template(
            "run {prefix} [{bar:40}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        let new_bar = ProgressBar::new(progress.total_iterations).with_style(style);
        new_bar.set_prefix((progress.run + 1).to_string());
        *bar = Some((progress.run, new_bar));
    }

    if let Some((_, bar)) = bar.as_ref() {
        bar.set_position(progress.iteration);
        bar.set_message(format!(
            "score {:.4}, accepted {}",
            progress.score, progress.accepted
        ));
    }
}

fn print_reports(schedule: &Schedule, participants: Option<&Participants>) {
    println!();
    println!("{}", report::opponents_matrix(schedule));
    println!();
    println!("{}", report::pairs_histogram(schedule));
    println!();
    println!("{}", report::seats_matrix(schedule));
    println!();
    println!("{}", report::schedule_by_rounds(schedule, participants));
}
