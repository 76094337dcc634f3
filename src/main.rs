//! Beast Blitz terminal runner (default binary).
//!
//! A line-oriented host: prints the grid and riddle, reads cell numbers from
//! stdin and reports each outcome. The session itself runs on the adapter task.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use beast_blitz::adapter::{encode_event, spawn_session, DriverConfig};
use beast_blitz::config::{parse_args, AppConfig, Command, USAGE};
use beast_blitz::core::{Session, SessionEvent};
use beast_blitz::store::{JsonFileStore, Preferences, ResultStore};
use beast_blitz::types::{DifficultyTier, Specimen};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,beast_blitz=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (command, config) = parse_args(&args, AppConfig::from_env())?;

    match command {
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        Command::Play => play(config).await,
        Command::Scores => {
            let results = ResultStore::new(Arc::new(JsonFileStore::open(config.data_path.clone())));
            for tier in DifficultyTier::ALL {
                print_leaderboard(&results, tier);
            }
            Ok(())
        }
        Command::Name(name) => {
            let prefs = Preferences::new(Arc::new(JsonFileStore::open(config.data_path.clone())));
            prefs.set_player_name(&name)?;
            println!("Player name set to {}", prefs.player_name());
            Ok(())
        }
        Command::Reset => {
            let results = ResultStore::new(Arc::new(JsonFileStore::open(config.data_path.clone())));
            results.clear_all()?;
            println!("All results cleared");
            Ok(())
        }
    }
}

async fn play(config: AppConfig) -> Result<()> {
    let seed = config.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    info!(seed, tier = config.tier.as_str(), data = %config.data_path.display(), "starting game");

    let kv = Arc::new(JsonFileStore::open(config.data_path.clone()));
    let results = ResultStore::new(Arc::clone(&kv));
    let session = Session::new(seed, kv);

    let mut handle = spawn_session(
        session,
        DriverConfig {
            tick_ms: config.tick_ms,
            ..DriverConfig::default()
        },
    );
    handle.start(config.tier).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut grid: Vec<Specimen> = Vec::new();

    loop {
        tokio::select! {
            event = handle.next_event() => {
                let Some(event) = event else { break };
                track_grid(&event, &mut grid);
                if config.json {
                    println!("{}", encode_event(&event)?);
                } else {
                    print_event(&event, config.tier);
                }
                if event.is_terminal() {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        let line = line.trim();
                        if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
                            handle.terminate().await?;
                        } else if !line.is_empty() {
                            match parse_cells(line, grid.len()) {
                                Some(cells) => handle.submit_cells(cells).await?,
                                None => {
                                    let hint =
                                        format!("Enter cell numbers between 1 and {}", grid.len());
                                    // Stdout carries only event lines in JSON mode.
                                    if config.json {
                                        eprintln!("{}", hint);
                                    } else {
                                        println!("{}", hint);
                                    }
                                }
                            }
                        }
                    }
                    None => {
                        // Keep playing until the countdown ends.
                        stdin_open = false;
                    }
                }
            }
        }
    }

    let session = handle.shutdown().await?;
    if !config.json {
        print_leaderboard(&results, session.tier());
    }
    Ok(())
}

/// Parse 1-based cell numbers separated by spaces or commas.
fn parse_cells(line: &str, grid_len: usize) -> Option<Vec<usize>> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<usize>() {
            Ok(n) if n >= 1 && n <= grid_len => Some(n - 1),
            _ => None,
        })
        .collect()
}

/// Keep the local copy of the grid current so typed cell numbers can be checked.
fn track_grid(event: &SessionEvent, grid: &mut Vec<Specimen>) {
    if let SessionEvent::GridRefreshed { specimens } = event {
        grid.clone_from(specimens);
    }
}

fn print_event(event: &SessionEvent, tier: DifficultyTier) {
    match event {
        SessionEvent::GridRefreshed { specimens } => {
            println!();
            for (row, chunk) in specimens.chunks(tier.columns()).enumerate() {
                let cells: Vec<String> = chunk
                    .iter()
                    .enumerate()
                    .map(|(col, s)| format!("{:>2} {:<10}", row * tier.columns() + col + 1, s.name))
                    .collect();
                println!("{}", cells.join(" "));
            }
        }
        SessionEvent::RiddleGenerated { riddle } => {
            println!("\n{} ({} to find)", riddle.question(), riddle.len());
        }
        SessionEvent::TimeRemainingChanged { remaining_ms } => {
            let ms = *remaining_ms;
            if ms > 0 && ms % 1000 == 0 && (ms % 5000 == 0 || ms <= 3000) {
                println!("  {}s left", ms / 1000);
            }
        }
        SessionEvent::ComboTriggered { multiplier } => {
            println!("Combo! x{:.1}", f64::from(*multiplier) / 2.0);
        }
        SessionEvent::ScoreChanged { score } => println!("Score: {}", score),
        SessionEvent::ComboStreakChanged { streak } => {
            if *streak > 0 {
                println!("Streak: {}", streak);
            }
        }
        SessionEvent::RoundCompleted {
            successful,
            correct_cells,
            correct_specimens,
        } => {
            if *successful {
                println!("Correct!");
            } else {
                let answer: Vec<String> = correct_cells
                    .iter()
                    .zip(correct_specimens)
                    .map(|(cell, s)| format!("{} {}", cell + 1, s.name))
                    .collect();
                println!("Wrong! The answer was: {}", answer.join(", "));
            }
        }
        SessionEvent::SessionTerminated {
            final_score,
            rounds_completed,
            is_high_score,
        } => {
            println!(
                "\nGame over: {} points in {} rounds",
                final_score, rounds_completed
            );
            if *is_high_score {
                println!("New high score!");
            }
        }
    }
}

fn print_leaderboard<K: beast_blitz::store::KeyValueStore>(
    results: &ResultStore<K>,
    tier: DifficultyTier,
) {
    let records = results.results_for(tier);
    println!("\n{} leaderboard", tier.label());
    if records.is_empty() {
        println!("  (no results yet)");
        return;
    }
    for (i, r) in records.iter().enumerate() {
        println!(
            "{:>3}. {:<16} {:>5}  rounds {:>3}  combo {:>2}  {}",
            i + 1,
            r.player_name,
            r.points,
            r.rounds_completed,
            r.max_combo_streak,
            r.recorded_at.format("%Y-%m-%d %H:%M")
        );
    }
}
