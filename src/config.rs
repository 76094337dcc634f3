//! Binary configuration: environment defaults plus command-line overrides.

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::types::{DifficultyTier, TICK_MS};

pub const DEFAULT_DATA_PATH: &str = "beast-blitz-data.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub tier: DifficultyTier,
    /// Fixed seed for a reproducible game; random when unset.
    pub seed: Option<u64>,
    pub data_path: PathBuf,
    pub tick_ms: u32,
    /// Print events as JSON lines instead of text.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tier: DifficultyTier::Novice,
            seed: None,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            tick_ms: TICK_MS,
            json: false,
        }
    }
}

impl AppConfig {
    /// Read `BEAST_BLITZ_*` variables. Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let tier = var("BEAST_BLITZ_TIER")
            .and_then(|s| DifficultyTier::from_str(s.trim()))
            .unwrap_or(defaults.tier);

        let seed = var("BEAST_BLITZ_SEED").and_then(|s| s.trim().parse().ok());

        let data_path = var("BEAST_BLITZ_DATA")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) })
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);

        let tick_ms = var("BEAST_BLITZ_TICK_MS")
            .and_then(|s| s.trim().parse().ok())
            .filter(|&ms: &u32| ms > 0)
            .unwrap_or(defaults.tick_ms);

        Self {
            tier,
            seed,
            data_path,
            tick_ms,
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Play one game in the terminal.
    Play,
    /// Print both leaderboards.
    Scores,
    /// Store the player name used for new results.
    Name(String),
    /// Clear all archived results.
    Reset,
    Help,
}

pub const USAGE: &str = "\
usage: beast-blitz [COMMAND]

commands:
  play [--tier novice|veteran] [--seed N] [--data PATH] [--json]
                 play one game (default)
  scores [--data PATH]
                 show the leaderboards
  name NAME [--data PATH]
                 set the player name
  reset [--data PATH]
                 clear all results
  help           show this message";

/// Parse command-line arguments (program name excluded) on top of `config`.
pub fn parse_args(args: &[String], mut config: AppConfig) -> Result<(Command, AppConfig)> {
    let (command, rest) = match args.first().map(String::as_str) {
        None => (Command::Play, &args[..0]),
        Some("play") => (Command::Play, &args[1..]),
        Some("scores") => (Command::Scores, &args[1..]),
        Some("reset") => (Command::Reset, &args[1..]),
        Some("help") | Some("--help") | Some("-h") => return Ok((Command::Help, config)),
        Some("name") => {
            let name = args
                .get(1)
                .filter(|n| !n.starts_with("--"))
                .ok_or_else(|| anyhow!("name: missing NAME"))?;
            (Command::Name(name.clone()), &args[2..])
        }
        Some(flag) if flag.starts_with("--") => (Command::Play, args),
        Some(other) => return Err(anyhow!("unknown command: {}", other)),
    };

    let play = command == Command::Play;
    let mut i = 0usize;
    while i < rest.len() {
        match rest[i].as_str() {
            "--data" => {
                i += 1;
                let v = rest
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --data"))?;
                config.data_path = PathBuf::from(v);
            }
            "--tier" if play => {
                i += 1;
                let v = rest
                    .get(i)
                    .ok_or_else(|| anyhow!("play: missing value for --tier"))?;
                config.tier = DifficultyTier::from_str(v)
                    .ok_or_else(|| anyhow!("play: invalid --tier value: {}", v))?;
            }
            "--seed" if play => {
                i += 1;
                let v = rest
                    .get(i)
                    .ok_or_else(|| anyhow!("play: missing value for --seed"))?;
                config.seed = Some(
                    v.parse::<u64>()
                        .map_err(|_| anyhow!("play: invalid --seed value: {}", v))?,
                );
            }
            "--json" if play => config.json = true,
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }

    Ok((command, config))
}
