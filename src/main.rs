//! Headless match-3 simulator (default binary).
//!
//! Plays a seeded session by always taking the engine's hint move and prints one JSON
//! object per turn on stdout, followed by a summary line. Diagnostics go to stderr through
//! `tracing`; set `RUST_LOG=debug` to see every cascade and shuffle round.
//!
//! Usage: `match3-sim [--seed N] [--turns N] [--config path.json]`
//!
//! Without `--config`, dimensions and budgets come from `MATCH3_*` environment variables.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use match3::core::{EngineConfig, Session, SimpleRng, SwapOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
struct SimArgs {
    seed: u32,
    turns: u32,
    config_path: Option<PathBuf>,
}

impl Default for SimArgs {
    fn default() -> Self {
        Self {
            seed: 1,
            turns: 20,
            config_path: None,
        }
    }
}

fn parse_args(args: &[String]) -> Result<SimArgs> {
    let mut out = SimArgs::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --seed"))?;
                out.seed = v
                    .parse()
                    .map_err(|_| anyhow!("invalid --seed value: {}", v))?;
            }
            "--turns" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --turns"))?;
                out.turns = v
                    .parse()
                    .map_err(|_| anyhow!("invalid --turns value: {}", v))?;
            }
            "--config" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --config"))?;
                out.config_path = Some(PathBuf::from(v));
            }
            other => bail!("unknown argument: {}", other),
        }
        i += 1;
    }
    Ok(out)
}

fn load_config(args: &SimArgs) -> Result<EngineConfig> {
    match &args.config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            Ok(EngineConfig::from_json(&text)?)
        }
        None => {
            let config = EngineConfig::from_env();
            config.validate()?;
            Ok(config)
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&argv)?;
    let config = load_config(&args)?;

    run(&args, config)
}

fn run(args: &SimArgs, config: EngineConfig) -> Result<()> {
    let mut session = Session::new(config, SimpleRng::new(args.seed))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for turn in 0..args.turns {
        let swap = session
            .hint()
            .ok_or_else(|| anyhow!("settled grid has no move at turn {}", turn))?;
        let outcome = session.try_swap(swap.a, swap.b)?;
        if let SwapOutcome::Rejected { swap } = outcome {
            bail!("hint {:?} did not match at turn {}", swap, turn);
        }

        let line = json!({
            "turn": turn,
            "result": outcome,
            "collected": session.collected(),
            "board_hash": session.snapshot().board_hash,
        });
        writeln!(out, "{}", line)?;
    }

    let summary = json!({
        "seed": args.seed,
        "turns": session.turns(),
        "collected": session.collected(),
        "final": session.snapshot(),
    });
    writeln!(out, "{}", summary)?;

    info!(
        seed = args.seed,
        turns = session.turns(),
        collected = session.collected(),
        "simulation finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(s: &[&str]) -> Vec<String> {
        s.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn parse_args_defaults() {
        assert_eq!(parse_args(&[]).unwrap(), SimArgs::default());
    }

    #[test]
    fn parse_args_reads_flags() {
        let args = parse_args(&argv(&["--seed", "9", "--turns", "3", "--config", "c.json"]))
            .unwrap();
        assert_eq!(args.seed, 9);
        assert_eq!(args.turns, 3);
        assert_eq!(args.config_path, Some(PathBuf::from("c.json")));
    }

    #[test]
    fn parse_args_rejects_garbage() {
        assert!(parse_args(&argv(&["--seed"])).is_err());
        assert!(parse_args(&argv(&["--turns", "x"])).is_err());
        assert!(parse_args(&argv(&["--frobnicate"])).is_err());
    }
}
