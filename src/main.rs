//! wizardiuz - elemental staves for a voxel sandbox
//!
//! Headless session runner: replays a scripted staff session against an
//! in-memory world and reports what every staff use did.

mod config;
mod session;
mod session_script;

use anyhow::{Context, Result};
use config::{RunnerConfig, DEFAULT_CONFIG_PATH};
use session::Session;
use session_script::SessionScript;
use std::{env, path::PathBuf};
use tracing::info;

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting wizardiuz v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut config = RunnerConfig::load_from_path(&config_path);
    if let Some(seed) = cli.seed {
        config.rng_seed = seed;
    }
    if let Some(path) = cli.event_log.clone() {
        config.event_log = Some(path);
    }
    if cli.plain {
        config.plain_feedback = true;
    }

    if let Some(path) = &cli.write_config {
        config.save_to_path(path)?;
        info!("Wrote effective config to {}", path.display());
    }

    let Some(script_path) = cli.script else {
        if cli.write_config.is_some() {
            return Ok(());
        }
        anyhow::bail!(
            "usage: wizardiuz --script <session.json> [--config <file>] [--seed <n>] \
             [--event-log <file>] [--plain] [--write-config <file>]"
        );
    };

    let script = SessionScript::from_path(&script_path)
        .with_context(|| format!("Failed to load session script {}", script_path.display()))?;
    info!(last_tick = ?script.last_tick(), "Session script loaded");
    let mut session = Session::new(&config)?;
    let summary = session.run(script, config.max_ticks)?;

    let action_bar = session
        .world()
        .player_data(session.player())
        .and_then(|player| player.action_bar.clone());
    info!(?summary, ?action_bar, "session finished");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[derive(Debug, Default)]
struct CliOptions {
    config: Option<PathBuf>,
    script: Option<PathBuf>,
    seed: Option<u64>,
    event_log: Option<PathBuf>,
    plain: bool,
    write_config: Option<PathBuf>,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    if let Some(path) = args.next() {
                        opts.config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--config requires a file path");
                    }
                }
                "--script" => {
                    if let Some(path) = args.next() {
                        opts.script = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--script requires a file path");
                    }
                }
                "--seed" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u64>() {
                            Ok(value) => opts.seed = Some(value),
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--seed must be an integer");
                            }
                        }
                    } else {
                        tracing::error!("--seed requires an integer");
                    }
                }
                "--event-log" => {
                    if let Some(path) = args.next() {
                        opts.event_log = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--event-log requires a file path");
                    }
                }
                "--plain" => opts.plain = true,
                "--write-config" => {
                    if let Some(path) = args.next() {
                        opts.write_config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--write-config requires a file path");
                    }
                }
                other => tracing::warn!(arg = other, "Ignoring unknown argument"),
            }
        }

        opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliOptions {
        CliOptions::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_all_flags() {
        let opts = parse(&[
            "--config",
            "cfg.toml",
            "--script",
            "run.json",
            "--seed",
            "99",
            "--event-log",
            "out.jsonl",
            "--plain",
            "--write-config",
            "saved.toml",
        ]);
        assert_eq!(opts.config, Some(PathBuf::from("cfg.toml")));
        assert_eq!(opts.script, Some(PathBuf::from("run.json")));
        assert_eq!(opts.seed, Some(99));
        assert_eq!(opts.event_log, Some(PathBuf::from("out.jsonl")));
        assert!(opts.plain);
        assert_eq!(opts.write_config, Some(PathBuf::from("saved.toml")));
    }

    #[test]
    fn bad_seed_is_dropped() {
        let opts = parse(&["--seed", "lots"]);
        assert_eq!(opts.seed, None);
    }

    #[test]
    fn missing_values_leave_options_unset() {
        let opts = parse(&["--script"]);
        assert!(opts.script.is_none());
        assert!(!opts.plain);
    }
}
