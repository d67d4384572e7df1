//! collision-runner: measures nickname collision rates for every engine strategy.
//!
//! Usage:
//!   collision-runner [WORDLIST]
//!   collision-runner --wordlist words.txt --config experiment.json --seed 12345
//!   collision-runner --population 100000 --tries 500000 --json

use anyhow::{anyhow, Result};
use nickcollide_core::{
    config::ExperimentConfig,
    error::ExperimentError,
    runner::{run_concurrent, SeedMode, StrategyReport},
    word_catalog::WordCatalog,
};
use std::env;
use std::process;

const DEFAULT_WORDLIST: &str = "./data/wordlist.txt";

/// Exit status when the word list cannot be opened.
const EXIT_RESOURCE_UNAVAILABLE: i32 = 2;

#[derive(serde::Serialize)]
struct RunSummary<'a> {
    started_at: String,
    wordlist: &'a str,
    seed: Option<u64>,
    config: &'a ExperimentConfig,
    reports: &'a [StrategyReport],
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let wordlist = args
        .get(1)
        .filter(|a| !a.starts_with("--"))
        .map(String::as_str)
        .or_else(|| flag_value(&args, "--wordlist"))
        .unwrap_or(DEFAULT_WORDLIST);
    let seed = parse_seed(&args)?;
    let json = args.iter().any(|a| a == "--json");

    let mut config = match flag_value(&args, "--config") {
        Some(path) => ExperimentConfig::load(path)?,
        None => ExperimentConfig::default(),
    };
    config.initial_population = parse_arg(&args, "--population", config.initial_population);
    config.num_tries = parse_arg(&args, "--tries", config.num_tries);
    config.validate()?;

    let started_at = chrono::Utc::now();
    log::info!(
        "collision-runner started at {}: population={} tries={} seed={}",
        started_at.to_rfc3339(),
        config.initial_population,
        config.num_tries,
        seed.map_or_else(|| "entropy".to_string(), |s| s.to_string())
    );

    let catalog = match WordCatalog::load(wordlist, config.max_nickname_len) {
        Ok(catalog) => catalog,
        Err(e) if e.is_resource_unavailable() => {
            log::error!("{e}");
            process::exit(EXIT_RESOURCE_UNAVAILABLE);
        }
        Err(e) => return Err(e.into()),
    };
    log::info!("{}", catalog.describe());

    let seed_mode = seed.map_or(SeedMode::Entropy, SeedMode::Fixed);
    let reports = run_concurrent(&catalog, &config, seed_mode).map_err(|e: ExperimentError| {
        log::error!("experiment failed: {e}");
        e
    })?;

    for report in &reports {
        log::info!("{}", report.summary_line());
    }

    if json {
        let summary = RunSummary {
            started_at: started_at.to_rfc3339(),
            wordlist,
            seed,
            config: &config,
            reports: &reports,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    flag_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// `--seed` must be a `u64` when given; a bad value never falls back to entropy.
fn parse_seed(args: &[String]) -> Result<Option<u64>> {
    if !args.iter().any(|a| a == "--seed") {
        return Ok(None);
    }
    let raw = flag_value(args, "--seed").ok_or_else(|| anyhow!("--seed needs a value"))?;
    let seed = raw
        .parse()
        .map_err(|e| anyhow!("invalid --seed {raw:?}: {e}"))?;
    Ok(Some(seed))
}
