//! Runs every strategy against one shared catalog and collects results
//! in the fixed `Strategy::ALL` order.

use std::thread;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::ExperimentConfig;
use crate::error::{ExperimentError, ExperimentResult};
use crate::experiment::{CollisionExperiment, CollisionResult, Strategy};
use crate::rng::{FixedSeed, OsEntropy, SeedSource};
use crate::word_catalog::WordCatalog;

/// How each strategy obtains its engine seeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedMode {
    /// Operating-system entropy for every seed.
    Entropy,
    /// Reproducible streams derived from one master seed.
    Fixed(u64),
}

impl SeedMode {
    pub fn source_for(&self, strategy: Strategy) -> Box<dyn SeedSource> {
        match *self {
            Self::Entropy => Box::new(OsEntropy),
            Self::Fixed(master_seed) => Box::new(FixedSeed::new(master_seed, strategy.slot())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyReport {
    pub label: String,
    pub strategy: Strategy,
    pub result: CollisionResult,
    pub elapsed_ms: i64,
}

impl StrategyReport {
    pub fn summary_line(&self) -> String {
        format!(
            "[{}] collision rate = {}% ({}/{})",
            self.label,
            self.result.collision_rate_percent,
            self.result.num_collisions,
            self.result.num_tries
        )
    }
}

/// Run one strategy to completion on the calling thread.
pub fn run_strategy(
    strategy: Strategy,
    catalog: &WordCatalog,
    config: &ExperimentConfig,
    seed_mode: SeedMode,
) -> ExperimentResult<StrategyReport> {
    let started = Utc::now();
    let experiment =
        CollisionExperiment::new(strategy, catalog, config, seed_mode.source_for(strategy))?;
    let result = experiment.run()?;
    let elapsed_ms = (Utc::now() - started).num_milliseconds();
    log::info!(
        "strategy={} done: {} collisions in {} tries ({elapsed_ms} ms)",
        strategy.label(),
        result.num_collisions,
        result.num_tries
    );
    Ok(StrategyReport {
        label: strategy.label().to_string(),
        strategy,
        result,
        elapsed_ms,
    })
}

/// Run all four strategies on their own threads and wait for every one.
///
/// Reports come back in `Strategy::ALL` order regardless of which thread
/// finishes first. If any strategy fails, the first failure in that
/// order is returned.
pub fn run_concurrent(
    catalog: &WordCatalog,
    config: &ExperimentConfig,
    seed_mode: SeedMode,
) -> ExperimentResult<Vec<StrategyReport>> {
    let outcomes: Vec<ExperimentResult<StrategyReport>> = thread::scope(|scope| {
        let handles: Vec<_> = Strategy::ALL
            .iter()
            .map(|&strategy| {
                let handle = scope.spawn(move || run_strategy(strategy, catalog, config, seed_mode));
                (strategy, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(strategy, handle)| {
                handle.join().unwrap_or_else(|_| {
                    log::error!("strategy={} worker panicked", strategy.label());
                    Err(ExperimentError::WorkerPanicked {
                        label: strategy.label(),
                    })
                })
            })
            .collect()
    });

    outcomes.into_iter().collect()
}

/// Run all four strategies one after another on the calling thread.
pub fn run_sequential(
    catalog: &WordCatalog,
    config: &ExperimentConfig,
    seed_mode: SeedMode,
) -> ExperimentResult<Vec<StrategyReport>> {
    Strategy::ALL
        .iter()
        .map(|&strategy| run_strategy(strategy, catalog, config, seed_mode))
        .collect()
}
