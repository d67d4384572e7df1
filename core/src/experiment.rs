//! Collision measurement for a single engine strategy.
//!
//! PHASES (forward only):
//!   1. BuildingPopulation: fill a set with unique nicknames.
//!   2. Measuring:          generate more, count those already in the set.
//!   3. Done:               result is final.
//!
//! The strategy decides where the engine comes from. `Reuse` seeds one
//! engine and keeps it for the whole run; `Recreate` pulls a new seed
//! and builds a new engine for every nickname.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::ExperimentConfig;
use crate::error::{ExperimentError, ExperimentResult};
use crate::name_generator::NicknameGenerator;
use crate::rng::{Engine, EngineWidth, SeedSource};
use crate::word_catalog::WordCatalog;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lifecycle {
    Reuse,
    Recreate,
}

impl Lifecycle {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reuse => "REUSE",
            Self::Recreate => "RECREATE",
        }
    }
}

/// One engine width paired with one engine lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Strategy {
    pub lifecycle: Lifecycle,
    pub width: EngineWidth,
}

impl Strategy {
    /// All strategies, in report order.
    /// NEVER reorder: the index doubles as the fixed-seed slot.
    pub const ALL: [Strategy; 4] = [
        Strategy { lifecycle: Lifecycle::Reuse, width: EngineWidth::Bits32 },
        Strategy { lifecycle: Lifecycle::Reuse, width: EngineWidth::Bits64 },
        Strategy { lifecycle: Lifecycle::Recreate, width: EngineWidth::Bits32 },
        Strategy { lifecycle: Lifecycle::Recreate, width: EngineWidth::Bits64 },
    ];

    pub fn label(&self) -> &'static str {
        match (self.lifecycle, self.width) {
            (Lifecycle::Reuse, EngineWidth::Bits32) => "REUSE/32BIT",
            (Lifecycle::Reuse, EngineWidth::Bits64) => "REUSE/64BIT",
            (Lifecycle::Recreate, EngineWidth::Bits32) => "RECREATE/32BIT",
            (Lifecycle::Recreate, EngineWidth::Bits64) => "RECREATE/64BIT",
        }
    }

    /// Stable slot used to derive this strategy's fixed seed stream.
    pub fn slot(&self) -> u64 {
        match (self.lifecycle, self.width) {
            (Lifecycle::Reuse, EngineWidth::Bits32) => 0,
            (Lifecycle::Reuse, EngineWidth::Bits64) => 1,
            (Lifecycle::Recreate, EngineWidth::Bits32) => 2,
            (Lifecycle::Recreate, EngineWidth::Bits64) => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    BuildingPopulation,
    Measuring,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollisionResult {
    pub num_tries: u64,
    pub num_collisions: u64,
    pub collision_rate_percent: f64,
}

impl CollisionResult {
    pub fn new(num_tries: u64, num_collisions: u64) -> Self {
        let collision_rate_percent = if num_tries == 0 {
            0.0
        } else {
            100.0 * num_collisions as f64 / num_tries as f64
        };
        Self {
            num_tries,
            num_collisions,
            collision_rate_percent,
        }
    }
}

pub struct CollisionExperiment<'a, S: SeedSource> {
    strategy: Strategy,
    config: &'a ExperimentConfig,
    generator: NicknameGenerator<'a>,
    seeds: S,
    engine: Option<Engine>,
    population: HashSet<String>,
    phase: Phase,
    /// Generation calls spent filling the population, duplicates included.
    population_attempts: u64,
    result: Option<CollisionResult>,
}

impl<'a, S: SeedSource> CollisionExperiment<'a, S> {
    pub fn new(
        strategy: Strategy,
        catalog: &'a WordCatalog,
        config: &'a ExperimentConfig,
        seeds: S,
    ) -> ExperimentResult<Self> {
        Ok(Self {
            strategy,
            config,
            generator: NicknameGenerator::from_config(catalog, config)?,
            seeds,
            engine: None,
            population: HashSet::with_capacity(config.initial_population),
            phase: Phase::BuildingPopulation,
            population_attempts: 0,
            result: None,
        })
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn population(&self) -> &HashSet<String> {
        &self.population
    }

    pub fn population_attempts(&self) -> u64 {
        self.population_attempts
    }

    pub fn result(&self) -> Option<CollisionResult> {
        self.result
    }

    /// Drive every phase in order and return the final result.
    pub fn run(mut self) -> ExperimentResult<CollisionResult> {
        self.build_population()?;
        self.measure()
    }

    /// Fill the population up to `initial_population` unique nicknames.
    /// Duplicates are dropped and not counted as collisions.
    pub fn build_population(&mut self) -> ExperimentResult<()> {
        self.expect_phase(Phase::BuildingPopulation)?;
        let label = self.strategy.label();
        let target = self.config.initial_population;
        log::info!("strategy={label} population: building {target} nicknames");

        while self.population.len() < target {
            let nickname = self.next_nickname()?;
            self.population_attempts += 1;
            self.population.insert(nickname);
            if self.progress_due(self.population_attempts) {
                log::debug!(
                    "strategy={label} population: {}/{target} unique after {} attempts",
                    self.population.len(),
                    self.population_attempts
                );
            }
        }

        log::debug!(
            "strategy={label} population: complete after {} attempts",
            self.population_attempts
        );
        self.phase = Phase::Measuring;
        Ok(())
    }

    /// Run the trials against the finished population.
    pub fn measure(&mut self) -> ExperimentResult<CollisionResult> {
        self.expect_phase(Phase::Measuring)?;
        let label = self.strategy.label();
        let num_tries = self.config.num_tries;
        log::info!("strategy={label} measuring: {num_tries} tries");

        let mut num_collisions = 0u64;
        for i in 0..num_tries {
            let nickname = self.next_nickname()?;
            if self.population.contains(&nickname) {
                num_collisions += 1;
            }
            if self.progress_due(i + 1) {
                log::debug!(
                    "strategy={label} measuring: {}/{num_tries} tries, {num_collisions} collisions",
                    i + 1
                );
            }
        }

        let result = CollisionResult::new(num_tries, num_collisions);
        self.result = Some(result);
        self.phase = Phase::Done;
        Ok(result)
    }

    fn next_nickname(&mut self) -> ExperimentResult<String> {
        if self.strategy.lifecycle == Lifecycle::Recreate {
            self.engine = None;
        }
        let engine = match self.engine.take() {
            Some(engine) => engine,
            None => Engine::seeded(self.strategy.width, self.seeds.next_seed()?),
        };
        let engine = self.engine.insert(engine);
        self.generator.generate(engine)
    }

    fn expect_phase(&self, expected: Phase) -> ExperimentResult<()> {
        if self.phase != expected {
            return Err(ExperimentError::InvalidPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    fn progress_due(&self, count: u64) -> bool {
        let interval = self.config.progress_interval;
        interval > 0 && count % interval == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::FixedSeed;

    /// Counts how many seeds the experiment asked for.
    struct CountingSeeds {
        inner: FixedSeed,
        draws: u64,
    }

    impl SeedSource for CountingSeeds {
        fn next_seed(&mut self) -> ExperimentResult<u64> {
            self.draws += 1;
            self.inner.next_seed()
        }
    }

    fn catalog() -> WordCatalog {
        WordCatalog::from_words(
            ["cat", "dog", "owl", "ant", "bird", "fish", "frog", "horse", "tiger", "zebra"],
            12,
        )
    }

    fn small_config() -> ExperimentConfig {
        ExperimentConfig {
            initial_population: 200,
            num_tries: 300,
            ..ExperimentConfig::default_test()
        }
    }

    #[test]
    fn labels_follow_report_order() {
        let labels: Vec<&str> = Strategy::ALL.iter().map(Strategy::label).collect();
        assert_eq!(labels, ["REUSE/32BIT", "REUSE/64BIT", "RECREATE/32BIT", "RECREATE/64BIT"]);
        for (i, strategy) in Strategy::ALL.iter().enumerate() {
            assert_eq!(strategy.slot(), i as u64);
            assert_eq!(
                strategy.label(),
                format!("{}/{}", strategy.lifecycle.name(), strategy.width.name())
            );
        }
    }

    #[test]
    fn rate_is_exact_percentage() {
        let result = CollisionResult::new(400, 3);
        assert_eq!(result.collision_rate_percent, 100.0 * 3.0 / 400.0);
        assert_eq!(CollisionResult::new(0, 0).collision_rate_percent, 0.0);
    }

    #[test]
    fn reuse_draws_one_seed_for_the_whole_run() {
        let catalog = catalog();
        let config = small_config();
        let seeds = CountingSeeds { inner: FixedSeed::new(1, 0), draws: 0 };
        let mut exp = CollisionExperiment::new(Strategy::ALL[0], &catalog, &config, seeds).unwrap();
        exp.build_population().unwrap();
        exp.measure().unwrap();
        assert_eq!(exp.seeds.draws, 1);
    }

    #[test]
    fn recreate_draws_one_seed_per_nickname() {
        let catalog = catalog();
        let config = small_config();
        let seeds = CountingSeeds { inner: FixedSeed::new(1, 2), draws: 0 };
        let mut exp = CollisionExperiment::new(Strategy::ALL[2], &catalog, &config, seeds).unwrap();
        exp.build_population().unwrap();
        let attempts = exp.population_attempts();
        exp.measure().unwrap();
        assert_eq!(exp.seeds.draws, attempts + config.num_tries);
    }

    #[test]
    fn phases_only_move_forward() {
        let catalog = catalog();
        let config = small_config();
        let mut exp =
            CollisionExperiment::new(Strategy::ALL[1], &catalog, &config, FixedSeed::new(5, 1))
                .unwrap();
        assert_eq!(exp.phase(), Phase::BuildingPopulation);
        assert!(matches!(
            exp.measure(),
            Err(ExperimentError::InvalidPhase {
                expected: Phase::Measuring,
                actual: Phase::BuildingPopulation
            })
        ));

        exp.build_population().unwrap();
        assert_eq!(exp.phase(), Phase::Measuring);
        assert!(exp.build_population().is_err());

        let result = exp.measure().unwrap();
        assert_eq!(exp.phase(), Phase::Done);
        assert_eq!(exp.result(), Some(result));
        assert!(exp.measure().is_err());
    }

    #[test]
    fn inverted_length_bounds_fail_before_running() {
        let catalog = catalog();
        let mut config = small_config();
        config.nickname.min_len = 10;
        config.nickname.max_len = 8;
        let built = CollisionExperiment::new(Strategy::ALL[0], &catalog, &config, FixedSeed::new(1, 0));
        assert!(matches!(built, Err(ExperimentError::InvalidConfig { .. })));
    }
}
