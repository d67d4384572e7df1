//! Collision-rate experiment for randomized nickname generation.
//!
//! DATA FLOW:
//!   WordCatalog -> sample_word -> mangle_word -> NicknameGenerator
//!     -> CollisionExperiment (one per strategy) -> runner -> reports

pub mod config;
pub mod error;
pub mod experiment;
pub mod name_generator;
pub mod rng;
pub mod runner;
pub mod sampling;
pub mod word_catalog;
