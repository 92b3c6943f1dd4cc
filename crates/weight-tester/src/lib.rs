//! Randomized conformance testing for semiring weights.
//!
//! [`WeightGenerator`] produces a reproducible stream of random weights for
//! any kind implementing [`RandomWeight`], and [`WeightTester`] checks the
//! laws each kind declares on that stream.
//!
//! # Example
//!
//! ```
//! use weight_tester::WeightTester;
//! use weight_types::{TextFormat, TropicalWeight};
//!
//! WeightTester::<TropicalWeight>::new(403)
//!     .with_format(TextFormat::with_parentheses())
//!     .test(100)
//!     .unwrap();
//! ```
//!
//! A run's seed, iteration count and text format come from [`TesterConfig`],
//! which the `WEIGHT_TEST_SEED`, `WEIGHT_TEST_REPEAT` and
//! `WEIGHT_TEST_PARENTHESES` environment variables override.

mod config;
mod generate;
mod tester;

pub use config::{ConfigError, TesterConfig, PARENTHESES_VAR, REPEAT_VAR, SEED_VAR};
pub use generate::{GenerateOptions, RandomWeight, WeightGenerator};
pub use tester::{ConformanceError, Result, WeightTester};
