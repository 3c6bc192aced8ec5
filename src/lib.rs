//! Facility-location optimization with a discrete particle swarm.
//!
//! Chooses which `p` of `n` candidate sites to open so that customers,
//! each served by its best open site, optimize an aggregated cost measure:
//!
//! - **Problem** ([`problem`]): cost matrix, problem type
//!   (`<objective> <aggregate> <measure>`, e.g. "minimize max star") and
//!   evaluation of any facility set.
//! - **NDPSO** ([`pso`]): a discrete particle swarm that searches over
//!   facility sets with probability-gated one-facility exchanges.
//!
//! # Example
//!
//! ```
//! use u_facility::problem::{Aggregate, CostMatrix, Measure, Objective, ProblemSpec};
//! use u_facility::pso::PsoConfig;
//!
//! let costs = CostMatrix::from_int_rows(vec![
//!     vec![0, 1, 2, 3, 4],
//!     vec![1, 0, 2, 3, 3],
//!     vec![2, 2, 0, 4, 2],
//!     vec![3, 3, 4, 0, 1],
//!     vec![4, 3, 2, 1, 0],
//! ]).unwrap();
//! let spec = ProblemSpec::new(Objective::Minimize, Aggregate::Max, Measure::Star, costs, 2).unwrap();
//!
//! assert_eq!(u_facility::evaluate(&spec, &[0, 4]).unwrap(), 3.0);
//!
//! let result = u_facility::optimize(&spec, &PsoConfig::default().with_seed(1)).unwrap();
//! assert_eq!(result.best_fitness, 3.0);
//! ```
//!
//! # Architecture
//!
//! The core performs no I/O. Loading problem data, timing and reporting
//! belong to callers; the `wasm` feature exposes [`optimize`] and
//! [`evaluate`] to JavaScript.

pub mod error;
pub mod problem;
pub mod pso;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::FacilityError;

use problem::ProblemSpec;
use pso::{PsoConfig, PsoResult, PsoRunner};

/// Searches for the best facility placement of `spec`.
///
/// Deterministic when `config.seed` is set.
pub fn optimize(spec: &ProblemSpec, config: &PsoConfig) -> Result<PsoResult, FacilityError> {
    PsoRunner::run(spec, config)
}

/// Fitness of an arbitrary facility set, without any optimizer state.
pub fn evaluate(spec: &ProblemSpec, facilities: &[usize]) -> Result<f64, FacilityError> {
    spec.evaluate(facilities)
}
