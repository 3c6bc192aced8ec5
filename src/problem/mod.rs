//! Facility-location objective.
//!
//! A problem is a customer-by-facility cost matrix, a number of facilities
//! to open, and a problem type `<objective> <aggregate> <measure>`.
//! Evaluating a facility set assigns every customer to its best open
//! facility, computes one measure per facility, and aggregates those
//! measures into a single fitness.
//!
//! # Key Types
//!
//! - [`ProblemSpec`]: problem data, evaluation and the `compare` rule
//! - [`CostMatrix`]: validated `[customer][facility]` cost table
//! - [`Objective`], [`Aggregate`], [`Measure`]: the problem type
//! - [`FacilityMeasure`]: extension point for per-facility measures
//!
//! # References
//!
//! - Daskin (2013), *Network and Discrete Location: Models, Algorithms,
//!   and Applications*, 2nd ed.

mod matrix;
mod measure;
mod spec;
mod types;

pub use matrix::CostMatrix;
pub use measure::{FacilityMeasure, Measures, StarMeasure};
pub use spec::ProblemSpec;
pub use types::{Aggregate, Measure, Objective};
