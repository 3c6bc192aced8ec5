//! JavaScript bindings.
//!
//! Problems, configs and results are plain camelCase objects; enum names
//! are lowercase strings:
//!
//! ```js
//! const problem = {
//!   objective: "minimize", aggregate: "max", measure: "star",
//!   costs: [[0, 1], [1, 0]], numFacilities: 1,
//! };
//! const result = optimize(problem, { swarmSize: 20, maxIterations: 50, seed: 42 });
//! console.log(result.best, result.bestFitness);
//! ```

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::error::FacilityError;
use crate::problem::{CostMatrix, ProblemSpec};
use crate::pso::{PsoConfig, PsoResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProblemInput {
    objective: String,
    aggregate: String,
    measure: String,
    costs: Vec<Vec<f64>>,
    num_facilities: usize,
}

impl ProblemInput {
    fn into_spec(self) -> Result<ProblemSpec, FacilityError> {
        ProblemSpec::from_names(
            &self.objective,
            &self.aggregate,
            &self.measure,
            CostMatrix::from_rows(self.costs)?,
            self.num_facilities,
        )
    }
}

/// Partial run configuration; absent fields keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ConfigInput {
    swarm_size: Option<usize>,
    max_iterations: Option<usize>,
    inertia: Option<f64>,
    cognitive: Option<f64>,
    social: Option<f64>,
    inertial_discount: Option<f64>,
    seed: Option<u64>,
}

impl ConfigInput {
    fn into_config(self) -> PsoConfig {
        let defaults = PsoConfig::default();
        PsoConfig {
            swarm_size: self.swarm_size.unwrap_or(defaults.swarm_size),
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            inertia: self.inertia.unwrap_or(defaults.inertia),
            cognitive: self.cognitive.unwrap_or(defaults.cognitive),
            social: self.social.unwrap_or(defaults.social),
            inertial_discount: self.inertial_discount.unwrap_or(defaults.inertial_discount),
            seed: self.seed.or(defaults.seed),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultOutput {
    best: Vec<usize>,
    best_fitness: f64,
    assignments: Vec<usize>,
    iterations: usize,
    best_iteration: usize,
    cancelled: bool,
    fitness_history: Vec<f64>,
}

impl From<PsoResult> for ResultOutput {
    fn from(result: PsoResult) -> Self {
        Self {
            best: result.best,
            best_fitness: result.best_fitness,
            assignments: result.assignments,
            iterations: result.iterations,
            best_iteration: result.best_iteration,
            cancelled: result.cancelled,
            fitness_history: result.fitness_history,
        }
    }
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_problem(problem: JsValue) -> Result<ProblemSpec, JsValue> {
    let input: ProblemInput = serde_wasm_bindgen::from_value(problem).map_err(js_error)?;
    input.into_spec().map_err(js_error)
}

/// Runs NDPSO and returns `{ best, bestFitness, assignments, iterations,
/// bestIteration, cancelled, fitnessHistory }`.
///
/// `config` may be `undefined`, `null` or a partial object with any of
/// `swarmSize`, `maxIterations`, `inertia`, `cognitive`, `social`,
/// `inertialDiscount`, `seed`.
#[wasm_bindgen]
pub fn optimize(problem: JsValue, config: JsValue) -> Result<JsValue, JsValue> {
    let spec = parse_problem(problem)?;
    let config = if config.is_undefined() || config.is_null() {
        PsoConfig::default()
    } else {
        serde_wasm_bindgen::from_value::<ConfigInput>(config)
            .map_err(js_error)?
            .into_config()
    };
    let result = crate::optimize(&spec, &config).map_err(js_error)?;
    serde_wasm_bindgen::to_value(&ResultOutput::from(result)).map_err(js_error)
}

/// Fitness of a facility set.
#[wasm_bindgen]
pub fn evaluate(problem: JsValue, facilities: Vec<u32>) -> Result<f64, JsValue> {
    let spec = parse_problem(problem)?;
    let facilities: Vec<usize> = facilities.into_iter().map(|f| f as usize).collect();
    crate::evaluate(&spec, &facilities).map_err(js_error)
}
