//! NDPSO execution loop.
//!
//! # Algorithm
//!
//! 1. Create `swarm_size` particles at random positions; the best of them
//!    is the first global best and the first overall best
//! 2. At each iteration:
//!    a. Discount inertia
//!    b. Update every particle against the previous global best
//!    c. Recompute the global best over the refreshed swarm
//!    d. Replace the overall best if the global best is strictly better
//! 3. Stop after `max_iterations`, or earlier if cancelled

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::PsoConfig;
use super::particle::{Candidate, Rates};
use super::swarm::Swarm;
use crate::error::FacilityError;
use crate::problem::ProblemSpec;

/// Result of an NDPSO run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PsoResult {
    /// Open facilities of the best placement found.
    pub best: Vec<usize>,

    /// Fitness of `best`.
    pub best_fitness: f64,

    /// Facility serving each customer under `best`.
    pub assignments: Vec<usize>,

    /// Number of iterations executed.
    pub iterations: usize,

    /// Iteration at which `best` was found (0 = initial swarm).
    pub best_iteration: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Overall best fitness after initialization and after each iteration.
    pub fitness_history: Vec<f64>,
}

/// Receives progress notifications during a run.
pub trait SwarmObserver {
    /// Called after every iteration with the overall best so far.
    fn on_iteration(&mut self, iteration: usize, best: &Candidate);
}

impl<F> SwarmObserver for F
where
    F: FnMut(usize, &Candidate),
{
    fn on_iteration(&mut self, iteration: usize, best: &Candidate) {
        self(iteration, best)
    }
}

/// Executes the discrete particle swarm optimizer.
///
/// # Usage
///
/// ```
/// use u_facility::problem::{Aggregate, CostMatrix, Measure, Objective, ProblemSpec};
/// use u_facility::pso::{PsoConfig, PsoRunner};
///
/// let costs = CostMatrix::from_int_rows(vec![
///     vec![0, 1, 2, 3, 4],
///     vec![1, 0, 2, 3, 3],
///     vec![2, 2, 0, 4, 2],
///     vec![3, 3, 4, 0, 1],
///     vec![4, 3, 2, 1, 0],
/// ]).unwrap();
/// let spec = ProblemSpec::new(Objective::Minimize, Aggregate::Max, Measure::Star, costs, 2).unwrap();
/// let config = PsoConfig::default().with_swarm_size(20).with_max_iterations(50).with_seed(42);
///
/// let result = PsoRunner::run(&spec, &config).unwrap();
/// assert!(result.best_fitness <= 3.0);
/// ```
pub struct PsoRunner;

impl PsoRunner {
    /// Runs the optimizer with an RNG seeded from `config.seed`.
    pub fn run(spec: &ProblemSpec, config: &PsoConfig) -> Result<PsoResult, FacilityError> {
        Self::run_with_cancel(spec, config, None)
    }

    /// Runs the optimizer with an optional cancellation token.
    ///
    /// The flag is checked between iterations; a cancelled run returns the
    /// best found so far with `cancelled` set.
    pub fn run_with_cancel(
        spec: &ProblemSpec,
        config: &PsoConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<PsoResult, FacilityError> {
        let mut rng = seeded_rng(config);
        Self::run_with_rng(spec, config, &mut rng, cancel, None)
    }

    /// Runs the optimizer, reporting every iteration to `observer`.
    pub fn run_with_observer<O: SwarmObserver>(
        spec: &ProblemSpec,
        config: &PsoConfig,
        observer: &mut O,
    ) -> Result<PsoResult, FacilityError> {
        let mut rng = seeded_rng(config);
        Self::run_with_rng(spec, config, &mut rng, None, Some(observer))
    }

    /// Runs the optimizer on a caller-supplied random source.
    ///
    /// Every random decision of the run (initial positions, mutation
    /// gates, exchanged slots and sites) is drawn from `rng`, so a run is
    /// reproducible from the state of `rng`. `config.seed` is ignored.
    ///
    /// # Errors
    ///
    /// [`FacilityError::Configuration`] if `config` is invalid or the
    /// problem's measure is not implemented.
    pub fn run_with_rng<R: Rng>(
        spec: &ProblemSpec,
        config: &PsoConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
        mut observer: Option<&mut dyn SwarmObserver>,
    ) -> Result<PsoResult, FacilityError> {
        config.validate()?;
        if !spec.measure().is_implemented() {
            return Err(FacilityError::config(format!(
                "measure `{}` is not implemented",
                spec.measure()
            )));
        }

        debug!(
            "ndpso: {spec}, swarm_size={}, max_iterations={}",
            config.swarm_size, config.max_iterations
        );

        let mut swarm = Swarm::random(spec, config.swarm_size, rng)?;
        let mut global_best = swarm.global_best(spec);
        let mut overall_best = global_best.clone();
        let mut best_iteration = 0usize;

        let mut fitness_history = Vec::with_capacity(config.max_iterations + 1);
        fitness_history.push(overall_best.fitness);

        let mut inertia = config.inertia;
        let mut iterations = 0usize;
        let mut cancelled = false;

        for iteration in 1..=config.max_iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            inertia *= config.inertial_discount;
            let rates = Rates {
                inertia,
                cognitive: config.cognitive,
                social: config.social,
            };

            swarm.advance(spec, &global_best.position, rates, rng)?;
            global_best = swarm.global_best(spec);

            if spec.compare(global_best.fitness, overall_best.fitness) {
                trace!(
                    "ndpso: iteration {iteration} improved {} -> {}",
                    overall_best.fitness,
                    global_best.fitness
                );
                overall_best = global_best.clone();
                best_iteration = iteration;
            }

            iterations = iteration;
            fitness_history.push(overall_best.fitness);

            if let Some(obs) = observer.as_mut() {
                obs.on_iteration(iteration, &overall_best);
            }
        }

        debug!(
            "ndpso: best fitness {} at iteration {best_iteration} of {iterations}{}",
            overall_best.fitness,
            if cancelled { " (cancelled)" } else { "" }
        );

        let assignments = spec.assignments(&overall_best.position);
        Ok(PsoResult {
            best: overall_best.position,
            best_fitness: overall_best.fitness,
            assignments,
            iterations,
            best_iteration,
            cancelled,
            fitness_history,
        })
    }
}

fn seeded_rng(config: &PsoConfig) -> StdRng {
    StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random))
}
