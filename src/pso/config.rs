//! NDPSO configuration.

use crate::error::FacilityError;

/// Configuration for the discrete particle swarm optimizer.
///
/// The three rates are mutation probabilities. Each iteration a particle
/// mutates its current position with probability `inertia`, its personal
/// best with probability `cognitive`, and the swarm's global best with
/// probability `social`, then moves to the best of the three.
///
/// # Examples
///
/// ```
/// use u_facility::pso::PsoConfig;
///
/// let config = PsoConfig::default()
///     .with_swarm_size(20)
///     .with_max_iterations(50)
///     .with_social(0.9)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PsoConfig {
    /// Number of particles.
    pub swarm_size: usize,

    /// Number of iterations. The run always uses the full budget.
    pub max_iterations: usize,

    /// Probability of mutating the particle's current position.
    pub inertia: f64,

    /// Probability of mutating the particle's personal best.
    pub cognitive: f64,

    /// Probability of mutating the swarm's global best.
    pub social: f64,

    /// Factor applied to `inertia` at the start of every iteration.
    ///
    /// `1.0` keeps inertia constant. Values below one shift the search from
    /// exploring around each particle towards following the bests.
    pub inertial_discount: f64,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for PsoConfig {
    fn default() -> Self {
        Self {
            swarm_size: 100,
            max_iterations: 1000,
            inertia: 0.7,
            cognitive: 0.7,
            social: 0.7,
            inertial_discount: 1.0,
            seed: None,
        }
    }
}

impl PsoConfig {
    pub fn with_swarm_size(mut self, n: usize) -> Self {
        self.swarm_size = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_inertia(mut self, rate: f64) -> Self {
        self.inertia = rate;
        self
    }

    pub fn with_cognitive(mut self, rate: f64) -> Self {
        self.cognitive = rate;
        self
    }

    pub fn with_social(mut self, rate: f64) -> Self {
        self.social = rate;
        self
    }

    pub fn with_inertial_discount(mut self, discount: f64) -> Self {
        self.inertial_discount = discount;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), FacilityError> {
        if self.swarm_size == 0 {
            return Err(FacilityError::config("swarm_size must be at least 1"));
        }
        for (name, rate) in [
            ("inertia", self.inertia),
            ("cognitive", self.cognitive),
            ("social", self.social),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(FacilityError::config(format!(
                    "{name} must be in [0, 1], got {rate}"
                )));
            }
        }
        if !(self.inertial_discount > 0.0 && self.inertial_discount <= 1.0) {
            return Err(FacilityError::config(format!(
                "inertial_discount must be in (0, 1], got {}",
                self.inertial_discount
            )));
        }
        Ok(())
    }
}
