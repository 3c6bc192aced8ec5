//! Particles and the one-facility exchange operator.
//!
//! A particle is plain data. Its "velocity" is replaced by three
//! probability-gated exchanges: one applied to its current position, one
//! to its personal best and one to the swarm's global best. The particle
//! then moves to the best of the three results, whether or not that is an
//! improvement over where it was.

use rand::Rng;

use crate::error::FacilityError;
use crate::problem::ProblemSpec;

/// A position together with its fitness.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    /// Open facilities.
    pub position: Vec<usize>,
    /// Fitness of `position`.
    pub fitness: f64,
}

impl Candidate {
    /// Scores a position that is valid for `spec`.
    pub(crate) fn scored(spec: &ProblemSpec, position: Vec<usize>) -> Result<Self, FacilityError> {
        let fitness = spec.fitness(&position)?;
        Ok(Self { position, fitness })
    }
}

/// Mutation probabilities for one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rates {
    /// Applied to the particle's current position.
    pub inertia: f64,
    /// Applied to the particle's personal best.
    pub cognitive: f64,
    /// Applied to the swarm's global best.
    pub social: f64,
}

/// One member of the swarm.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub(crate) position: Vec<usize>,
    pub(crate) fitness: f64,
    pub(crate) best_position: Vec<usize>,
    pub(crate) best_fitness: f64,
}

impl Particle {
    /// Creates a particle at a uniformly random position.
    pub fn random<R: Rng>(spec: &ProblemSpec, rng: &mut R) -> Result<Self, FacilityError> {
        let position = random_position(spec, rng);
        let fitness = spec.fitness(&position)?;
        Ok(Self::at(position, fitness))
    }

    /// Creates a particle at a given position.
    ///
    /// # Errors
    ///
    /// [`FacilityError::InvariantViolation`] if `position` is not valid for
    /// `spec`.
    pub fn from_position(spec: &ProblemSpec, position: Vec<usize>) -> Result<Self, FacilityError> {
        let fitness = spec.evaluate(&position)?;
        Ok(Self::at(position, fitness))
    }

    fn at(position: Vec<usize>, fitness: f64) -> Self {
        Self {
            best_position: position.clone(),
            best_fitness: fitness,
            position,
            fitness,
        }
    }

    #[inline]
    pub fn position(&self) -> &[usize] {
        &self.position
    }

    #[inline]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    #[inline]
    pub fn best_position(&self) -> &[usize] {
        &self.best_position
    }

    #[inline]
    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    /// Current position and fitness.
    pub fn current(&self) -> Candidate {
        Candidate {
            position: self.position.clone(),
            fitness: self.fitness,
        }
    }

    /// Personal best position and fitness.
    pub fn personal_best(&self) -> Candidate {
        Candidate {
            position: self.best_position.clone(),
            fitness: self.best_fitness,
        }
    }

    /// Draws the three candidate positions of an update, in generation
    /// order: current position (`inertia`), personal best (`cognitive`),
    /// global best (`social`).
    ///
    /// `global_best` must already be a valid position.
    pub(crate) fn propose<R: Rng>(
        &self,
        spec: &ProblemSpec,
        global_best: &[usize],
        rates: Rates,
        rng: &mut R,
    ) -> [Vec<usize>; 3] {
        [
            exchange(spec, &self.position, rates.inertia, rng),
            exchange(spec, &self.best_position, rates.cognitive, rng),
            exchange(spec, global_best, rates.social, rng),
        ]
    }

    /// Moves to the best of the scored candidates and refreshes the
    /// personal best if the new fitness is strictly better.
    pub(crate) fn adopt(&mut self, spec: &ProblemSpec, candidates: [Candidate; 3]) {
        let chosen = select_candidate(spec, candidates);
        self.position = chosen.position;
        self.fitness = chosen.fitness;

        if spec.compare(self.fitness, self.best_fitness) {
            self.best_position = self.position.clone();
            self.best_fitness = self.fitness;
        }
    }

    /// One PSO step against the previous iteration's global best.
    ///
    /// # Errors
    ///
    /// [`FacilityError::InvariantViolation`] if `global_best` is not a valid
    /// position for `spec`.
    pub fn update<R: Rng>(
        &mut self,
        spec: &ProblemSpec,
        global_best: &[usize],
        rates: Rates,
        rng: &mut R,
    ) -> Result<(), FacilityError> {
        spec.validate_position(global_best)?;
        self.advance(spec, global_best, rates, rng)
    }

    /// [`Particle::update`] without validating `global_best`.
    pub(crate) fn advance<R: Rng>(
        &mut self,
        spec: &ProblemSpec,
        global_best: &[usize],
        rates: Rates,
        rng: &mut R,
    ) -> Result<(), FacilityError> {
        let proposals = self.propose(spec, global_best, rates, rng);
        let candidates = score(spec, proposals)?;
        self.adopt(spec, candidates);
        Ok(())
    }
}

/// Scores the three proposals of an update.
pub(crate) fn score(
    spec: &ProblemSpec,
    proposals: [Vec<usize>; 3],
) -> Result<[Candidate; 3], FacilityError> {
    let [s1, s2, s3] = proposals;
    Ok([
        Candidate::scored(spec, s1)?,
        Candidate::scored(spec, s2)?,
        Candidate::scored(spec, s3)?,
    ])
}

/// Folds candidates in generation order with [`ProblemSpec::compare`].
///
/// A later candidate replaces the running choice unless the running choice
/// is strictly better, so on equal fitness the last-generated candidate
/// wins. Equal-fitness positions are interchangeable for the search.
pub fn select_candidate(spec: &ProblemSpec, candidates: [Candidate; 3]) -> Candidate {
    let [first, second, third] = candidates;
    [second, third].into_iter().fold(first, |chosen, next| {
        if spec.compare(chosen.fitness, next.fitness) {
            chosen
        } else {
            next
        }
    })
}

/// Draws `num_facilities` distinct sites uniformly without replacement.
pub fn random_position<R: Rng>(spec: &ProblemSpec, rng: &mut R) -> Vec<usize> {
    rand::seq::index::sample(rng, spec.potential_facilities(), spec.num_facilities()).into_vec()
}

/// Exclusive upper bound of the sites a mutation may swap in.
///
/// Every candidate site is eligible.
#[inline]
pub fn replacement_domain(spec: &ProblemSpec) -> usize {
    spec.potential_facilities()
}

/// Returns a copy of `position`, with one facility exchanged with
/// probability `probability`.
///
/// The exchanged slot is chosen uniformly and receives a site drawn
/// uniformly from [`replacement_domain`] minus every site already in the
/// position. If every site is already open the copy is returned unchanged.
///
/// # Errors
///
/// [`FacilityError::InvariantViolation`] if `position` is not valid for
/// `spec`.
pub fn mutate<R: Rng>(
    spec: &ProblemSpec,
    position: &[usize],
    probability: f64,
    rng: &mut R,
) -> Result<Vec<usize>, FacilityError> {
    spec.validate_position(position)?;
    Ok(exchange(spec, position, probability, rng))
}

/// [`mutate`] on a position already known to be valid.
pub(crate) fn exchange<R: Rng>(
    spec: &ProblemSpec,
    position: &[usize],
    probability: f64,
    rng: &mut R,
) -> Vec<usize> {
    let mut mutated = position.to_vec();
    if rng.random_range(0.0..1.0) >= probability {
        return mutated;
    }

    let domain = replacement_domain(spec);
    let mut open = vec![false; domain];
    for &fac in position {
        open[fac] = true;
    }
    let closed: Vec<usize> = (0..domain).filter(|&fac| !open[fac]).collect();
    if closed.is_empty() {
        return mutated;
    }

    let slot = rng.random_range(0..mutated.len());
    mutated[slot] = closed[rng.random_range(0..closed.len())];
    mutated
}
