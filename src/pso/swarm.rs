//! The particle population.

use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::particle::{Candidate, Particle, Rates};
use crate::error::FacilityError;
use crate::problem::ProblemSpec;

/// A fixed-size population of particles.
#[derive(Debug, Clone)]
pub struct Swarm {
    particles: Vec<Particle>,
}

impl Swarm {
    /// Creates `size` particles at random positions.
    ///
    /// # Errors
    ///
    /// [`FacilityError::Configuration`] if `size` is zero; evaluation errors
    /// otherwise.
    pub fn random<R: Rng>(spec: &ProblemSpec, size: usize, rng: &mut R) -> Result<Self, FacilityError> {
        if size == 0 {
            return Err(FacilityError::config("swarm must hold at least one particle"));
        }
        let particles = (0..size)
            .map(|_| Particle::random(spec, rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { particles })
    }

    /// Wraps existing particles.
    ///
    /// # Errors
    ///
    /// [`FacilityError::Configuration`] if `particles` is empty.
    pub fn from_particles(particles: Vec<Particle>) -> Result<Self, FacilityError> {
        if particles.is_empty() {
            return Err(FacilityError::config("swarm must hold at least one particle"));
        }
        Ok(Self { particles })
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Snapshot of the best current particle under [`ProblemSpec::compare`].
    ///
    /// The earliest particle wins ties.
    pub fn global_best(&self, spec: &ProblemSpec) -> Candidate {
        let (first, rest) = self
            .particles
            .split_first()
            .expect("swarm is never empty");
        rest.iter()
            .fold(first, |best, p| {
                if spec.compare(p.fitness, best.fitness) {
                    p
                } else {
                    best
                }
            })
            .current()
    }

    /// Updates every particle against `global_best`.
    ///
    /// # Errors
    ///
    /// [`FacilityError::InvariantViolation`] if `global_best` is not a valid
    /// position for `spec`.
    pub fn step<R: Rng>(
        &mut self,
        spec: &ProblemSpec,
        global_best: &[usize],
        rates: Rates,
        rng: &mut R,
    ) -> Result<(), FacilityError> {
        spec.validate_position(global_best)?;
        self.advance(spec, global_best, rates, rng)
    }

    #[cfg(not(feature = "parallel"))]
    pub(crate) fn advance<R: Rng>(
        &mut self,
        spec: &ProblemSpec,
        global_best: &[usize],
        rates: Rates,
        rng: &mut R,
    ) -> Result<(), FacilityError> {
        self.advance_sequential(spec, global_best, rates, rng)
    }

    /// Proposals are drawn sequentially in particle order, so the random
    /// stream is consumed exactly as in [`Swarm::advance_sequential`]; only
    /// scoring runs in parallel.
    #[cfg(feature = "parallel")]
    pub(crate) fn advance<R: Rng>(
        &mut self,
        spec: &ProblemSpec,
        global_best: &[usize],
        rates: Rates,
        rng: &mut R,
    ) -> Result<(), FacilityError> {
        let proposals: Vec<[Vec<usize>; 3]> = self
            .particles
            .iter()
            .map(|p| p.propose(spec, global_best, rates, rng))
            .collect();

        let scored = proposals
            .into_par_iter()
            .map(|ps| super::particle::score(spec, ps))
            .collect::<Result<Vec<_>, _>>()?;

        for (particle, candidates) in self.particles.iter_mut().zip(scored) {
            particle.adopt(spec, candidates);
        }
        Ok(())
    }

    /// Updates every particle, in order, without validating `global_best`.
    #[cfg_attr(feature = "parallel", allow(dead_code))]
    pub(crate) fn advance_sequential<R: Rng>(
        &mut self,
        spec: &ProblemSpec,
        global_best: &[usize],
        rates: Rates,
        rng: &mut R,
    ) -> Result<(), FacilityError> {
        for particle in &mut self.particles {
            particle.advance(spec, global_best, rates, rng)?;
        }
        Ok(())
    }
}
