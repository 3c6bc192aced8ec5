//! Discrete Particle Swarm Optimization (NDPSO).
//!
//! A population-based metaheuristic for choosing which facilities to open.
//! Positions are sets of distinct facility indices rather than real
//! vectors, and the velocity update is replaced by probability-gated
//! one-facility exchanges applied to a particle's current position, its
//! personal best and the swarm's global best.
//!
//! # Key Types
//!
//! - [`PsoConfig`]: swarm size, iteration budget, mutation rates, seed
//! - [`PsoRunner`]: executes the search loop
//! - [`PsoResult`]: best placement, its fitness and run statistics
//! - [`Particle`], [`Swarm`]: population state
//!
//! # References
//!
//! - Kennedy & Eberhart (1995), "Particle Swarm Optimization"
//! - Pan, Tasgetiren & Liang (2008), "A discrete particle swarm optimization
//!   algorithm for the no-wait flowshop scheduling problem"

mod config;
pub mod particle;
mod runner;
mod swarm;

pub use config::PsoConfig;
pub use particle::{Candidate, Particle, Rates};
pub use runner::{PsoResult, PsoRunner, SwarmObserver};
pub use swarm::Swarm;
