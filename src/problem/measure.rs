//! Per-facility measures.
//!
//! A measure turns a customer → facility assignment into one value per
//! open facility. New measures implement [`FacilityMeasure`] and get wired
//! into [`Measure::compute`]; the comparator and the optimizer do not
//! change.

use std::collections::BTreeMap;

use super::matrix::CostMatrix;
use super::types::Measure;

/// Measure value per facility, ordered by facility index.
pub type Measures = BTreeMap<usize, f64>;

/// Computes one value per facility that serves at least one customer.
pub trait FacilityMeasure {
    /// `assignments[c]` is the facility serving customer `c`.
    fn measure(&self, costs: &CostMatrix, assignments: &[usize]) -> Measures;
}

/// Star measure: the total cost of all customers assigned to a facility.
#[derive(Debug, Clone, Copy, Default)]
pub struct StarMeasure;

impl FacilityMeasure for StarMeasure {
    fn measure(&self, costs: &CostMatrix, assignments: &[usize]) -> Measures {
        let mut stars = Measures::new();
        for (cust, &fac) in assignments.iter().enumerate() {
            *stars.entry(fac).or_insert(0.0) += costs.get(cust, fac);
        }
        stars
    }
}

impl Measure {
    /// Computes this measure over `assignments`.
    ///
    /// Unimplemented measures return an empty mapping.
    pub fn compute(self, costs: &CostMatrix, assignments: &[usize]) -> Measures {
        match self {
            Measure::Star => StarMeasure.measure(costs, assignments),
            Measure::Radius | Measure::Ray => Measures::new(),
        }
    }
}
