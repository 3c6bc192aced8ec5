//! Facility-location problem definition and objective evaluation.

use std::fmt;

use super::matrix::CostMatrix;
use super::measure::Measures;
use super::types::{Aggregate, Measure, Objective};
use crate::error::FacilityError;

/// An immutable facility-location problem: which `num_facilities` sites to
/// open so that the aggregated measure of the customer assignment is
/// optimal in the direction of `objective`.
///
/// # Examples
///
/// ```
/// use u_facility::problem::{Aggregate, CostMatrix, Measure, Objective, ProblemSpec};
///
/// let costs = CostMatrix::from_int_rows(vec![
///     vec![0, 1, 2, 3, 4],
///     vec![1, 0, 2, 3, 3],
///     vec![2, 2, 0, 4, 2],
///     vec![3, 3, 4, 0, 1],
///     vec![4, 3, 2, 1, 0],
/// ]).unwrap();
/// let spec = ProblemSpec::new(Objective::Minimize, Aggregate::Max, Measure::Star, costs, 2).unwrap();
///
/// assert_eq!(spec.name(), "minimize max star");
/// assert_eq!(spec.evaluate(&[0, 4]).unwrap(), 3.0);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProblemSpec {
    objective: Objective,
    aggregate: Aggregate,
    measure: Measure,
    costs: CostMatrix,
    num_facilities: usize,
}

impl ProblemSpec {
    /// Creates a problem.
    ///
    /// # Errors
    ///
    /// [`FacilityError::InvariantViolation`] unless
    /// `0 < num_facilities <= costs.num_potential_facilities()`.
    pub fn new(
        objective: Objective,
        aggregate: Aggregate,
        measure: Measure,
        costs: CostMatrix,
        num_facilities: usize,
    ) -> Result<Self, FacilityError> {
        let potential = costs.num_potential_facilities();
        if num_facilities == 0 || num_facilities > potential {
            return Err(FacilityError::invariant(format!(
                "num_facilities must be in 1..={potential}, got {num_facilities}"
            )));
        }
        Ok(Self {
            objective,
            aggregate,
            measure,
            costs,
            num_facilities,
        })
    }

    /// Creates a problem from lowercase enum names such as `"minimize"`,
    /// `"max"` and `"star"`, the form in which external data sources
    /// describe the problem type.
    ///
    /// # Errors
    ///
    /// [`FacilityError::Configuration`] for an unrecognized name, otherwise
    /// as [`ProblemSpec::new`].
    pub fn from_names(
        objective: &str,
        aggregate: &str,
        measure: &str,
        costs: CostMatrix,
        num_facilities: usize,
    ) -> Result<Self, FacilityError> {
        Self::new(
            objective.parse()?,
            aggregate.parse()?,
            measure.parse()?,
            costs,
            num_facilities,
        )
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn aggregate(&self) -> Aggregate {
        self.aggregate
    }

    pub fn measure(&self) -> Measure {
        self.measure
    }

    pub fn costs(&self) -> &CostMatrix {
        &self.costs
    }

    /// Number of facilities to open.
    pub fn num_facilities(&self) -> usize {
        self.num_facilities
    }

    /// Number of candidate sites.
    pub fn potential_facilities(&self) -> usize {
        self.costs.num_potential_facilities()
    }

    /// Human-readable problem type, e.g. `"minimize max star"`.
    pub fn name(&self) -> String {
        format!("{} {} {}", self.objective, self.aggregate, self.measure)
    }

    // ---- comparator ----

    /// `true` iff `a` is strictly better than `b` under this problem's
    /// objective direction.
    #[inline]
    pub fn compare(&self, a: f64, b: f64) -> bool {
        self.objective.is_better(a, b)
    }

    /// Returns `b` if it is strictly better than `a`, otherwise `a`.
    #[inline]
    pub fn better_of(&self, a: f64, b: f64) -> f64 {
        if self.compare(b, a) {
            b
        } else {
            a
        }
    }

    /// Best of `values`, or `None` when empty. The first of equal values is
    /// kept.
    pub fn best_of<I>(&self, values: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        values.into_iter().reduce(|best, v| self.better_of(best, v))
    }

    // ---- objective ----

    /// Assigns `customer` to the best facility in `facilities` and returns
    /// `(facility, cost)`.
    ///
    /// The first facility seeds the search; a later one replaces it only
    /// when strictly better, so ties go to the earliest facility.
    ///
    /// # Errors
    ///
    /// [`FacilityError::InvariantViolation`] if `customer` is not a row of
    /// the cost matrix or `facilities` is not a valid position.
    pub fn assign_customer(
        &self,
        customer: usize,
        facilities: &[usize],
    ) -> Result<(usize, f64), FacilityError> {
        let customers = self.costs.num_customers();
        if customer >= customers {
            return Err(FacilityError::invariant(format!(
                "customer {customer} out of range 0..{customers}"
            )));
        }
        self.validate_position(facilities)?;
        Ok(self.best_facility(customer, facilities))
    }

    /// Facility assigned to each customer, indexed by customer.
    ///
    /// # Errors
    ///
    /// [`FacilityError::InvariantViolation`] if `facilities` is not a valid
    /// position.
    pub fn assign_customers(&self, facilities: &[usize]) -> Result<Vec<usize>, FacilityError> {
        self.validate_position(facilities)?;
        Ok(self.assignments(facilities))
    }

    /// Per-facility measure values for a customer assignment.
    ///
    /// # Errors
    ///
    /// [`FacilityError::InvariantViolation`] unless `assignments` holds one
    /// facility in `[0, potential_facilities)` per customer.
    pub fn compute_measures(&self, assignments: &[usize]) -> Result<Measures, FacilityError> {
        let customers = self.costs.num_customers();
        if assignments.len() != customers {
            return Err(FacilityError::invariant(format!(
                "assignment has {} entries, expected one per customer ({customers})",
                assignments.len()
            )));
        }
        let potential = self.potential_facilities();
        if let Some((cust, &fac)) = assignments
            .iter()
            .enumerate()
            .find(|&(_, &fac)| fac >= potential)
        {
            return Err(FacilityError::invariant(format!(
                "customer {cust} assigned to facility {fac} out of range 0..{potential}"
            )));
        }
        Ok(self.measure.compute(&self.costs, assignments))
    }

    /// Best facility for `customer` within a valid, non-empty position.
    fn best_facility(&self, customer: usize, facilities: &[usize]) -> (usize, f64) {
        let row = self.costs.row(customer);
        let first = facilities[0];
        facilities[1..]
            .iter()
            .fold((first, row[first]), |best, &fac| {
                if self.compare(row[fac], best.1) {
                    (fac, row[fac])
                } else {
                    best
                }
            })
    }

    /// Customer assignment of a position already known to be valid.
    pub(crate) fn assignments(&self, facilities: &[usize]) -> Vec<usize> {
        debug_assert!(self.validate_position(facilities).is_ok());
        (0..self.costs.num_customers())
            .map(|cust| self.best_facility(cust, facilities).0)
            .collect()
    }

    /// Folds measure values with the configured aggregate.
    ///
    /// # Errors
    ///
    /// [`FacilityError::EmptyMeasures`] if `measures` is empty.
    pub fn aggregate_measures(&self, measures: &Measures) -> Result<f64, FacilityError> {
        let mut values = measures.values().copied();
        let first = values.next().ok_or(FacilityError::EmptyMeasures)?;
        Ok(match self.aggregate {
            Aggregate::Min => values.fold(first, |m, v| if v < m { v } else { m }),
            Aggregate::Max => values.fold(first, |m, v| if v > m { v } else { m }),
            Aggregate::Sum => values.fold(first, |s, v| s + v),
        })
    }

    /// Fitness of a facility set.
    ///
    /// # Errors
    ///
    /// [`FacilityError::InvariantViolation`] if `facilities` is not a valid
    /// position (see [`validate_position`](Self::validate_position)),
    /// [`FacilityError::EmptyMeasures`] if the measure is not implemented.
    pub fn evaluate(&self, facilities: &[usize]) -> Result<f64, FacilityError> {
        self.validate_position(facilities)?;
        self.fitness(facilities)
    }

    /// Fitness of a position already known to be valid.
    pub(crate) fn fitness(&self, facilities: &[usize]) -> Result<f64, FacilityError> {
        let assignments = self.assignments(facilities);
        self.aggregate_measures(&self.measure.compute(&self.costs, &assignments))
    }

    /// Checks that `facilities` has exactly `num_facilities` distinct
    /// entries, each in `[0, potential_facilities)`.
    ///
    /// # Errors
    ///
    /// [`FacilityError::InvariantViolation`] describing the first problem
    /// found.
    pub fn validate_position(&self, facilities: &[usize]) -> Result<(), FacilityError> {
        if facilities.is_empty() {
            return Err(FacilityError::invariant("facility set is empty"));
        }
        if facilities.len() != self.num_facilities {
            return Err(FacilityError::invariant(format!(
                "facility set has {} entries, expected {}",
                facilities.len(),
                self.num_facilities
            )));
        }
        let potential = self.potential_facilities();
        let mut seen = vec![false; potential];
        for &fac in facilities {
            if fac >= potential {
                return Err(FacilityError::invariant(format!(
                    "facility {fac} out of range 0..{potential}"
                )));
            }
            if std::mem::replace(&mut seen[fac], true) {
                return Err(FacilityError::invariant(format!(
                    "facility {fac} appears more than once"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for ProblemSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (open {} of {} sites)",
            self.name(),
            self.num_facilities,
            self.potential_facilities()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn simple_costs() -> CostMatrix {
        CostMatrix::from_int_rows(vec![
            vec![0, 1, 2, 3, 4],
            vec![1, 0, 2, 3, 3],
            vec![2, 2, 0, 4, 2],
            vec![3, 3, 4, 0, 1],
            vec![4, 3, 2, 1, 0],
        ])
        .unwrap()
    }

    fn spec(objective: Objective, aggregate: Aggregate) -> ProblemSpec {
        ProblemSpec::new(objective, aggregate, Measure::Star, simple_costs(), 2).unwrap()
    }

    #[test]
    fn test_name() {
        assert_eq!(spec(Objective::Minimize, Aggregate::Max).name(), "minimize max star");
        assert_eq!(spec(Objective::Maximize, Aggregate::Sum).name(), "maximize sum star");
    }

    #[test]
    fn test_display() {
        let s = spec(Objective::Minimize, Aggregate::Max);
        assert_eq!(s.to_string(), "minimize max star (open 2 of 5 sites)");
    }

    #[test]
    fn test_new_rejects_bad_facility_count() {
        for n in [0, 6] {
            let r = ProblemSpec::new(
                Objective::Minimize,
                Aggregate::Max,
                Measure::Star,
                simple_costs(),
                n,
            );
            assert!(matches!(r, Err(FacilityError::InvariantViolation(_))));
        }
    }

    #[test]
    fn test_from_names() {
        let s = ProblemSpec::from_names("maximize", "min", "star", simple_costs(), 3).unwrap();
        assert_eq!(s.objective(), Objective::Maximize);
        assert_eq!(s.aggregate(), Aggregate::Min);
        assert_eq!(s.num_facilities(), 3);

        let err = ProblemSpec::from_names("minimize", "avg", "star", simple_costs(), 2).unwrap_err();
        assert!(matches!(err, FacilityError::Configuration(_)));
    }

    fn spec_opening(objective: Objective, num_facilities: usize) -> ProblemSpec {
        ProblemSpec::new(objective, Aggregate::Max, Measure::Star, simple_costs(), num_facilities)
            .unwrap()
    }

    /// Two customers, three cost columns: only sites 0 and 1 are candidates.
    fn wide_spec() -> ProblemSpec {
        let costs = CostMatrix::from_int_rows(vec![vec![1, 2, 4], vec![3, 5, 6]]).unwrap();
        ProblemSpec::new(Objective::Minimize, Aggregate::Max, Measure::Star, costs, 1).unwrap()
    }

    #[test]
    fn test_assign_customer_closest() {
        let s = spec(Objective::Minimize, Aggregate::Max);
        assert_eq!(s.assign_customer(0, &[0, 4]).unwrap(), (0, 0.0));
        assert_eq!(s.assign_customer(1, &[0, 4]).unwrap(), (0, 1.0));
        assert_eq!(s.assign_customer(2, &[0, 4]).unwrap(), (0, 2.0));
        assert_eq!(s.assign_customer(3, &[0, 4]).unwrap(), (4, 1.0));
        assert_eq!(s.assign_customer(4, &[0, 4]).unwrap(), (4, 0.0));
    }

    #[test]
    fn test_assign_customer_tie_keeps_first() {
        let s = spec_opening(Objective::Minimize, 3);
        // customer 2 costs 2 at facilities 0, 1 and 4
        assert_eq!(s.assign_customer(2, &[4, 0, 1]).unwrap(), (4, 2.0));
        assert_eq!(s.assign_customer(2, &[1, 4, 0]).unwrap(), (1, 2.0));
    }

    #[test]
    fn test_assign_customer_maximize_picks_farthest() {
        let s = spec(Objective::Maximize, Aggregate::Max);
        assert_eq!(s.assign_customer(0, &[0, 4]).unwrap(), (4, 4.0));
        assert_eq!(s.assign_customer(4, &[0, 4]).unwrap(), (0, 4.0));
    }

    #[test]
    fn test_assign_customers() {
        let s = spec(Objective::Minimize, Aggregate::Max);
        assert_eq!(s.assign_customers(&[0, 4]).unwrap(), vec![0, 0, 0, 4, 4]);
    }

    #[test]
    fn test_stars_for_example() {
        let s = spec(Objective::Minimize, Aggregate::Max);
        let stars = s.compute_measures(&s.assign_customers(&[0, 4]).unwrap()).unwrap();
        let expected: Measures = [(0, 3.0), (4, 1.0)].into_iter().collect();
        assert_eq!(stars, expected);
    }

    #[test]
    fn test_assignment_rejects_site_outside_candidates() {
        // Column 2 exists in the matrix but is not a candidate site.
        let s = wide_spec();
        assert!(matches!(
            s.assign_customers(&[2]),
            Err(FacilityError::InvariantViolation(_))
        ));
        assert!(matches!(
            s.assign_customer(0, &[2]),
            Err(FacilityError::InvariantViolation(_))
        ));
        assert!(matches!(
            s.compute_measures(&[2, 2]),
            Err(FacilityError::InvariantViolation(_))
        ));
        assert!(matches!(s.evaluate(&[2]), Err(FacilityError::InvariantViolation(_))));
        assert_eq!(s.assign_customers(&[1]).unwrap(), vec![1, 1]);
    }

    #[test]
    fn test_assignment_rejects_empty_set() {
        let s = spec(Objective::Minimize, Aggregate::Max);
        assert!(matches!(
            s.assign_customers(&[]),
            Err(FacilityError::InvariantViolation(_))
        ));
        assert!(matches!(
            s.assign_customer(0, &[]),
            Err(FacilityError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_assign_customer_rejects_unknown_customer() {
        let s = spec(Objective::Minimize, Aggregate::Max);
        assert!(matches!(
            s.assign_customer(5, &[0, 4]),
            Err(FacilityError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_compute_measures_rejects_wrong_length() {
        let s = spec(Objective::Minimize, Aggregate::Max);
        assert!(matches!(
            s.compute_measures(&[0, 0, 4]),
            Err(FacilityError::InvariantViolation(_))
        ));
        assert!(matches!(
            s.compute_measures(&[]),
            Err(FacilityError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_evaluate_minimize_max_star() {
        let s = spec(Objective::Minimize, Aggregate::Max);
        assert_eq!(s.evaluate(&[0, 4]).unwrap(), 3.0);
    }

    #[test]
    fn test_aggregates() {
        let measures: Measures = [(0, 3.0), (2, 7.0), (4, 1.0)].into_iter().collect();
        assert_eq!(spec(Objective::Minimize, Aggregate::Min).aggregate_measures(&measures).unwrap(), 1.0);
        assert_eq!(spec(Objective::Minimize, Aggregate::Max).aggregate_measures(&measures).unwrap(), 7.0);
        assert_eq!(spec(Objective::Minimize, Aggregate::Sum).aggregate_measures(&measures).unwrap(), 11.0);
    }

    #[test]
    fn test_aggregate_empty_is_error() {
        let s = spec(Objective::Minimize, Aggregate::Sum);
        assert_eq!(
            s.aggregate_measures(&Measures::new()),
            Err(FacilityError::EmptyMeasures)
        );
    }

    #[test]
    fn test_evaluate_unimplemented_measure() {
        let s = ProblemSpec::new(
            Objective::Minimize,
            Aggregate::Max,
            Measure::Radius,
            simple_costs(),
            2,
        )
        .unwrap();
        assert_eq!(s.evaluate(&[0, 4]), Err(FacilityError::EmptyMeasures));
    }

    #[test]
    fn test_evaluate_rejects_malformed_positions() {
        let s = spec(Objective::Minimize, Aggregate::Max);
        for bad in [&[][..], &[0][..], &[0, 1, 2][..], &[3, 3][..], &[0, 5][..]] {
            assert!(
                matches!(s.evaluate(bad), Err(FacilityError::InvariantViolation(_))),
                "expected invariant violation for {bad:?}"
            );
        }
    }

    #[test]
    fn test_better_of_and_best_of() {
        let min = spec(Objective::Minimize, Aggregate::Max);
        let max = spec(Objective::Maximize, Aggregate::Max);
        assert_eq!(min.better_of(1.0, 2.0), 1.0);
        assert_eq!(max.better_of(1.0, 2.0), 2.0);
        assert_eq!(min.best_of([4.0, 2.0, 9.0]), Some(2.0));
        assert_eq!(max.best_of([4.0, 2.0, 9.0]), Some(9.0));
        assert_eq!(min.best_of(std::iter::empty()), None);
    }

    proptest! {
        #[test]
        fn prop_assign_customer_is_optimal_within_set(
            cust in 0usize..5,
            facs in proptest::sample::subsequence((0usize..5).collect::<Vec<_>>(), 1..=5)
                .prop_shuffle(),
            maximize in any::<bool>(),
        ) {
            let obj = if maximize { Objective::Maximize } else { Objective::Minimize };
            let s = spec_opening(obj, facs.len());
            let (fac, cost) = s.assign_customer(cust, &facs).unwrap();
            prop_assert!(facs.contains(&fac));
            prop_assert_eq!(cost, s.costs().get(cust, fac));
            for &other in &facs {
                prop_assert!(!s.compare(s.costs().get(cust, other), cost));
            }
        }

        #[test]
        fn prop_compare_strict_and_antisymmetric(
            a in -1e6f64..1e6,
            b in -1e6f64..1e6,
            maximize in any::<bool>(),
        ) {
            let obj = if maximize { Objective::Maximize } else { Objective::Minimize };
            let s = spec(obj, Aggregate::Max);
            prop_assert!(!s.compare(a, a));
            prop_assert!(!(s.compare(a, b) && s.compare(b, a)));
            if a != b {
                prop_assert!(s.compare(a, b) || s.compare(b, a));
            }
        }

        #[test]
        fn prop_evaluate_is_deterministic(
            facs in proptest::sample::subsequence((0usize..5).collect::<Vec<_>>(), 2)
                .prop_shuffle(),
        ) {
            let s = spec(Objective::Minimize, Aggregate::Sum);
            let first = s.evaluate(&facs).unwrap();
            let second = s.evaluate(&facs).unwrap();
            prop_assert_eq!(first.to_bits(), second.to_bits());
        }
    }
}
