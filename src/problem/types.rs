//! Problem type enums: objective direction, aggregation rule, measure.
//!
//! A problem type reads as `<objective> <aggregate> <measure>`, e.g.
//! "minimize max star": open the facilities whose largest star is as small
//! as possible.

use std::fmt;
use std::str::FromStr;

use crate::error::FacilityError;

/// Direction of optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Objective {
    /// Smaller values are better.
    #[default]
    Minimize,
    /// Larger values are better.
    Maximize,
}

impl Objective {
    /// Returns `true` iff `a` is strictly better than `b`.
    ///
    /// This is the only ordering rule used anywhere in the crate: customer
    /// assignment, candidate selection, global-best and personal-best
    /// tracking all go through it. It is irreflexive, so equal values are
    /// never "better" than each other.
    #[inline]
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Objective::Minimize => a < b,
            Objective::Maximize => a > b,
        }
    }

    /// Lowercase name used by [`Display`](fmt::Display) and [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Objective::Minimize => "minimize",
            Objective::Maximize => "maximize",
        }
    }
}

/// How per-facility measures are folded into one fitness value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Aggregate {
    /// Smallest measure.
    Min,
    /// Largest measure.
    #[default]
    Max,
    /// Sum of all measures.
    Sum,
}

impl Aggregate {
    pub fn name(self) -> &'static str {
        match self {
            Aggregate::Min => "min",
            Aggregate::Max => "max",
            Aggregate::Sum => "sum",
        }
    }
}

/// Per-facility measure computed from customer assignments.
///
/// Only [`Measure::Star`] is implemented; the others are extension points
/// that currently produce an empty measure mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Measure {
    /// Sum of the costs of all customers assigned to a facility.
    #[default]
    Star,
    /// Largest customer cost at a facility. Not implemented.
    Radius,
    /// Smallest customer cost at a facility. Not implemented.
    Ray,
}

impl Measure {
    pub fn name(self) -> &'static str {
        match self {
            Measure::Star => "star",
            Measure::Radius => "radius",
            Measure::Ray => "ray",
        }
    }

    /// Whether this measure produces values.
    pub fn is_implemented(self) -> bool {
        matches!(self, Measure::Star)
    }
}

macro_rules! impl_name_traits {
    ($ty:ident, $kind:literal, [$($variant:ident),+]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = FacilityError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                [$($ty::$variant),+]
                    .into_iter()
                    .find(|v| v.name().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| {
                        FacilityError::config(format!("{} `{}` not recognized", $kind, s))
                    })
            }
        }
    };
}

impl_name_traits!(Objective, "objective", [Minimize, Maximize]);
impl_name_traits!(Aggregate, "aggregate", [Min, Max, Sum]);
impl_name_traits!(Measure, "measure", [Star, Radius, Ray]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_better_direction() {
        assert!(Objective::Minimize.is_better(1.0, 2.0));
        assert!(!Objective::Minimize.is_better(2.0, 1.0));
        assert!(Objective::Maximize.is_better(2.0, 1.0));
        assert!(!Objective::Maximize.is_better(1.0, 2.0));
    }

    #[test]
    fn test_is_better_irreflexive() {
        for obj in [Objective::Minimize, Objective::Maximize] {
            assert!(!obj.is_better(3.0, 3.0));
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("minimize".parse::<Objective>().unwrap(), Objective::Minimize);
        assert_eq!("MAXIMIZE".parse::<Objective>().unwrap(), Objective::Maximize);
        assert_eq!(" sum ".parse::<Aggregate>().unwrap(), Aggregate::Sum);
        assert_eq!("ray".parse::<Measure>().unwrap(), Measure::Ray);
    }

    #[test]
    fn test_parse_unknown_is_configuration_error() {
        let err = "sideways".parse::<Objective>().unwrap_err();
        assert!(matches!(err, FacilityError::Configuration(_)));
        assert!(err.to_string().contains("objective `sideways`"));

        assert!(matches!(
            "median".parse::<Aggregate>(),
            Err(FacilityError::Configuration(_))
        ));
        assert!(matches!(
            "diameter".parse::<Measure>(),
            Err(FacilityError::Configuration(_))
        ));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for m in [Measure::Star, Measure::Radius, Measure::Ray] {
            assert_eq!(m.to_string().parse::<Measure>().unwrap(), m);
        }
    }

    #[test]
    fn test_defaults_are_minimize_max_star() {
        assert_eq!(Objective::default(), Objective::Minimize);
        assert_eq!(Aggregate::default(), Aggregate::Max);
        assert_eq!(Measure::default(), Measure::Star);
    }

    #[test]
    fn test_only_star_implemented() {
        assert!(Measure::Star.is_implemented());
        assert!(!Measure::Radius.is_implemented());
        assert!(!Measure::Ray.is_implemented());
    }
}
