//! Error type shared by the objective module and the optimizer.

use thiserror::Error;

/// Errors raised while building or evaluating a facility-location problem.
///
/// Search stagnation, fitness ties and exhausting the iteration budget are
/// normal outcomes of a run and are never reported through this type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FacilityError {
    /// An objective, aggregate or measure name was not recognized, a measure
    /// is not implemented, or optimizer parameters are out of range.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A facility set or the problem data breaks a structural invariant
    /// (length, duplicates, index range, matrix shape, cost sign).
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Aggregation was requested over an empty measure mapping.
    #[error("cannot aggregate an empty measure mapping")]
    EmptyMeasures,
}

impl FacilityError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        FacilityError::Configuration(msg.into())
    }

    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        FacilityError::InvariantViolation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = FacilityError::config("objective `upward` not recognized");
        assert_eq!(
            err.to_string(),
            "configuration error: objective `upward` not recognized"
        );

        let err = FacilityError::invariant("duplicate facility 3");
        assert_eq!(err.to_string(), "invariant violation: duplicate facility 3");

        assert_eq!(
            FacilityError::EmptyMeasures.to_string(),
            "cannot aggregate an empty measure mapping"
        );
    }
}
