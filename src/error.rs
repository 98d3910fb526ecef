//! Error taxonomy for the tropicalization pipeline.
//!
//! Every error is an input-validation failure detected eagerly at a stage
//! boundary. None are recoverable inside the core; all carry enough context
//! (species, trajectory, reaction) for the caller to fix the input.

use thiserror::Error;

/// Errors surfaced by model construction, evaluation and clustering.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A reaction references a species or parameter missing from the model.
    #[error("reaction {reaction} references undefined {kind} '{name}'")]
    InvalidModelReference {
        reaction: usize,
        kind: &'static str,
        name: String,
    },

    /// A species has no reaction contributing to its rate of change.
    /// This is a modeling inconsistency, not a user error.
    #[error("species {species} of trajectory {trajectory} has no contributing reaction terms")]
    EmptyTermSet { species: usize, trajectory: usize },

    /// A trajectory's time grid is empty, non-increasing, or does not match
    /// the concentration matrix.
    #[error("invalid time grid for trajectory {trajectory}: {detail}")]
    InvalidTimeGrid { trajectory: usize, detail: String },

    /// A trajectory's concentration matrix or parameter vector is too small
    /// for the network it is evaluated against.
    #[error("trajectory {trajectory} does not cover the network: {detail}")]
    ShapeMismatch { trajectory: usize, detail: String },

    /// Trajectories assembled for comparison do not share a time
    /// discretization. Must be resolved by re-sampling before this core can
    /// proceed; that is the caller's responsibility.
    #[error("trajectory {trajectory} does not share the ensemble time grid")]
    InconsistentTimeGrid { trajectory: usize },

    /// Clustering invoked with zero signatures.
    #[error("cannot cluster an empty signature set")]
    EmptySignatureSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = AnalysisError::InvalidModelReference {
            reaction: 3,
            kind: "species",
            name: "Bax".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "reaction 3 references undefined species 'Bax'"
        );

        let err = AnalysisError::EmptyTermSet {
            species: 1,
            trajectory: 7,
        };
        assert!(err.to_string().contains("species 1"));
        assert!(err.to_string().contains("trajectory 7"));
    }
}
