//! Tropicalization of reaction-network trajectories.
//!
//! This module provides the discretization pipeline:
//! - Evaluator: signed per-reaction contributions to a species' rate of change
//! - Dominance: the dominant reaction set at each instant, within tolerance
//! - Signature: run-length encoding of the dominance sequence over time

pub mod dominance;
pub mod evaluator;
pub mod signature;

pub use dominance::{discretize, dominant_at, Dominance};
pub use evaluator::{evaluate_terms, TermContributions};
pub use signature::{build_signature, Segment, Signature};
