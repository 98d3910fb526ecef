//! Tropicalization engine for reaction-network trajectory analysis.
//!
//! Takes an ensemble of solved ODE trajectories for a biochemical reaction
//! network and discretizes each species' continuous dynamics into dynamic
//! signatures: maximal runs of the dominant reaction set over time. Signatures
//! are then compared with a duration-weighted alignment distance, trajectories
//! are clustered into execution modes, and the reactions that distinguish the
//! modes are reported as drivers.
//!
//! The stages are exposed individually (`tropical`, `distance`, `cluster`,
//! `drivers`) and wired together in `analysis::analyze`. Signature computation
//! parallelizes over the (species, trajectory) grid with Rayon.

pub mod analysis;
pub mod cluster;
pub mod distance;
pub mod drivers;
pub mod error;
pub mod model;
pub mod trajectory;
pub mod tropical;

pub use analysis::{analyze, compute_signature, compute_signatures, AnalysisConfig, AnalysisResult, SignatureSet};
pub use cluster::{cluster, ClusterAssignment, ClusterConfig, Linkage, StopRule};
pub use distance::{distance_matrix, signature_distance};
pub use drivers::{identify_drivers, Driver};
pub use error::AnalysisError;
pub use model::{RateLaw, Reaction, ReactionNetwork, ReactionSpec};
pub use trajectory::{Ensemble, Trajectory};
pub use tropical::{build_signature, discretize, dominant_at, evaluate_terms, Dominance, Segment, Signature, TermContributions};
