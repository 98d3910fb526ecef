//! Reaction term evaluation.
//!
//! For one species and one trajectory, computes the signed contribution of
//! every affecting reaction at every time point: the reaction's rate law
//! evaluated at that instant, scaled by the species' net stoichiometric
//! coefficient. Pure function of its inputs; nothing is retained.

use ndarray::{Array2, ArrayView1};

use crate::error::AnalysisError;
use crate::model::ReactionNetwork;
use crate::trajectory::Trajectory;

/// Signed per-reaction contributions for one (species, trajectory) pair.
///
/// Row k holds reaction `reactions[k]`'s contribution at every time point.
/// Ephemeral: consumed by the discretizer, never persisted.
#[derive(Clone, Debug)]
pub struct TermContributions {
    species: usize,
    trajectory: usize,
    reactions: Vec<usize>,
    /// (n_terms, n_times) matrix of signed contributions.
    values: Array2<f64>,
}

impl TermContributions {
    /// Species index the terms belong to.
    #[inline]
    pub fn species(&self) -> usize {
        self.species
    }

    /// Trajectory index the terms were evaluated on.
    #[inline]
    pub fn trajectory(&self) -> usize {
        self.trajectory
    }

    /// Reaction indices, one per term row.
    #[inline]
    pub fn reactions(&self) -> &[usize] {
        &self.reactions
    }

    /// Number of contributing terms.
    #[inline]
    pub fn n_terms(&self) -> usize {
        self.reactions.len()
    }

    /// Number of time points.
    #[inline]
    pub fn n_times(&self) -> usize {
        self.values.ncols()
    }

    /// All term values at one time point, in `reactions()` order.
    #[inline]
    pub fn values_at(&self, time_index: usize) -> ArrayView1<f64> {
        self.values.column(time_index)
    }
}

/// Evaluate every reaction term affecting `species` along a trajectory.
///
/// # Arguments
/// * `network` - Validated reaction network
/// * `traj` - One solved trajectory
/// * `species` - Target species index
/// * `trajectory` - Trajectory index, used for error context only
///
/// Fails with `ShapeMismatch` if the trajectory carries fewer species
/// columns or parameter values than the network defines, and with
/// `EmptyTermSet` if no reaction has a nonzero net effect on the species;
/// the latter is a modeling inconsistency the caller must resolve.
pub fn evaluate_terms(
    network: &ReactionNetwork,
    traj: &Trajectory,
    species: usize,
    trajectory: usize,
) -> Result<TermContributions, AnalysisError> {
    // First point where network and trajectory meet; check shapes here so
    // the rate-law loops can index freely.
    if traj.n_species() < network.n_species() {
        return Err(AnalysisError::ShapeMismatch {
            trajectory,
            detail: format!(
                "{} concentration columns but the network has {} species",
                traj.n_species(),
                network.n_species()
            ),
        });
    }
    if traj.parameters().len() < network.n_parameters() {
        return Err(AnalysisError::ShapeMismatch {
            trajectory,
            detail: format!(
                "{} parameter values but the network has {} parameters",
                traj.parameters().len(),
                network.n_parameters()
            ),
        });
    }

    let reactions = network.reactions_affecting(species);
    if reactions.is_empty() {
        return Err(AnalysisError::EmptyTermSet {
            species,
            trajectory,
        });
    }

    let n_times = traj.n_times();
    let mut values = Array2::<f64>::zeros((reactions.len(), n_times));
    let params = traj.parameters();

    for t in 0..n_times {
        let conc = traj.concentrations_at(t);
        for (k, &r) in reactions.iter().enumerate() {
            let rxn = &network.reactions()[r];
            values[[k, t]] = rxn.net_stoich(species) as f64 * rxn.rate_at(conc, params);
        }
    }

    Ok(TermContributions {
        species,
        trajectory,
        reactions,
        values,
    })
}
