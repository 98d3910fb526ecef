//! End-to-end tropicalization pipeline.
//!
//! Wires the stages together: term evaluation, dominance discretization,
//! signature building, distance matrix, clustering, and driver
//! identification. Signature computation fans out over the
//! (species, trajectory) grid with rayon; each cell is independent.

use std::collections::HashMap;

use log::{debug, info};
use ndarray::Array2;
use rayon::prelude::*;

use crate::cluster::{cluster, ClusterAssignment, ClusterConfig, Linkage, StopRule};
use crate::distance::distance_matrix;
use crate::drivers::{identify_drivers, Driver};
use crate::error::AnalysisError;
use crate::model::ReactionNetwork;
use crate::trajectory::Ensemble;
use crate::tropical::{build_signature, discretize, evaluate_terms, Signature};

/// Tunable parameters of the full pipeline.
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    /// Relative co-dominance tolerance for discretization.
    pub tolerance: f64,
    /// Linkage rule for agglomeration.
    pub linkage: Linkage,
    /// Stop condition for agglomeration.
    pub stop: StopRule,
    /// Minimum dominance-frequency difference for a driver report.
    pub driver_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            linkage: Linkage::default(),
            stop: StopRule::ClusterCount(2),
            driver_threshold: 0.1,
        }
    }
}

impl AnalysisConfig {
    fn cluster_config(&self) -> ClusterConfig {
        ClusterConfig {
            linkage: self.linkage,
            stop: self.stop,
        }
    }
}

/// Signatures for a set of species across a whole ensemble.
///
/// Per species, signatures are stored in trajectory order.
#[derive(Clone, Debug)]
pub struct SignatureSet {
    by_species: HashMap<usize, Vec<Signature>>,
    n_trajectories: usize,
}

impl SignatureSet {
    /// Species indices covered, ascending.
    pub fn species(&self) -> Vec<usize> {
        let mut keys: Vec<usize> = self.by_species.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Number of trajectories per species.
    #[inline]
    pub fn n_trajectories(&self) -> usize {
        self.n_trajectories
    }

    /// All signatures of one species, in trajectory order.
    pub fn for_species(&self, species: usize) -> Option<&[Signature]> {
        self.by_species.get(&species).map(Vec::as_slice)
    }

    /// One signature by (species, trajectory).
    pub fn get(&self, species: usize, trajectory: usize) -> Option<&Signature> {
        self.by_species.get(&species)?.get(trajectory)
    }
}

/// Compute the signature of one species along one trajectory.
pub fn compute_signature(
    network: &ReactionNetwork,
    ensemble: &Ensemble,
    species: usize,
    trajectory: usize,
    tolerance: f64,
) -> Result<Signature, AnalysisError> {
    let traj = ensemble.trajectory(trajectory);
    let terms = evaluate_terms(network, traj, species, trajectory)?;
    let assignments = discretize(&terms, tolerance);
    Ok(build_signature(
        &assignments,
        traj.times(),
        species,
        trajectory,
    ))
}

/// Compute signatures for every (species, trajectory) cell in parallel.
///
/// The grid is embarrassingly parallel; a failure in any cell fails the
/// whole call with that cell's error.
pub fn compute_signatures(
    network: &ReactionNetwork,
    ensemble: &Ensemble,
    species: &[usize],
    tolerance: f64,
) -> Result<SignatureSet, AnalysisError> {
    let n_traj = ensemble.len();
    if n_traj == 0 {
        return Err(AnalysisError::EmptySignatureSet);
    }
    let grid: Vec<(usize, usize)> = species
        .iter()
        .flat_map(|&s| (0..n_traj).map(move |t| (s, t)))
        .collect();

    debug!(
        "computing {} signatures ({} species x {} trajectories)",
        grid.len(),
        species.len(),
        n_traj
    );

    let computed: Vec<Signature> = grid
        .par_iter()
        .map(|&(s, t)| compute_signature(network, ensemble, s, t, tolerance))
        .collect::<Result<_, _>>()?;

    // Grid is species-major, so each species owns one contiguous chunk
    let mut by_species = HashMap::with_capacity(species.len());
    for (chunk, &s) in computed.chunks_exact(n_traj).zip(species.iter()) {
        by_species.insert(s, chunk.to_vec());
    }

    Ok(SignatureSet {
        by_species,
        n_trajectories: n_traj,
    })
}

/// Complete output of one pipeline run.
#[derive(Clone, Debug)]
pub struct AnalysisResult {
    /// One signature per trajectory for the analyzed species.
    pub signatures: Vec<Signature>,
    /// Pairwise signature distances, (n, n) symmetric.
    pub distances: Array2<f64>,
    /// Cluster partition of the trajectories.
    pub assignment: ClusterAssignment,
    /// Distinguishing reactions per cluster pair, ranked.
    pub drivers: Vec<Driver>,
}

/// Run the full pipeline for one species of interest.
///
/// Evaluates terms, discretizes, builds signatures across the ensemble,
/// clusters the trajectories by signature distance, and reports the driver
/// reactions separating the clusters.
pub fn analyze(
    network: &ReactionNetwork,
    ensemble: &Ensemble,
    species: usize,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    if ensemble.is_empty() {
        return Err(AnalysisError::EmptySignatureSet);
    }

    info!(
        "analyzing species {} over {} trajectories (tolerance {})",
        species,
        ensemble.len(),
        config.tolerance
    );

    let set = compute_signatures(network, ensemble, &[species], config.tolerance)?;
    let signatures = set
        .for_species(species)
        .map(<[Signature]>::to_vec)
        .unwrap_or_default();

    debug!("computing {0}x{0} distance matrix", signatures.len());
    let distances = distance_matrix(&signatures);

    let assignment = cluster(distances.view(), &config.cluster_config())?;
    info!("found {} clusters", assignment.n_clusters());

    let drivers = identify_drivers(
        &signatures,
        &assignment,
        network.n_reactions(),
        config.driver_threshold,
    );
    debug!("{} driver reactions above threshold", drivers.len());

    Ok(AnalysisResult {
        signatures,
        distances,
        assignment,
        drivers,
    })
}
