//! Hierarchical agglomerative clustering over a precomputed distance matrix.
//!
//! Distance computation and partitioning are separate phases: this module
//! only consumes the matrix produced by `distance::distance_matrix`, so the
//! stop condition (fixed cluster count vs. distance cutoff) stays swappable
//! configuration. Every merge decision is deterministic: ties are broken by
//! the lowest trajectory index, and final labels are numbered by each
//! cluster's lowest member.

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Linkage rule for merging clusters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Linkage {
    /// Minimum distance over cross pairs.
    Single,
    /// Maximum distance over cross pairs.
    Complete,
    /// Mean distance over cross pairs.
    Average,
}

impl Default for Linkage {
    fn default() -> Self {
        Linkage::Average
    }
}

/// Stop condition for agglomeration. The two rules are mutually exclusive
/// by construction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum StopRule {
    /// Merge until exactly this many clusters remain (clamped to [1, n]).
    ClusterCount(usize),
    /// Merge while the closest pair is within this distance.
    DistanceCutoff(f64),
}

/// Clustering configuration.
#[derive(Clone, Debug)]
pub struct ClusterConfig {
    pub linkage: Linkage,
    pub stop: StopRule,
}

impl ClusterConfig {
    /// Average linkage with a fixed cluster count.
    pub fn with_count(n_clusters: usize) -> Self {
        Self {
            linkage: Linkage::default(),
            stop: StopRule::ClusterCount(n_clusters),
        }
    }

    /// Average linkage with a distance cutoff.
    pub fn with_cutoff(cutoff: f64) -> Self {
        Self {
            linkage: Linkage::default(),
            stop: StopRule::DistanceCutoff(cutoff),
        }
    }
}

/// Partition of trajectories into execution-mode clusters.
///
/// Covers every trajectory exactly once: `labels[t]` is the cluster of
/// trajectory `t`, labels run 0..n_clusters, and each label is held by at
/// least one trajectory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    labels: Vec<usize>,
    n_clusters: usize,
}

impl ClusterAssignment {
    /// Cluster label per trajectory, in trajectory order.
    #[inline]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Cluster label of one trajectory.
    #[inline]
    pub fn label(&self, trajectory: usize) -> usize {
        self.labels[trajectory]
    }

    /// Number of clusters.
    #[inline]
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Number of trajectories covered.
    #[inline]
    pub fn n_trajectories(&self) -> usize {
        self.labels.len()
    }

    /// Trajectory indices belonging to one cluster, ascending.
    pub fn members(&self, cluster: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == cluster)
            .map(|(t, _)| t)
            .collect()
    }
}

/// Linkage distance between two clusters, from the base pairwise matrix.
fn cluster_distance(
    distances: ArrayView2<f64>,
    a: &[usize],
    b: &[usize],
    linkage: Linkage,
) -> f64 {
    let pairs = a.iter().flat_map(|&i| b.iter().map(move |&j| distances[[i, j]]));
    match linkage {
        Linkage::Single => pairs.fold(f64::INFINITY, f64::min),
        Linkage::Complete => pairs.fold(0.0, f64::max),
        Linkage::Average => {
            let sum: f64 = pairs.sum();
            sum / (a.len() * b.len()) as f64
        }
    }
}

/// Agglomerate trajectories into clusters.
///
/// # Arguments
/// * `distances` - Symmetric (n, n) dissimilarity matrix
/// * `config` - Linkage rule and stop condition
///
/// Fails with `EmptySignatureSet` when the matrix is empty. Zero-distance
/// pairs always merge before any positive-distance pair, so trajectories
/// with identical signatures land in the same cluster at any non-trivial
/// cutoff or count.
pub fn cluster(
    distances: ArrayView2<f64>,
    config: &ClusterConfig,
) -> Result<ClusterAssignment, AnalysisError> {
    let n = distances.nrows();
    if n == 0 {
        return Err(AnalysisError::EmptySignatureSet);
    }

    // Active clusters as member lists; slot order preserves the
    // lowest-index tie-break.
    let mut clusters: Vec<Option<Vec<usize>>> = (0..n).map(|i| Some(vec![i])).collect();
    let mut n_active = n;

    let target = match config.stop {
        StopRule::ClusterCount(k) => k.clamp(1, n),
        StopRule::DistanceCutoff(_) => 1,
    };

    while n_active > target {
        // Closest active pair; strict comparison keeps the earliest pair on ties
        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..clusters.len() {
            let Some(a) = &clusters[i] else { continue };
            for j in i + 1..clusters.len() {
                let Some(b) = &clusters[j] else { continue };
                let d = cluster_distance(distances, a, b, config.linkage);
                if best.map_or(true, |(_, _, bd)| d < bd) {
                    best = Some((i, j, d));
                }
            }
        }
        let Some((i, j, d)) = best else { break };

        if let StopRule::DistanceCutoff(cutoff) = config.stop {
            if d > cutoff {
                break;
            }
        }

        if let Some(merged) = clusters[j].take() {
            if let Some(target) = clusters[i].as_mut() {
                target.extend(merged);
            }
        }
        n_active -= 1;
    }

    // A merged pair lands in the lower slot, so each surviving slot index is
    // its cluster's lowest member and slot order numbers the labels.
    let final_clusters: Vec<Vec<usize>> = clusters.into_iter().flatten().collect();

    let mut labels = vec![0usize; n];
    for (label, members) in final_clusters.iter().enumerate() {
        for &t in members {
            labels[t] = label;
        }
    }

    Ok(ClusterAssignment {
        labels,
        n_clusters: final_clusters.len(),
    })
}
