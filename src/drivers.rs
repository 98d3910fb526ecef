//! Driver reaction identification.
//!
//! After clustering, explains what separates the clusters: for each pair of
//! clusters, the reactions whose dominance frequency differs by more than a
//! threshold are reported as drivers, ranked by the size of the difference.

use serde::{Deserialize, Serialize};

use crate::cluster::ClusterAssignment;
use crate::tropical::Signature;

/// One reaction that distinguishes a pair of clusters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    /// Reaction index in the network.
    pub reaction: usize,
    /// Lower-labelled cluster of the pair.
    pub cluster_a: usize,
    /// Higher-labelled cluster of the pair.
    pub cluster_b: usize,
    /// Fraction of cluster-a trajectories where the reaction is ever dominant.
    pub frequency_a: f64,
    /// Fraction of cluster-b trajectories where the reaction is ever dominant.
    pub frequency_b: f64,
    /// Absolute frequency difference, the ranking key.
    pub score: f64,
}

/// Fraction of member trajectories whose signature ever contains `reaction`.
fn dominance_frequency(signatures: &[Signature], members: &[usize], reaction: usize) -> f64 {
    let hits = members
        .iter()
        .filter(|&&t| signatures[t].contains_reaction(reaction))
        .count();
    hits as f64 / members.len() as f64
}

/// Identify the reactions that distinguish each pair of clusters.
///
/// # Arguments
/// * `signatures` - One signature per trajectory, in trajectory order
/// * `assignment` - Cluster partition of the same trajectories
/// * `n_reactions` - Number of reactions in the network
/// * `threshold` - Minimum frequency difference to report, in [0, 1]
///
/// # Returns
/// Drivers sorted by descending score; ties broken by reaction index, then
/// by cluster pair. With fewer than two clusters the result is empty.
pub fn identify_drivers(
    signatures: &[Signature],
    assignment: &ClusterAssignment,
    n_reactions: usize,
    threshold: f64,
) -> Vec<Driver> {
    let members: Vec<Vec<usize>> = (0..assignment.n_clusters())
        .map(|c| assignment.members(c))
        .collect();

    let mut drivers = Vec::new();
    for a in 0..members.len() {
        for b in a + 1..members.len() {
            for reaction in 0..n_reactions {
                let frequency_a = dominance_frequency(signatures, &members[a], reaction);
                let frequency_b = dominance_frequency(signatures, &members[b], reaction);
                let score = (frequency_a - frequency_b).abs();
                if score > threshold {
                    drivers.push(Driver {
                        reaction,
                        cluster_a: a,
                        cluster_b: b,
                        frequency_a,
                        frequency_b,
                        score,
                    });
                }
            }
        }
    }

    drivers.sort_by(|x, y| {
        y.score
            .total_cmp(&x.score)
            .then(x.reaction.cmp(&y.reaction))
            .then(x.cluster_a.cmp(&y.cluster_a))
            .then(x.cluster_b.cmp(&y.cluster_b))
    });
    drivers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{cluster, ClusterConfig};
    use crate::tropical::{build_signature, Dominance};
    use ndarray::array;
    use std::collections::BTreeSet;

    fn dom(reactions: &[usize]) -> Dominance {
        Dominance::Dominant(reactions.iter().copied().collect::<BTreeSet<_>>())
    }

    /// Four trajectories in two clusters. Reaction 0 dominates everywhere;
    /// reaction 1 only in the first cluster, reaction 2 only in the second.
    fn clustered_signatures() -> (Vec<Signature>, ClusterAssignment) {
        let times = [0.0, 1.0, 2.0];
        let signatures = vec![
            build_signature(&[dom(&[0]), dom(&[1]), dom(&[1])], &times, 0, 0),
            build_signature(&[dom(&[0]), dom(&[1]), dom(&[1])], &times, 0, 1),
            build_signature(&[dom(&[0]), dom(&[2]), dom(&[2])], &times, 0, 2),
            build_signature(&[dom(&[0]), dom(&[2]), dom(&[2])], &times, 0, 3),
        ];
        let d = crate::distance::distance_matrix(&signatures);
        let assignment = cluster(d.view(), &ClusterConfig::with_count(2)).unwrap();
        (signatures, assignment)
    }

    #[test]
    fn test_distinguishing_reactions_reported() {
        let (signatures, assignment) = clustered_signatures();
        let drivers = identify_drivers(&signatures, &assignment, 3, 0.1);

        // Reactions 1 and 2 separate the clusters completely, reaction 0 does not
        assert_eq!(drivers.len(), 2);
        assert_eq!(drivers[0].reaction, 1);
        assert_eq!(drivers[1].reaction, 2);
        for d in &drivers {
            assert!((d.score - 1.0).abs() < 1e-12);
        }
        assert!((drivers[0].frequency_a - 1.0).abs() < 1e-12);
        assert!((drivers[0].frequency_b - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_shared_reaction_is_not_a_driver() {
        let (signatures, assignment) = clustered_signatures();
        let drivers = identify_drivers(&signatures, &assignment, 3, 0.1);
        assert!(drivers.iter().all(|d| d.reaction != 0));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let (signatures, assignment) = clustered_signatures();
        // Every score is exactly 1.0; a threshold of 1.0 reports nothing
        let drivers = identify_drivers(&signatures, &assignment, 3, 1.0);
        assert!(drivers.is_empty());
    }

    #[test]
    fn test_single_cluster_yields_no_drivers() {
        let (signatures, _) = clustered_signatures();
        let d = crate::distance::distance_matrix(&signatures);
        let one = cluster(d.view(), &ClusterConfig::with_count(1)).unwrap();
        assert!(identify_drivers(&signatures, &one, 3, 0.1).is_empty());
    }

    #[test]
    fn test_ordering_is_deterministic() {
        let (signatures, assignment) = clustered_signatures();
        let a = identify_drivers(&signatures, &assignment, 3, 0.1);
        let b = identify_drivers(&signatures, &assignment, 3, 0.1);
        assert_eq!(a, b);
        // Equal scores fall back to reaction index order
        assert!(a.windows(2).all(|w| {
            w[0].score > w[1].score || w[0].reaction < w[1].reaction
        }));
    }

    #[test]
    fn test_partial_frequency_difference() {
        let times = [0.0, 1.0, 2.0];
        // Cluster 0: reaction 1 dominant in 2 of 3 members. Cluster 1: never.
        let signatures = vec![
            build_signature(&[dom(&[1]), dom(&[1]), dom(&[1])], &times, 0, 0),
            build_signature(&[dom(&[1]), dom(&[1]), dom(&[1])], &times, 0, 1),
            build_signature(&[dom(&[0]), dom(&[0]), dom(&[0])], &times, 0, 2),
            build_signature(&[dom(&[2]), dom(&[2]), dom(&[2])], &times, 0, 3),
        ];
        let d = array![
            [0.0, 0.0, 1.0, 9.0],
            [0.0, 0.0, 1.0, 9.0],
            [1.0, 1.0, 0.0, 9.0],
            [9.0, 9.0, 9.0, 0.0],
        ];
        let assignment = cluster(d.view(), &ClusterConfig::with_count(2)).unwrap();
        assert_eq!(assignment.labels(), &[0, 0, 0, 1]);

        let drivers = identify_drivers(&signatures, &assignment, 3, 0.5);
        let r1 = drivers.iter().find(|d| d.reaction == 1).unwrap();
        assert!((r1.frequency_a - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(r1.frequency_b, 0.0);
        assert!((r1.score - 2.0 / 3.0).abs() < 1e-12);
    }
}
