//! Dominance discretization.
//!
//! Converts the continuous term contributions at each instant into the
//! identity of the dominant reaction(s). Co-dominance is a first-class state:
//! the result is always an explicit set, never a single winner index.

use std::collections::BTreeSet;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use super::evaluator::TermContributions;

/// Dominant reactions of one species at one time point.
///
/// `Dominant` always holds a non-empty set; when every term is zero the
/// assignment is the `NoFlux` marker instead of an empty set.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dominance {
    /// All terms are exactly zero at this instant.
    NoFlux,
    /// Reactions within tolerance of the maximum magnitude.
    Dominant(BTreeSet<usize>),
}

impl Dominance {
    /// Whether a reaction is part of the dominant set.
    pub fn contains(&self, reaction: usize) -> bool {
        match self {
            Dominance::NoFlux => false,
            Dominance::Dominant(set) => set.contains(&reaction),
        }
    }

    /// Number of co-dominant reactions (zero for `NoFlux`).
    pub fn len(&self) -> usize {
        match self {
            Dominance::NoFlux => 0,
            Dominance::Dominant(set) => set.len(),
        }
    }

    /// True when no reaction is dominant, i.e. for the `NoFlux` marker.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True for the `NoFlux` marker.
    pub fn is_no_flux(&self) -> bool {
        matches!(self, Dominance::NoFlux)
    }

    /// Dominant reaction indices as a slice-backed iterator.
    pub fn reactions(&self) -> impl Iterator<Item = usize> + '_ {
        let set = match self {
            Dominance::NoFlux => None,
            Dominance::Dominant(set) => Some(set),
        };
        set.into_iter().flatten().copied()
    }
}

/// Dominant set of one time point's term values.
///
/// A term is dominant when its absolute magnitude satisfies
/// `|v| >= (1 - tolerance) * max|v|` (inclusive). `tolerance` is a relative
/// fraction of the maximum: 0 keeps only exact maxima, values >= 1 keep every
/// term, and negative values are treated as 0 so the dominant set can never
/// come out empty. All-zero terms yield `NoFlux`.
///
/// # Arguments
/// * `values` - Term values at one instant, parallel to `reactions`
/// * `reactions` - Reaction index of each term
/// * `tolerance` - Relative co-dominance threshold, clamped to [0, inf)
pub fn dominant_at(values: ArrayView1<f64>, reactions: &[usize], tolerance: f64) -> Dominance {
    let max_mag = values.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if max_mag == 0.0 {
        return Dominance::NoFlux;
    }

    let threshold = (1.0 - tolerance.max(0.0)).max(0.0) * max_mag;
    let set: BTreeSet<usize> = values
        .iter()
        .zip(reactions.iter())
        .filter(|(v, _)| v.abs() >= threshold)
        .map(|(_, &r)| r)
        .collect();

    debug_assert!(!set.is_empty());
    Dominance::Dominant(set)
}

/// Discretize a full trajectory's term contributions into one dominance
/// assignment per time point.
pub fn discretize(terms: &TermContributions, tolerance: f64) -> Vec<Dominance> {
    (0..terms.n_times())
        .map(|t| dominant_at(terms.values_at(t), terms.reactions(), tolerance))
        .collect()
}
