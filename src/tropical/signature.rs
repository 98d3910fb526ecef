//! Dynamic signatures: run-length encoding of dominance over time.
//!
//! A signature is the durable unit of the analysis: it summarizes one
//! (species, trajectory) pair as maximal runs of an unchanged dominant set.

use serde::{Deserialize, Serialize};

use super::dominance::Dominance;

/// One maximal run of an unchanged dominant set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub dominance: Dominance,
    /// Sum of the time-step widths the run covers.
    pub duration: f64,
}

/// Discrete signature of one species along one trajectory.
///
/// Invariants: segments are non-empty, no segment holds an empty dominant
/// set, and durations sum to the trajectory's time span.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    species: usize,
    trajectory: usize,
    segments: Vec<Segment>,
    span: f64,
}

impl Signature {
    /// Species index this signature describes.
    #[inline]
    pub fn species(&self) -> usize {
        self.species
    }

    /// Trajectory index this signature was built from.
    #[inline]
    pub fn trajectory(&self) -> usize {
        self.trajectory
    }

    /// Segments in time order.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    #[inline]
    pub fn n_segments(&self) -> usize {
        self.segments.len()
    }

    /// Total time span covered.
    #[inline]
    pub fn span(&self) -> f64 {
        self.span
    }

    /// Whether a reaction is dominant anywhere in the signature.
    pub fn contains_reaction(&self, reaction: usize) -> bool {
        self.segments
            .iter()
            .any(|seg| seg.dominance.contains(reaction))
    }

    /// Structural equality: same dominance sequence, durations ignored.
    ///
    /// Used as an exact-match fast path before computing an alignment
    /// distance; structural equality implies a distance of zero.
    pub fn structurally_equal(&self, other: &Signature) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(other.segments.iter())
                .all(|(a, b)| a.dominance == b.dominance)
    }
}

/// Collapse a per-time-point dominance sequence into a signature.
///
/// The assignment at time point `i` labels the interval `[t_i, t_{i+1})`;
/// consecutive intervals with equal dominance merge into one segment. The
/// final time point closes the last interval and opens none, so segment
/// boundaries depend only on dominance changes and durations sum exactly to
/// the time span. A single-point grid yields one zero-duration segment.
///
/// # Arguments
/// * `assignments` - One dominance per time point, same length as `times`
/// * `times` - Strictly increasing time grid
/// * `species` - Species index, recorded on the signature
/// * `trajectory` - Trajectory index, recorded on the signature
pub fn build_signature(
    assignments: &[Dominance],
    times: &[f64],
    species: usize,
    trajectory: usize,
) -> Signature {
    debug_assert_eq!(assignments.len(), times.len());
    debug_assert!(!times.is_empty());

    let n = times.len();
    if n == 1 {
        return Signature {
            species,
            trajectory,
            segments: vec![Segment {
                dominance: assignments[0].clone(),
                duration: 0.0,
            }],
            span: 0.0,
        };
    }

    let mut segments: Vec<Segment> = Vec::new();
    for i in 0..n - 1 {
        let width = times[i + 1] - times[i];
        match segments.last_mut() {
            Some(last) if last.dominance == assignments[i] => last.duration += width,
            _ => segments.push(Segment {
                dominance: assignments[i].clone(),
                duration: width,
            }),
        }
    }

    Signature {
        species,
        trajectory,
        segments,
        span: times[n - 1] - times[0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn dom(reactions: &[usize]) -> Dominance {
        Dominance::Dominant(reactions.iter().copied().collect::<BTreeSet<_>>())
    }

    #[test]
    fn test_constant_dominance_is_one_segment() {
        let assignments = vec![dom(&[0]); 5];
        let times = [0.0, 1.0, 2.0, 3.0, 4.0];
        let sig = build_signature(&assignments, &times, 0, 0);

        assert_eq!(sig.n_segments(), 1);
        assert!((sig.segments()[0].duration - 4.0).abs() < 1e-12);
        assert!((sig.span() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_boundaries_at_dominance_changes() {
        let assignments = vec![dom(&[0]), dom(&[0]), dom(&[1]), dom(&[1]), dom(&[0])];
        // Uneven grid: widths 0.5, 0.5, 2.0, 1.0
        let times = [0.0, 0.5, 1.0, 3.0, 4.0];
        let sig = build_signature(&assignments, &times, 0, 0);

        assert_eq!(sig.n_segments(), 3);
        assert_eq!(sig.segments()[0].dominance, dom(&[0]));
        assert!((sig.segments()[0].duration - 1.0).abs() < 1e-12);
        assert_eq!(sig.segments()[1].dominance, dom(&[1]));
        assert!((sig.segments()[1].duration - 3.0).abs() < 1e-12);
        // The final point closes the last interval; its assignment opens none
        assert_eq!(sig.segments()[2].dominance, dom(&[1]));
    }

    #[test]
    fn test_durations_sum_to_span() {
        let assignments = vec![
            dom(&[0]),
            dom(&[1]),
            Dominance::NoFlux,
            dom(&[1, 2]),
            dom(&[1, 2]),
            dom(&[0]),
        ];
        let times = [0.0, 0.3, 0.9, 1.4, 2.8, 5.0];
        let sig = build_signature(&assignments, &times, 0, 0);

        let total: f64 = sig.segments().iter().map(|s| s.duration).sum();
        assert!((total - sig.span()).abs() < 1e-12);
    }

    #[test]
    fn test_single_point_grid() {
        let sig = build_signature(&[dom(&[2])], &[1.5], 0, 0);
        assert_eq!(sig.n_segments(), 1);
        assert_eq!(sig.span(), 0.0);
    }

    #[test]
    fn test_structural_equality_ignores_durations() {
        let a = build_signature(
            &[dom(&[0]), dom(&[1]), dom(&[1])],
            &[0.0, 1.0, 2.0],
            0,
            0,
        );
        let b = build_signature(
            &[dom(&[0]), dom(&[1]), dom(&[1])],
            &[0.0, 5.0, 6.0],
            0,
            1,
        );
        assert!(a.structurally_equal(&b));
        assert_ne!(a, b);

        let c = build_signature(
            &[dom(&[0]), dom(&[2]), dom(&[2])],
            &[0.0, 1.0, 2.0],
            0,
            2,
        );
        assert!(!a.structurally_equal(&c));
    }

    #[test]
    fn test_contains_reaction() {
        let sig = build_signature(
            &[dom(&[0]), dom(&[1, 3]), dom(&[1, 3])],
            &[0.0, 1.0, 2.0],
            0,
            0,
        );
        assert!(sig.contains_reaction(0));
        assert!(sig.contains_reaction(3));
        assert!(!sig.contains_reaction(2));
    }
}
