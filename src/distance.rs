//! Signature dissimilarity and parallel distance-matrix computation.
//!
//! Signatures are compared with a global alignment over their segment
//! sequences: substituting one dominant set for another costs its Jaccard
//! distance weighted by segment duration, and unmatched segments pay their
//! own duration as insertion/deletion cost. Long-lived segments therefore
//! dominate the distance, brief flickers barely register.

use ndarray::Array2;
use rayon::prelude::*;

use crate::tropical::{Dominance, Signature};

/// Jaccard distance between two dominant sets.
///
/// 0 when identical, 1 when disjoint, the symmetric-difference fraction in
/// between. `NoFlux` behaves as the empty set: disjoint from every non-empty
/// set, identical to itself.
#[inline]
pub fn substitution_cost(a: &Dominance, b: &Dominance) -> f64 {
    if a == b {
        return 0.0;
    }

    let mut intersection = 0u32;
    let mut union = b.len() as u32;
    for r in a.reactions() {
        if b.contains(r) {
            intersection += 1;
        } else {
            union += 1;
        }
    }

    if union == 0 {
        0.0
    } else {
        1.0 - intersection as f64 / union as f64
    }
}

/// Duration-weighted alignment distance between two signatures.
///
/// Needleman-Wunsch over segments: matching segment pairs cost the Jaccard
/// distance of their dominant sets scaled by the mean of the two durations;
/// unmatched segments cost their full duration. Structurally equal signatures
/// short-circuit to exactly zero.
pub fn signature_distance(a: &Signature, b: &Signature) -> f64 {
    if a.structurally_equal(b) {
        return 0.0;
    }

    let sa = a.segments();
    let sb = b.segments();
    let (n, m) = (sa.len(), sb.len());

    // dp[i][j] = distance between the first i segments of a and first j of b
    let mut dp = vec![0.0_f64; (n + 1) * (m + 1)];
    let idx = |i: usize, j: usize| i * (m + 1) + j;
    for i in 1..=n {
        dp[idx(i, 0)] = dp[idx(i - 1, 0)] + sa[i - 1].duration;
    }
    for j in 1..=m {
        dp[idx(0, j)] = dp[idx(0, j - 1)] + sb[j - 1].duration;
    }

    for i in 1..=n {
        for j in 1..=m {
            let sub = substitution_cost(&sa[i - 1].dominance, &sb[j - 1].dominance)
                * 0.5
                * (sa[i - 1].duration + sb[j - 1].duration);
            let substitute = dp[idx(i - 1, j - 1)] + sub;
            let delete = dp[idx(i - 1, j)] + sa[i - 1].duration;
            let insert = dp[idx(i, j - 1)] + sb[j - 1].duration;
            dp[idx(i, j)] = substitute.min(delete).min(insert);
        }
    }

    dp[idx(n, m)]
}

/// Compute the pairwise distance matrix for a set of signatures.
///
/// # Arguments
/// * `signatures` - One signature per trajectory, in trajectory order
///
/// # Returns
/// Symmetric (n, n) matrix with a zero diagonal.
///
/// # Performance
/// The upper triangle is computed in parallel with rayon, then mirrored.
pub fn distance_matrix(signatures: &[Signature]) -> Array2<f64> {
    let n = signatures.len();
    let mut distances = Array2::<f64>::zeros((n, n));

    let indices: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
        .collect();

    let dists: Vec<((usize, usize), f64)> = indices
        .par_iter()
        .map(|&(i, j)| {
            let dist = signature_distance(&signatures[i], &signatures[j]);
            ((i, j), dist)
        })
        .collect();

    for ((i, j), dist) in dists {
        distances[[i, j]] = dist;
        distances[[j, i]] = dist;
    }

    distances
}
