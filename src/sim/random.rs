//! Weighted discrete sampling
//!
//! Spawn distributions are weight tables summing to ~1. The interpolated
//! variant blends two tables by the difficulty progress `t`, letting the
//! spawn mix evolve continuously over a run without discrete switches.

use rand::Rng;

use crate::lerp;

/// Draw an index from a normalized weight table.
///
/// Caller contract: weights are non-negative and sum to ~1; no normalization
/// is performed. If the table sums below one (rounding), the last index soaks
/// up the remainder.
pub fn sample_weighted<R: Rng>(rng: &mut R, weights: &[f32]) -> usize {
    debug_assert!(!weights.is_empty());

    let p: f32 = rng.random();

    let mut threshold = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        threshold += w;
        if p < threshold {
            return i;
        }
    }
    weights.len() - 1
}

/// Draw an index from the element-wise blend of two weight tables at `t`
pub fn sample_weighted_interpolated<R: Rng>(
    rng: &mut R,
    weights_a: &[f32],
    weights_b: &[f32],
    t: f32,
) -> usize {
    debug_assert_eq!(weights_a.len(), weights_b.len());
    debug_assert!(!weights_a.is_empty());

    let p: f32 = rng.random();

    let mut threshold = 0.0;
    for (i, (&a, &b)) in weights_a.iter().zip(weights_b).enumerate() {
        threshold += lerp(a, b, t);
        if p < threshold {
            return i;
        }
    }
    weights_a.len() - 1
}
