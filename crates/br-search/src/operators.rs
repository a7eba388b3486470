//! Selection, crossover and mutation on bit vectors.

use br_core::SimRng;

use crate::population::Candidate;
use crate::sort::crowded_cmp;

/// Single-point crossover.
///
/// Picks `k` uniformly in `[0, n − 1]` and returns `a[..k] ++ b[k..]`.  The
/// parents are untouched.  `k = 0` yields a copy of `b`.
pub fn crossover(a: &[bool], b: &[bool], rng: &mut SimRng) -> Vec<bool> {
    debug_assert_eq!(a.len(), b.len());
    if a.is_empty() {
        return Vec::new();
    }
    let k = rng.gen_range(0..a.len());
    let mut child = Vec::with_capacity(a.len());
    child.extend_from_slice(&a[..k]);
    child.extend_from_slice(&b[k..]);
    child
}

/// Flip exactly one uniformly chosen bit in place.
pub fn mutate(decision: &mut [bool], rng: &mut SimRng) {
    if decision.is_empty() {
        return;
    }
    let i = rng.gen_range(0..decision.len());
    decision[i] = !decision[i];
}

/// Binary tournament: draw two indices, keep the better under the crowded
/// comparison (ties go to the first draw).
pub fn tournament(candidates: &[Candidate], rng: &mut SimRng) -> usize {
    let i = rng.gen_range(0..candidates.len());
    let j = rng.gen_range(0..candidates.len());
    if crowded_cmp(&candidates[j], &candidates[i]).is_lt() { j } else { i }
}

/// Two parents by tournament, distinct whenever there are at least two
/// candidates.
pub fn select_parents(candidates: &[Candidate], rng: &mut SimRng) -> (usize, usize) {
    let a = tournament(candidates, rng);
    if candidates.len() < 2 {
        return (a, a);
    }
    let mut b = tournament(candidates, rng);
    while b == a {
        b = tournament(candidates, rng);
    }
    (a, b)
}
