//! Non-dominated sorting and crowding distance.
//!
//! # Fast non-dominated sort
//!
//! For every pair `(p, q)` record whether `p` dominates `q`.  Front 0 holds
//! every candidate nobody dominates; removing it and decrementing the
//! domination counters of whatever it dominated yields front 1, and so on.
//! O(M·N²) for M objectives and N candidates.
//!
//! # Crowding distance
//!
//! Within one front, per objective: sort by that objective, give the two
//! extremes `∞`, and add `(next − prev) / (max − min)` to every interior
//! member.  An objective whose range is zero contributes nothing, not even
//! boundary points.  Fronts of one or two members are all boundary.

use std::cmp::Ordering;

use br_eval::Objectives;

use crate::population::Candidate;

/// Partition `objectives` into Pareto fronts (indices into the slice).
///
/// Front order is rank order; within a front indices are ascending.
pub fn fast_non_dominated_sort(objectives: &[Objectives]) -> Vec<Vec<usize>> {
    let n = objectives.len();
    let mut dominated_by_me: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut domination_count = vec![0usize; n];

    for p in 0..n {
        for q in (p + 1)..n {
            if objectives[p].dominates(&objectives[q]) {
                dominated_by_me[p].push(q);
                domination_count[q] += 1;
            } else if objectives[q].dominates(&objectives[p]) {
                dominated_by_me[q].push(p);
                domination_count[p] += 1;
            }
        }
    }

    let mut fronts = Vec::new();
    let mut current: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();
    while !current.is_empty() {
        let mut next = Vec::new();
        for &p in &current {
            for &q in &dominated_by_me[p] {
                domination_count[q] -= 1;
                if domination_count[q] == 0 {
                    next.push(q);
                }
            }
        }
        next.sort_unstable();
        fronts.push(current);
        current = next;
    }
    fronts
}

/// Crowding distance of each member of `front`, aligned with `front`.
pub fn crowding_distance(objectives: &[Objectives], front: &[usize]) -> Vec<f64> {
    let len = front.len();
    let mut distance = vec![0.0; len];
    if len <= 2 {
        distance.fill(f64::INFINITY);
        return distance;
    }

    let values: Vec<[f64; Objectives::COUNT]> = front.iter().map(|&i| objectives[i].as_array()).collect();
    let mut order: Vec<usize> = (0..len).collect();

    for m in 0..Objectives::COUNT {
        order.sort_by(|&a, &b| values[a][m].total_cmp(&values[b][m]));
        let min = values[order[0]][m];
        let max = values[order[len - 1]][m];

        let range = max - min;
        if range <= 0.0 {
            continue;
        }

        distance[order[0]] = f64::INFINITY;
        distance[order[len - 1]] = f64::INFINITY;
        for k in 1..len - 1 {
            let i = order[k];
            if distance[i].is_finite() {
                distance[i] += (values[order[k + 1]][m] - values[order[k - 1]][m]) / range;
            }
        }
    }
    distance
}

/// Crowded-comparison order: lower rank first, then larger crowding
/// distance first.
pub fn crowded_cmp(a: &Candidate, b: &Candidate) -> Ordering {
    a.rank.cmp(&b.rank).then_with(|| b.crowding.total_cmp(&a.crowding))
}

/// Assign `rank` and `crowding` to every candidate, then stable-sort by
/// [`crowded_cmp`].
///
/// Candidates without objectives get rank `usize::MAX` and end up last.
pub fn rank_and_crowd(candidates: &mut [Candidate]) {
    let evaluated: Vec<usize> = (0..candidates.len()).filter(|&i| candidates[i].is_evaluated()).collect();
    let objectives: Vec<Objectives> = evaluated.iter().filter_map(|&i| candidates[i].objectives).collect();

    for c in candidates.iter_mut() {
        c.rank = usize::MAX;
        c.crowding = 0.0;
    }

    for (rank, front) in fast_non_dominated_sort(&objectives).iter().enumerate() {
        let distance = crowding_distance(&objectives, front);
        for (&local, d) in front.iter().zip(distance) {
            let c = &mut candidates[evaluated[local]];
            c.rank = rank;
            c.crowding = d;
        }
    }

    candidates.sort_by(crowded_cmp);
}
