//! Candidates and the population that holds them.

use br_core::SimRng;
use br_eval::Objectives;

// ── Candidate ─────────────────────────────────────────────────────────────────

/// One retrofit plan.
///
/// The decision vector is plain data.  `objectives` stays `None` until the
/// engine evaluates the candidate; `rank` and `crowding` are rewritten every
/// time the population is sorted.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// One bit per undirected bridge, `true` = retrofit.
    pub decision:   Vec<bool>,
    pub objectives: Option<Objectives>,
    /// Pareto front index, 0 = non-dominated.
    pub rank:       usize,
    pub crowding:   f64,
}

impl Candidate {
    pub fn new(decision: Vec<bool>) -> Self {
        Self { decision, objectives: None, rank: usize::MAX, crowding: 0.0 }
    }

    /// Uniformly random bits.
    pub fn random(dimension: usize, rng: &mut SimRng) -> Self {
        Self::new((0..dimension).map(|_| rng.gen_bool(0.5)).collect())
    }

    #[inline]
    pub fn is_evaluated(&self) -> bool {
        self.objectives.is_some()
    }

    pub fn retrofit_count(&self) -> usize {
        self.decision.iter().filter(|&&b| b).count()
    }
}

// ── Population ────────────────────────────────────────────────────────────────

/// Ordered set of evaluated candidates.
///
/// After [`sort::rank_and_crowd`](crate::sort::rank_and_crowd) the order is
/// ascending rank, then descending crowding distance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Population {
    pub candidates: Vec<Candidate>,
}

impl Population {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    /// Candidates of rank 0.
    pub fn front(&self) -> impl Iterator<Item = &Candidate> + '_ {
        self.candidates.iter().filter(|c| c.rank == 0)
    }

    pub fn front_len(&self) -> usize {
        self.front().count()
    }

    /// Objectives of every evaluated candidate, in population order.
    pub fn objectives(&self) -> impl Iterator<Item = &Objectives> + '_ {
        self.candidates.iter().filter_map(|c| c.objectives.as_ref())
    }

    /// Best value reached on each objective across the population.
    pub fn stats(&self) -> PopulationStats {
        let mut stats = PopulationStats {
            min_cost:            f64::INFINITY,
            best_average_eipw:   f64::NEG_INFINITY,
            min_difference_eipw: f64::INFINITY,
        };
        for o in self.objectives() {
            stats.min_cost = stats.min_cost.min(o.cost);
            stats.best_average_eipw = stats.best_average_eipw.max(o.average_eipw());
            stats.min_difference_eipw = stats.min_difference_eipw.min(o.fairness);
        }
        stats
    }
}

/// Per-objective bests of a population.  Infinite when nothing is evaluated.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PopulationStats {
    pub min_cost:            f64,
    pub best_average_eipw:   f64,
    pub min_difference_eipw: f64,
}

impl IntoIterator for Population {
    type Item = Candidate;
    type IntoIter = std::vec::IntoIter<Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.into_iter()
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}
