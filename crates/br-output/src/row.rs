//! Plain data row types written by output backends.

use br_eval::Objectives;

/// One final-population candidate, with connectivity de-negated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParetoRow {
    pub cost:            f64,
    pub average_eipw:    f64,
    pub difference_eipw: f64,
}

impl From<&Objectives> for ParetoRow {
    fn from(o: &Objectives) -> Self {
        Self {
            cost:            o.cost,
            average_eipw:    o.average_eipw(),
            difference_eipw: o.fairness,
        }
    }
}

/// Summary statistics for one completed generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSummaryRow {
    pub generation:          u64,
    pub population:          u64,
    /// Candidates on the non-dominated front.
    pub front0:              u64,
    pub min_cost:            f64,
    pub best_average_eipw:   f64,
    pub min_difference_eipw: f64,
}
