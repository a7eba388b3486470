//! Unit tests for br-search.

#[cfg(test)]
mod helpers {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use br_core::{RunConfig, SimRng};
    use br_eval::{EvalError, EvalResult, ObjectiveFunction, Objectives};

    /// Cheap stand-in for the fitness evaluator.
    ///
    /// Cost counts retrofits, connectivity rewards retrofitting
    /// high-index bridges, fairness penalises imbalance between the two
    /// halves plus a little RNG noise.
    pub struct BitObjectives {
        pub dimension: usize,
        pub calls:     AtomicUsize,
    }

    impl BitObjectives {
        pub fn new(dimension: usize) -> Self {
            Self { dimension, calls: AtomicUsize::new(0) }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::Relaxed)
        }
    }

    impl ObjectiveFunction for BitObjectives {
        fn dimension(&self) -> usize {
            self.dimension
        }

        fn evaluate(&self, decision: &[bool], rng: &mut SimRng) -> EvalResult<Objectives> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            let half = decision.len() / 2;
            let ones = |bits: &[bool]| bits.iter().filter(|&&b| b).count() as f64;
            let weighted: f64 = decision
                .iter()
                .enumerate()
                .filter(|&(_, &b)| b)
                .map(|(i, _)| (i + 1) as f64)
                .sum();
            Ok(Objectives::new(
                ones(decision),
                -weighted,
                (ones(&decision[..half]) - ones(&decision[half..])).abs() + rng.uniform() * 1e-3,
            ))
        }
    }

    pub struct FailingObjectives;

    impl ObjectiveFunction for FailingObjectives {
        fn dimension(&self) -> usize {
            4
        }

        fn evaluate(&self, _: &[bool], _: &mut SimRng) -> EvalResult<Objectives> {
            Err(EvalError::DegenerateInput("always fails".into()))
        }
    }

    /// Objectives taken straight from the candidate's RNG stream: the cost
    /// is its first uniform draw.
    pub struct DrawObjectives;

    impl ObjectiveFunction for DrawObjectives {
        fn dimension(&self) -> usize {
            3
        }

        fn evaluate(&self, _: &[bool], rng: &mut SimRng) -> EvalResult<Objectives> {
            Ok(Objectives::new(rng.uniform(), 0.0, 0.0))
        }
    }

    pub fn config(ini: usize, pop: usize, generations: usize) -> RunConfig {
        RunConfig {
            ini_num_population:    ini,
            search_num_population: pop,
            num_generation:        generations,
            ..RunConfig::default()
        }
    }
}

// ── Sorting ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sort {
    use br_eval::Objectives;

    use crate::population::Candidate;
    use crate::sort::{crowding_distance, fast_non_dominated_sort, rank_and_crowd};

    fn o(a: f64, b: f64, c: f64) -> Objectives {
        Objectives::new(a, b, c)
    }

    #[test]
    fn fronts_follow_dominance() {
        let objs = [
            o(1.0, -1.0, 0.0), // 0: front 0
            o(2.0, -2.0, 0.0), // 1: front 0 (trade-off with 0)
            o(2.0, -1.0, 0.0), // 2: dominated by 0 and 1
            o(3.0, -1.0, 1.0), // 3: dominated by 2
        ];
        let fronts = fast_non_dominated_sort(&objs);
        assert_eq!(fronts, vec![vec![0, 1], vec![2], vec![3]]);
    }

    #[test]
    fn identical_points_share_a_front() {
        let objs = [o(1.0, 1.0, 1.0); 3];
        assert_eq!(fast_non_dominated_sort(&objs), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn empty_input_has_no_fronts() {
        assert!(fast_non_dominated_sort(&[]).is_empty());
    }

    #[test]
    fn crowding_boundaries_are_infinite() {
        let objs = [o(0.0, 0.0, 0.0), o(1.0, -1.0, 0.0), o(4.0, -4.0, 0.0)];
        let d = crowding_distance(&objs, &[0, 1, 2]);
        assert!(d[0].is_infinite() && d[2].is_infinite());
        // Interior: (4 - 0) / 4 on each of the two non-constant objectives.
        assert!((d[1] - 2.0).abs() < 1e-12, "got {}", d[1]);
    }

    #[test]
    fn small_fronts_are_all_boundary() {
        let objs = [o(0.0, 0.0, 0.0), o(1.0, -1.0, 0.0)];
        assert!(crowding_distance(&objs, &[0, 1]).iter().all(|d| d.is_infinite()));
        assert!(crowding_distance(&objs, &[1]).iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn rank_and_crowd_orders_population() {
        let mut cands: Vec<Candidate> = [o(3.0, -1.0, 1.0), o(1.0, -1.0, 0.0), o(2.0, -2.0, 0.0)]
            .into_iter()
            .map(|obj| Candidate { objectives: Some(obj), ..Candidate::new(vec![]) })
            .collect();
        cands.push(Candidate::new(vec![]));
        rank_and_crowd(&mut cands);

        let ranks: Vec<usize> = cands.iter().map(|c| c.rank).collect();
        assert_eq!(ranks, vec![0, 0, 1, usize::MAX]);
        assert!(cands[3].objectives.is_none());
    }
}

// ── Operators ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod operators {
    use br_core::SimRng;
    use br_eval::Objectives;

    use crate::operators::{crossover, mutate, select_parents, tournament};
    use crate::population::Candidate;

    #[test]
    fn crossover_is_prefix_of_a_and_suffix_of_b() {
        let a = vec![true; 10];
        let b = vec![false; 10];
        let mut rng = SimRng::new(7);
        for _ in 0..200 {
            let child = crossover(&a, &b, &mut rng);
            assert_eq!(child.len(), 10);
            let k = child.iter().take_while(|&&x| x).count();
            assert!(child[k..].iter().all(|&x| !x), "not a single cut: {child:?}");
            assert!(k < 10, "cut point must lie in [0, n-1]");
        }
        assert_eq!(a, vec![true; 10]);
        assert_eq!(b, vec![false; 10]);
    }

    #[test]
    fn crossover_visits_every_cut_point() {
        let a = vec![true; 4];
        let b = vec![false; 4];
        let mut rng = SimRng::new(3);
        let mut seen = [false; 4];
        for _ in 0..500 {
            let k = crossover(&a, &b, &mut rng).iter().filter(|&&x| x).count();
            seen[k] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn mutation_flips_exactly_one_bit() {
        let mut rng = SimRng::new(11);
        for _ in 0..100 {
            let before = vec![true, false, true, true, false, false];
            let mut after = before.clone();
            mutate(&mut after, &mut rng);
            let flipped = before.iter().zip(&after).filter(|(x, y)| x != y).count();
            assert_eq!(flipped, 1);
        }
    }

    #[test]
    fn two_mutations_at_distinct_bits_never_restore() {
        let before = vec![false, true, true, false, true, false, false, true];
        let flipped = |x: &[bool], y: &[bool]| -> Vec<usize> {
            x.iter().zip(y).enumerate().filter(|(_, (a, b))| a != b).map(|(i, _)| i).collect()
        };
        let mut rng = SimRng::new(5);
        let mut distinct = 0;
        for _ in 0..200 {
            let mut once = before.clone();
            mutate(&mut once, &mut rng);
            let mut twice = once.clone();
            mutate(&mut twice, &mut rng);

            let (i, j) = (flipped(&before, &once)[0], flipped(&once, &twice)[0]);
            if i != j {
                distinct += 1;
                assert_ne!(twice, before);
                assert_eq!(flipped(&before, &twice), {
                    let mut both = vec![i, j];
                    both.sort();
                    both
                });
            } else {
                assert_eq!(twice, before);
            }
        }
        assert!(distinct > 0);
    }

    #[test]
    fn mutation_of_empty_vector_is_noop() {
        let mut empty: Vec<bool> = Vec::new();
        mutate(&mut empty, &mut SimRng::new(1));
        assert!(empty.is_empty());
    }

    fn ranked(rank: usize, crowding: f64) -> Candidate {
        Candidate {
            decision:   vec![false],
            objectives: Some(Objectives::new(0.0, 0.0, 0.0)),
            rank,
            crowding,
        }
    }

    #[test]
    fn tournament_prefers_lower_rank() {
        let pop = vec![ranked(1, f64::INFINITY), ranked(0, 0.0)];
        let mut rng = SimRng::new(5);
        let wins = (0..400).filter(|_| tournament(&pop, &mut rng) == 1).count();
        // Index 0 only wins when drawn twice (≈ 1/4 of tournaments).
        assert!(wins > 250, "rank-0 won {wins} of 400");
    }

    #[test]
    fn tournament_breaks_rank_ties_by_crowding() {
        let pop = vec![ranked(0, 0.5), ranked(0, 2.0)];
        let mut rng = SimRng::new(6);
        let wins = (0..400).filter(|_| tournament(&pop, &mut rng) == 1).count();
        assert!(wins > 250, "sparser candidate won {wins} of 400");
    }

    #[test]
    fn parents_are_distinct() {
        let pop = vec![ranked(0, 1.0), ranked(0, 1.0), ranked(1, 1.0)];
        let mut rng = SimRng::new(9);
        for _ in 0..100 {
            let (a, b) = select_parents(&pop, &mut rng);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn single_candidate_is_its_own_partner() {
        let pop = vec![ranked(0, 1.0)];
        assert_eq!(select_parents(&pop, &mut SimRng::new(1)), (0, 0));
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::helpers::{config, BitObjectives};
    use crate::{SearchBuilder, SearchError};

    fn build_err(cfg: br_core::RunConfig, dimension: usize) -> SearchError {
        match SearchBuilder::new(&cfg, BitObjectives::new(dimension)).build() {
            Ok(_) => panic!("expected a configuration error"),
            Err(e) => e,
        }
    }

    #[test]
    fn zero_populations_rejected() {
        assert!(matches!(build_err(config(0, 4, 1), 6), SearchError::Config(_)));
        assert!(matches!(build_err(config(4, 0, 1), 6), SearchError::Config(_)));
    }

    #[test]
    fn rates_outside_unit_interval_rejected() {
        let cfg = br_core::RunConfig { mutation_rate: 1.5, ..config(4, 4, 1) };
        assert!(matches!(build_err(cfg, 6), SearchError::Config(_)));
        let cfg = br_core::RunConfig { crossover_rate: -0.1, ..config(4, 4, 1) };
        assert!(matches!(build_err(cfg, 6), SearchError::Config(_)));
    }

    #[test]
    fn zero_bridges_rejected() {
        assert!(matches!(build_err(config(4, 4, 1), 0), SearchError::Config(_)));
    }

    #[test]
    fn seeded_population_length_checked() {
        let res = SearchBuilder::new(&config(4, 4, 1), BitObjectives::new(3))
            .initial_population(vec![vec![true, false]])
            .build();
        assert!(matches!(res, Err(SearchError::Config(_))));
    }

    #[test]
    fn zero_generations_is_allowed() {
        let mut search = SearchBuilder::new(&config(5, 3, 0), BitObjectives::new(4)).build().unwrap();
        let pop = search.run(&mut crate::NoopObserver).unwrap();
        assert_eq!(pop.len(), 5);
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod engine {
    use crate::{NoopObserver, Population, SearchBuilder, SearchError, SearchObserver};

    use super::helpers::{config, BitObjectives, DrawObjectives, FailingObjectives};

    #[derive(Default)]
    struct Recorder {
        starts: Vec<usize>,
        ends:   Vec<(usize, usize)>,
        final_len: Option<usize>,
    }

    impl SearchObserver for Recorder {
        fn on_generation_start(&mut self, generation: usize) {
            self.starts.push(generation);
        }
        fn on_generation_end(&mut self, generation: usize, population: &Population) {
            self.ends.push((generation, population.len()));
        }
        fn on_search_end(&mut self, population: &Population) {
            self.final_len = Some(population.len());
        }
    }

    #[test]
    fn population_is_truncated_to_search_size() {
        let mut search = SearchBuilder::new(&config(12, 5, 4), BitObjectives::new(8)).build().unwrap();
        let pop = search.run(&mut NoopObserver).unwrap();
        assert_eq!(pop.len(), 5);
        assert!(pop.iter().all(|c| c.is_evaluated() && c.decision.len() == 8));
    }

    #[test]
    fn small_initial_population_still_reaches_search_size() {
        let mut search = SearchBuilder::new(&config(2, 6, 2), BitObjectives::new(8)).build().unwrap();
        assert_eq!(search.run(&mut NoopObserver).unwrap().len(), 6);
    }

    #[test]
    fn front_zero_is_non_dominated() {
        let mut search = SearchBuilder::new(&config(20, 10, 6), BitObjectives::new(8)).build().unwrap();
        let pop = search.run(&mut NoopObserver).unwrap();
        assert!(pop.front_len() >= 1);
        for c in pop.front() {
            let mine = c.objectives.unwrap();
            assert!(pop.objectives().all(|other| !other.dominates(&mine)));
        }
    }

    #[test]
    fn population_is_sorted_by_rank() {
        let mut search = SearchBuilder::new(&config(20, 10, 3), BitObjectives::new(8)).build().unwrap();
        let pop = search.run(&mut NoopObserver).unwrap();
        assert!(pop.candidates.windows(2).all(|w| w[0].rank <= w[1].rank));
    }

    #[test]
    fn same_seed_same_population() {
        let run = || {
            let mut search = SearchBuilder::new(&config(10, 6, 5), BitObjectives::new(8)).build().unwrap();
            search.run(&mut NoopObserver).unwrap();
            search.into_population()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn batch_results_follow_candidate_order_not_schedule() {
        use crate::population::Candidate;

        let mut search = SearchBuilder::new(&config(4, 4, 1), DrawObjectives).seed(21).build().unwrap();
        let mut root = search.rng.clone();

        let mut batch: Vec<Candidate> = (0..12).map(|_| Candidate::new(vec![false; 3])).collect();
        let done = br_eval::Objectives::new(-1.0, 0.0, 0.0);
        batch[3].objectives = Some(done);
        search.evaluate_batch(&mut batch).unwrap();

        // Pending candidates draw children 0, 1, 2, ... from the root in
        // order; evaluated ones are skipped and keep their objectives.
        let mut pending = 0;
        for (i, c) in batch.iter().enumerate() {
            if i == 3 {
                assert_eq!(c.objectives, Some(done));
                continue;
            }
            let expected = root.child(pending).uniform();
            assert_eq!(c.objectives.unwrap().cost, expected, "candidate {i}");
            pending += 1;
        }
    }

    #[test]
    fn evaluations_counted_once_per_new_candidate() {
        let objective = BitObjectives::new(6);
        let mut search = SearchBuilder::new(&config(7, 4, 3), objective).build().unwrap();
        search.run(&mut NoopObserver).unwrap();
        assert_eq!(search.objective.calls(), 7 + 3 * 4);
    }

    #[test]
    fn observer_sees_every_generation() {
        let mut search = SearchBuilder::new(&config(6, 4, 3), BitObjectives::new(6)).build().unwrap();
        let mut rec = Recorder::default();
        search.run(&mut rec).unwrap();
        assert_eq!(rec.starts, vec![0, 1, 2]);
        assert_eq!(rec.ends, vec![(0, 4), (1, 4), (2, 4)]);
        assert_eq!(rec.final_len, Some(4));
    }

    #[test]
    fn stepping_matches_run() {
        let cfg = config(8, 4, 3);
        let mut stepped = SearchBuilder::new(&cfg, BitObjectives::new(6)).build().unwrap();
        for _ in 0..3 {
            stepped.step(&mut NoopObserver).unwrap();
        }
        let mut ran = SearchBuilder::new(&cfg, BitObjectives::new(6)).build().unwrap();
        ran.run(&mut NoopObserver).unwrap();
        assert_eq!(stepped.generation, 3);
        assert_eq!(stepped.population, ran.population);
    }

    #[test]
    fn seeded_population_is_evaluated_first() {
        let seeds = vec![vec![true; 6], vec![false; 6], vec![true, false, true, false, true, false]];
        let mut search = SearchBuilder::new(&config(50, 3, 0), BitObjectives::new(6))
            .initial_population(seeds)
            .build()
            .unwrap();
        let pop = search.run(&mut NoopObserver).unwrap();
        assert_eq!(pop.len(), 3);
        assert!(pop.iter().all(|c| c.is_evaluated()));
        assert_eq!(search.objective.calls(), 3);
    }

    #[test]
    fn evaluation_error_aborts_search() {
        let mut search = SearchBuilder::new(&config(4, 4, 2), FailingObjectives).build().unwrap();
        let err = search.run(&mut NoopObserver).unwrap_err();
        assert!(matches!(err, SearchError::Eval(_)));
    }
}

// ── End to end on a real network ──────────────────────────────────────────────

#[cfg(test)]
mod end_to_end {
    use br_core::RunConfig;
    use br_eval::{FitnessEvaluator, ReliabilityEvaluator};
    use br_flow::AugmentingPathSolver;
    use br_network::{BridgeNetworkBuilder, NodeKind};

    use crate::{NoopObserver, SearchBuilder};

    #[test]
    fn small_network_search_produces_valid_front() {
        // R1 ─b0─ X ─b1─ H,  R2 ─b2─ X
        let mut b = BridgeNetworkBuilder::new();
        let r1 = b.add_node("R1", NodeKind::Resident).unwrap();
        let r2 = b.add_node("R2", NodeKind::Resident).unwrap();
        let x  = b.add_node("X", NodeKind::Generic).unwrap();
        let h  = b.add_node("H", NodeKind::Hospital).unwrap();
        b.add_bidirectional_arc(r1, x, None);
        b.add_bidirectional_arc(r2, x, None);
        b.add_bidirectional_arc(x, h, None);
        b.add_bridge(r1, x, 3.0, &[("E", 0.05, 0.6)]);
        b.add_bridge(x, h, 5.0, &[("E", 0.05, 0.6)]);
        b.add_bridge(r2, x, 2.0, &[("E", 0.05, 0.6)]);
        let net = b.build().unwrap();

        let cfg = RunConfig {
            num_scenarios:         20,
            ini_num_population:    8,
            search_num_population: 4,
            num_generation:        3,
            ..RunConfig::default()
        };
        let rel = ReliabilityEvaluator::new(&net, AugmentingPathSolver::default(), &cfg).unwrap();
        let fitness = FitnessEvaluator::new(rel).unwrap();
        let mut search = SearchBuilder::new(&cfg, fitness).build().unwrap();
        let pop = search.run(&mut NoopObserver).unwrap();

        assert_eq!(pop.len(), 4);
        for c in pop {
            let o = c.objectives.unwrap();
            assert!((0.0..=10.0).contains(&o.cost));
            assert!((-1.0..=0.0).contains(&o.neg_mean_connectivity));
            assert!(o.fairness >= 0.0);
        }
    }
}
