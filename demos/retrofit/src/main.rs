//! retrofit — seismic bridge-retrofit planner.
//!
//! Reads `node.csv`, `arc.csv` and `Bridges.csv` from a data directory (or
//! builds the synthetic river-town network with `--synthetic`), searches for
//! retrofit plans trading off cost, expected hospital connectivity and
//! fairness across residential districts, and writes the final population to
//! `pareto_front.csv`.
//!
//! ```text
//! retrofit <DATA_DIR> [--config run.json] [--out output/retrofit]
//! retrofit --synthetic
//! RUST_LOG=br_eval=debug retrofit --synthetic    # per-candidate objectives
//! ```

mod network;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use br_core::RunConfig;
use br_eval::{FitnessEvaluator, ReliabilityEvaluator};
use br_flow::{AugmentingPathSolver, FlowSolver};
use br_network::{BridgeNetwork, load_network_csv};
use br_output::{CsvWriter, OutputWriter, SearchOutputObserver};
use br_search::{Population, SearchBuilder, SearchObserver};

use network::build_network;

// ── Constants ─────────────────────────────────────────────────────────────────

const NODE_FILE:   &str = "node.csv";
const ARC_FILE:    &str = "arc.csv";
const BRIDGE_FILE: &str = "Bridges.csv";

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "retrofit", about = "Multi-objective bridge retrofit planning under seismic risk")]
struct Cli {
    /// Directory holding node.csv, arc.csv and Bridges.csv
    data_dir: Option<PathBuf>,

    /// JSON file overriding fields of the reference run configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for pareto_front.csv and generation_summaries.csv
    #[arg(long, default_value = "output/retrofit")]
    out: PathBuf,

    /// Use the built-in synthetic network instead of a data directory
    #[arg(long)]
    synthetic: bool,

    /// Solve max-flow as an LP (requires the `lp` feature)
    #[arg(long)]
    lp: bool,
}

fn load_config(path: Option<&Path>) -> Result<RunConfig> {
    let config = match path {
        None => RunConfig::default(),
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .with_context(|| format!("reading config {}", p.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing config {}", p.display()))?
        }
    };
    config.validate()?;
    Ok(config)
}

fn load_network(cli: &Cli) -> Result<BridgeNetwork> {
    if cli.synthetic {
        return Ok(build_network()?);
    }
    let Some(dir) = cli.data_dir.as_deref() else {
        bail!("pass a data directory or --synthetic");
    };
    load_network_csv(&dir.join(NODE_FILE), &dir.join(ARC_FILE), &dir.join(BRIDGE_FILE))
        .with_context(|| format!("loading network from {}", dir.display()))
}

// ── Observer wrapper to count generations ─────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:       SearchOutputObserver<W>,
    generations: usize,
}

impl<W: OutputWriter> SearchObserver for CountingObserver<W> {
    fn on_generation_start(&mut self, generation: usize) {
        self.inner.on_generation_start(generation);
    }

    fn on_generation_end(&mut self, generation: usize, population: &Population) {
        self.generations += 1;
        self.inner.on_generation_end(generation, population);
    }

    fn on_search_end(&mut self, population: &Population) {
        self.inner.on_search_end(population);
    }
}

// ── Run ───────────────────────────────────────────────────────────────────────

fn search<S: FlowSolver>(
    network: &BridgeNetwork,
    solver:  S,
    config:  &RunConfig,
    out:     &Path,
) -> Result<Population> {
    let reliability = ReliabilityEvaluator::new(network, solver, config)?;
    let fitness = FitnessEvaluator::new(reliability)?;
    let mut search = SearchBuilder::new(config, fitness).build()?;

    let writer = CsvWriter::new(out)?;
    let mut obs = CountingObserver { inner: SearchOutputObserver::new(writer), generations: 0 };

    let t0 = Instant::now();
    search.run(&mut obs)?;
    info!(
        generations = obs.generations,
        elapsed_secs = t0.elapsed().as_secs_f64(),
        "search complete"
    );

    if let Some(e) = obs.inner.take_error() {
        return Err(e).context("writing results");
    }
    Ok(search.into_population())
}

#[cfg(feature = "lp")]
fn run(network: &BridgeNetwork, config: &RunConfig, cli: &Cli) -> Result<Population> {
    if cli.lp {
        let solver = br_flow::LpFlowSolver::new(config.solver_time_limit());
        return search(network, solver, config, &cli.out);
    }
    search(network, AugmentingPathSolver::new(config.solver_time_limit()), config, &cli.out)
}

#[cfg(not(feature = "lp"))]
fn run(network: &BridgeNetwork, config: &RunConfig, cli: &Cli) -> Result<Population> {
    if cli.lp {
        bail!("--lp needs a build with the `lp` feature");
    }
    search(network, AugmentingPathSolver::new(config.solver_time_limit()), config, &cli.out)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let network = load_network(&cli)?;

    info!(
        nodes = network.node_count(),
        arcs = network.arc_count(),
        bridges = network.bridge_count(),
        residents = network.residents().len(),
        hospitals = network.hospitals().len(),
        "network loaded"
    );
    info!(
        seed = config.seed,
        scenarios = config.num_scenarios,
        initial = config.ini_num_population,
        population = config.search_num_population,
        generations = config.num_generation,
        damage_state = %config.damage_state,
        "run configuration"
    );

    let population = run(&network, &config, &cli)?;

    println!();
    println!("{:>10} {:>12} {:>15} {:>8}  {}", "Cost", "AverageEIPW", "DifferenceEIPW", "Bridges", "Retrofit");
    println!("{}", "-".repeat(61));
    for c in &population {
        let Some(o) = c.objectives else { continue };
        let bits: String = c.decision.iter().map(|&b| if b { '1' } else { '0' }).collect();
        println!(
            "{:>10.1} {:>12.4} {:>15.4} {:>8}  {}",
            o.cost, o.average_eipw(), o.fairness, c.retrofit_count(), bits
        );
    }
    println!();
    println!("Results written to {}", cli.out.display());

    Ok(())
}
