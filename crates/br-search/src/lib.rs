//! `br-search` — NSGA-II over retrofit plans.
//!
//! # Generation loop
//!
//! ```text
//! initialise: ini_num_population random plans, evaluated and ranked
//! for generation in 0..num_generation:
//!   ① Rank      — fast non-dominated sort, crowding distance per front
//!   ② Breed     — search_num_population offspring:
//!                   binary tournament × 2 → crossover (or copy) → mutation
//!   ③ Evaluate  — ObjectiveFunction::evaluate per offspring
//!                 (parallel with the `parallel` feature)
//!   ④ Survive   — merge, re-rank, truncate to search_num_population
//! ```
//!
//! There is no early stopping and no budget constraint: cost is an
//! objective, never a cap.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Evaluates candidates on Rayon's thread pool.           |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use br_search::{NoopObserver, SearchBuilder};
//!
//! let mut search = SearchBuilder::new(&config, fitness).build()?;
//! let population = search.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod observer;
pub mod operators;
pub mod population;
pub mod sort;

#[cfg(test)]
mod tests;

pub use builder::SearchBuilder;
pub use engine::{Search, SearchParams};
pub use error::{SearchError, SearchResult};
pub use observer::{NoopObserver, SearchObserver};
pub use population::{Candidate, Population, PopulationStats};
