//! `br-output` — result writers for the bridge_retrofit planner.
//!
//! | Backend | Files created                                        |
//! |---------|------------------------------------------------------|
//! | CSV     | `pareto_front.csv`, `generation_summaries.csv`       |
//!
//! Writers implement [`OutputWriter`] and are driven by
//! [`SearchOutputObserver`], which implements `br_search::SearchObserver`.
//! Files are overwritten on every run.
//!
//! # Usage
//!
//! ```rust,ignore
//! use br_output::{CsvWriter, SearchOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SearchOutputObserver::new(writer);
//! search.run(&mut obs)?;
//! if let Some(e) = obs.take_error() { return Err(e.into()); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SearchOutputObserver;
pub use row::{GenerationSummaryRow, ParetoRow};
pub use writer::OutputWriter;
