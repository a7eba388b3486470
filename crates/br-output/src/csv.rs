//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `pareto_front.csv`: `Cost,AverageEIPW,DifferenceEIPW`
//! - `generation_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{GenerationSummaryRow, OutputResult, ParetoRow};
use crate::writer::OutputWriter;

pub const PARETO_FILE: &str = "pareto_front.csv";
pub const SUMMARY_FILE: &str = "generation_summaries.csv";

/// Writes search results to two CSV files.
pub struct CsvWriter {
    front:     Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create (truncating) the two CSV files in `dir` and write the header
    /// rows.  `dir` is created if missing.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut front = Writer::from_path(dir.join(PARETO_FILE))?;
        front.write_record(["Cost", "AverageEIPW", "DifferenceEIPW"])?;

        let mut summaries = Writer::from_path(dir.join(SUMMARY_FILE))?;
        summaries.write_record([
            "generation",
            "population",
            "front0",
            "min_cost",
            "best_average_eipw",
            "min_difference_eipw",
        ])?;

        Ok(Self { front, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_front(&mut self, rows: &[ParetoRow]) -> OutputResult<()> {
        for row in rows {
            self.front.write_record(&[
                row.cost.to_string(),
                row.average_eipw.to_string(),
                row.difference_eipw.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_generation_summary(&mut self, row: &GenerationSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.generation.to_string(),
            row.population.to_string(),
            row.front0.to_string(),
            row.min_cost.to_string(),
            row.best_average_eipw.to_string(),
            row.min_difference_eipw.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.front.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
