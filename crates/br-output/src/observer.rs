//! `SearchOutputObserver<W>` bridges `SearchObserver` to an `OutputWriter`.

use br_search::{Population, SearchObserver};

use crate::row::{GenerationSummaryRow, ParetoRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SearchObserver`] that writes one summary row per generation and the
/// final population to any [`OutputWriter`].
///
/// Errors from the writer are stored internally because `SearchObserver`
/// methods have no return value.  After `search.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct SearchOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SearchOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `search.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

/// Per-generation statistics over a ranked population.
pub fn summarize(generation: usize, population: &Population) -> GenerationSummaryRow {
    let stats = population.stats();
    GenerationSummaryRow {
        generation:          generation as u64,
        population:          population.len() as u64,
        front0:              population.front_len() as u64,
        min_cost:            stats.min_cost,
        best_average_eipw:   stats.best_average_eipw,
        min_difference_eipw: stats.min_difference_eipw,
    }
}

impl<W: OutputWriter> SearchObserver for SearchOutputObserver<W> {
    fn on_generation_end(&mut self, generation: usize, population: &Population) {
        let result = self.writer.write_generation_summary(&summarize(generation, population));
        self.store_err(result);
    }

    fn on_search_end(&mut self, population: &Population) {
        let rows: Vec<ParetoRow> = population.objectives().map(ParetoRow::from).collect();
        let result = self.writer.write_front(&rows);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
