//! The `OutputWriter` trait implemented by backend writers.

use crate::{GenerationSummaryRow, OutputResult, ParetoRow};

/// Sink for search results.
///
/// From the observer's perspective every call is infallible: errors are
/// stored and retrieved with [`SearchOutputObserver::take_error`].
///
/// [`SearchOutputObserver::take_error`]: crate::SearchOutputObserver::take_error
pub trait OutputWriter {
    /// Write the final population, one row per candidate.
    fn write_front(&mut self, rows: &[ParetoRow]) -> OutputResult<()>;

    /// Write one generation summary row.
    fn write_generation_summary(&mut self, row: &GenerationSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
