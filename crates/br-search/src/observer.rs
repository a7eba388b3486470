//! Search observer trait for progress reporting and data collection.

use crate::population::Population;

/// Callbacks invoked by [`Search::run`][crate::Search::run] at generation
/// boundaries.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: front-size printer
///
/// ```rust,ignore
/// struct FrontPrinter;
///
/// impl SearchObserver for FrontPrinter {
///     fn on_generation_end(&mut self, generation: usize, population: &Population) {
///         println!("generation {generation}: {} on front 0", population.front_len());
///     }
/// }
/// ```
pub trait SearchObserver {
    /// Called before a generation's offspring are produced.
    fn on_generation_start(&mut self, _generation: usize) {}

    /// Called once the merged population has been ranked and truncated.
    fn on_generation_end(&mut self, _generation: usize, _population: &Population) {}

    /// Called once with the final population.
    fn on_search_end(&mut self, _population: &Population) {}
}

/// A [`SearchObserver`] that does nothing.
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}
