//! Tunables for the threshold evaluator. Grouped here the way the grounding
//! workspace groups its own consensus parameters in one named-constant
//! module instead of scattering magic numbers through the validator.

/// Bounds on the threshold branch-and-bound search and its concurrency
/// cutover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionLimits {
    /// Above this many fulfillment-bearing subentries, selection falls back
    /// to a greedy smallest-first pass instead of exhaustively enumerating
    /// every subset.
    pub max_subentries: usize,
    /// Minimum subentry count before `validate` fans sibling validation out
    /// across a thread pool (only takes effect with the `parallel` feature).
    pub parallel_threshold: usize,
}

impl Default for SelectionLimits {
    fn default() -> Self {
        SelectionLimits {
            max_subentries: 16,
            parallel_threshold: 8,
        }
    }
}
