//! The top-level query result (§6).

/// Outcome of an `are_visible` query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibilityResult {
    /// An unblocked A–B stabbing line was found.
    Visible,
    /// Every stabbing line is blocked by some occluder.
    Hidden,
    /// The polytope collapsed to something with no real stabbing line left
    /// (e.g. A and B do not actually face each other) — not an error.
    Unknown,
    /// A fatal condition (§7): invalid input, a clipping failure, or
    /// recursion-depth overflow.
    Failure,
}
