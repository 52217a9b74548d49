//! Fatal error taxonomy (§7). Only the fatal cases propagate as `Result`;
//! everything else is absorbed by the ε-gated predicate layer or resolved
//! locally by falling back to a different strategy.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("input vertex is non-finite: {0}")]
    NonFiniteVertex(String),

    #[error("source polygon is empty")]
    EmptyPolygon,

    #[error("clipping A against B's plane (or vice versa) left an empty polygon")]
    ClippingFailure,

    #[error("splitter invariant violated: {0}")]
    SplitterInvariant(String),

    #[error("recursion depth exceeded the configured cap of {cap}")]
    RecursionDepthExceeded { cap: usize },
}
