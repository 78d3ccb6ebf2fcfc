use thiserror::Error;

/// Configuration errors for bin schemes. These are raised while a scheme is
/// built, never while values are classified.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BinError {
    #[error("a bin scheme needs at least two edges, got {0}")]
    TooFewEdges(usize),

    #[error("bin edge {index} is not finite ({value})")]
    NonFiniteEdge { index: usize, value: f64 },

    #[error("bin edges must be strictly increasing: edges[{index}] = {prev} is not below edges[{next_index}] = {next}", next_index = .index + 1)]
    NotIncreasing { index: usize, prev: f64, next: f64 },

    #[error("{edges} edges describe {} classes, but {classes} were given", .edges.saturating_sub(1))]
    ClassCountMismatch { edges: usize, classes: usize },

    #[error("a color ramp needs at least one color")]
    EmptyRamp,

    #[error("invalid color {0:?}")]
    InvalidColor(String),

    #[error("unknown preset {0:?}")]
    UnknownPreset(String),
}
