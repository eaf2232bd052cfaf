use thiserror::Error;

/// Top-level error type for the shadowcast core.
#[derive(Debug, Error)]
pub enum ShadowcastError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors caused by malformed geometric input.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("point ring is not closed (first point must equal last point)")]
    NotClosed,

    #[error("a polygon needs at least 3 distinct points, got {count}")]
    TooFewPoints { count: usize },

    #[error("zero-length segment at ({x}, {y})")]
    ZeroLengthSegment { x: f64, y: f64 },

    #[error("point ({x}, {y}) does not lie on the segment interior")]
    PointNotOnSegment { x: f64, y: f64 },

    #[error("vertex ({x}, {y}) appears more than once in the ring")]
    DuplicateVertex { x: f64, y: f64 },

    #[error("point ({x}, {y}) is outside the supported coordinate range")]
    OutOfRange { x: f64, y: f64 },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors related to the vertex/segment graph.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("vertex already has an {role} segment")]
    SlotOccupied { role: &'static str },

    #[error("segment is not incident to the vertex")]
    NotIncident,

    #[error("segment has already been split")]
    AlreadySplit,

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors raised by polygon operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`ShadowcastError`].
pub type Result<T> = std::result::Result<T, ShadowcastError>;
