use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("a flow network needs at least one vertex")]
    EmptyNetwork,

    #[error("vertex {vertex} is out of range [0, {num_vertices})")]
    VertexOutOfRange { vertex: usize, num_vertices: usize },

    #[error("edge {from} -> {to} has a negative capacity")]
    NegativeCapacity { from: usize, to: usize },

    #[error("source and sink must differ, both are {0}")]
    SourceIsSink(usize),

    #[error("arc {arc} is out of range [0, {num_arcs})")]
    ArcOutOfRange { arc: usize, num_arcs: usize },

    #[error("cut has {len} entries but the network has {num_vertices} vertices")]
    CutSizeMismatch { len: usize, num_vertices: usize },

    // broken internal invariant, never expected on a correct solver
    #[error("precondition check failed: {0}")]
    PrecondCheckFailure(String),
}

impl FlowError {
    /// Whether the error was caused by malformed input rather than a broken invariant.
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, FlowError::PrecondCheckFailure(_))
    }
}

pub type Result<T> = std::result::Result<T, FlowError>;
