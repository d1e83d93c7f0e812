use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze dimensions must be at least 1x1, got {rows}x{cols}")]
    ZeroDimension { rows: usize, cols: usize },

    #[error("maze dimension {value} exceeds the maximum of {max}")]
    DimensionTooLarge { value: usize, max: usize },

    /// Candidate edges ran out before every cell joined one set.
    #[error("generation stalled with {components} disconnected components left")]
    GenerationStalled { components: usize },

    /// The discovered-edge log has no entry leading into `cell`.
    #[error("no discovered edge leads into cell {cell} while backtracking")]
    BrokenTrail { cell: usize },
}

pub type Result<T> = std::result::Result<T, MazeError>;
