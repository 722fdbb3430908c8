//! Error types for seisgrid

use thiserror::Error;

/// Main error type for seisgrid operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("interpolation input is missing required columns: {missing:?}")]
    MissingColumns { missing: Vec<String> },

    #[error("no column named '{0}'")]
    UnknownColumn(String),

    #[error("column '{name}' is not a {expected} column")]
    ColumnType { name: String, expected: &'static str },

    #[error("column '{name}' has length {actual}, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("no point sets to concatenate")]
    NoPointSets,

    #[error("no bathy reflector found")]
    NoReferenceReflector,

    #[error("unsupported interpolation method: '{0}'")]
    UnsupportedMethod(String),

    #[error("unsupported radial basis kernel: '{0}'")]
    UnsupportedKernel(String),

    #[error("degenerate triangulation: {0}")]
    DegenerateTriangulation(String),

    #[error("singular linear system of dimension {0} (points may be collinear or duplicate)")]
    SingularSystem(usize),

    #[error("invalid grid dimensions: {rows}x{cols} for {len} values")]
    InvalidDimensions {
        rows: usize,
        cols: usize,
        len: usize,
    },

    #[error("index out of bounds: ({row}, {col}) in grid of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for seisgrid operations
pub type Result<T> = std::result::Result<T, Error>;
