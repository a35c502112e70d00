/// Errors raised by the numeric kernel, the rasterizer and configuration
use thiserror::Error;

/// All failures surfaced by `swgl-core`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Wrong number of scalars for a fixed-dimension vector
    #[error("wrong number of arguments: expected {expected}, found {found}")]
    Length { expected: usize, found: usize },

    /// Matrix initializer has the wrong number of rows
    #[error("row count does not match: expected {expected}, found {found}")]
    RowCount { expected: usize, found: usize },

    /// A matrix initializer row has the wrong number of columns
    #[error("column count does not match in row {row}: expected {expected}, found {found}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("index {index} is out of bounds for length {len}")]
    OutOfBounds { index: usize, len: usize },

    /// Operation not defined for this shape, e.g. a cross product outside 3D
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),

    #[error("division by zero")]
    DivisionByZero,

    /// Matrix has a (near-)zero determinant
    #[error("matrix is singular (determinant = {determinant})")]
    Singular { determinant: f64 },

    #[error("degenerate projection: {0}")]
    DegenerateProjection(&'static str),

    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },

    /// Triangle references a vertex the model does not have
    #[error("triangle {triangle} references vertex {index} but the model has {vertices} vertices")]
    InvalidTriangle {
        triangle: usize,
        index: usize,
        vertices: usize,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;
