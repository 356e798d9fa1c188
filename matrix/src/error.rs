use std::{
    error::Error,
    fmt::{self, Display},
};

use ndarray::ShapeError;

/// The result type used in the entire matrix module.
pub type Result<T> = std::result::Result<T, MatrixErr>;

/// The matrix module's error type.
#[derive(Debug)]
pub enum MatrixErr {
    Shape(ShapeError),
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },
    NothingToStack,
    InvalidRange {
        low: i64,
        high: i64,
    },
    SourceExhausted {
        requested: (usize, usize),
    },
    Overflow {
        op: &'static str,
    },
}

impl Display for MatrixErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixErr::Shape(e) => write!(f, "invalid matrix shape: {e}"),
            MatrixErr::DimensionMismatch { op, left, right } => write!(
                f,
                "incompatible dimensions for {op}: {}x{} and {}x{}",
                left.0, left.1, right.0, right.1
            ),
            MatrixErr::NothingToStack => write!(f, "tried to stack an empty list of matrices"),
            MatrixErr::InvalidRange { low, high } => {
                write!(f, "the sampling range [{low}, {high}) is empty")
            }
            MatrixErr::SourceExhausted { requested } => write!(
                f,
                "the matrix source has nothing left for a {}x{} request",
                requested.0, requested.1
            ),
            MatrixErr::Overflow { op } => write!(f, "{op} overflowed the element type"),
        }
    }
}

impl Error for MatrixErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MatrixErr::Shape(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShapeError> for MatrixErr {
    fn from(value: ShapeError) -> Self {
        Self::Shape(value)
    }
}
