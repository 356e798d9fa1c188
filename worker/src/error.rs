use std::{error::Error, fmt, io};

use matrix::MatrixErr;
use tokio::task::JoinError;

use crate::ConnState;

/// The worker module's result type.
pub type Result<T> = std::result::Result<T, WorkerErr>;

/// Failures that end a single connection.
#[derive(Debug)]
pub enum WorkerErr {
    Io(io::Error),
    Timeout {
        state: ConnState,
    },
    ShapeMismatch {
        partition: (usize, usize),
        b: (usize, usize),
    },
    Matrix(MatrixErr),
    Compute(JoinError),
}

impl fmt::Display for WorkerErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerErr::Io(e) => write!(f, "io error: {e}"),
            WorkerErr::Timeout { state } => write!(f, "timed out while {state}"),
            WorkerErr::ShapeMismatch { partition, b } => write!(
                f,
                "partition is {}x{} but b is {}x{}",
                partition.0, partition.1, b.0, b.1
            ),
            WorkerErr::Matrix(e) => write!(f, "matrix error: {e}"),
            WorkerErr::Compute(e) => write!(f, "compute task failed: {e}"),
        }
    }
}

impl Error for WorkerErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorkerErr::Io(e) => Some(e),
            WorkerErr::Matrix(e) => Some(e),
            WorkerErr::Compute(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for WorkerErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<MatrixErr> for WorkerErr {
    fn from(value: MatrixErr) -> Self {
        Self::Matrix(value)
    }
}

impl From<JoinError> for WorkerErr {
    fn from(value: JoinError) -> Self {
        Self::Compute(value)
    }
}
