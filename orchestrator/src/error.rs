use std::{error::Error, fmt, io, time::Duration};

use matrix::MatrixErr;
use tokio::task::JoinError;

/// All errors that can end a run.
#[derive(Debug)]
pub enum OrchestratorError {
    /// Invalid configuration, caught before connecting.
    InvalidConfig(String),
    /// The operands could not be produced.
    Source(MatrixErr),
    /// At least one partition failed, the run produced no product.
    Run(AggregateRunError),
    /// Local computation failed.
    Compute(String),
}

impl fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Source(e) => write!(f, "failed to produce operands: {e}"),
            Self::Run(e) => write!(f, "{e}"),
            Self::Compute(msg) => write!(f, "local computation failed: {msg}"),
        }
    }
}

impl Error for OrchestratorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Source(e) => Some(e),
            Self::Run(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AggregateRunError> for OrchestratorError {
    fn from(e: AggregateRunError) -> Self {
        Self::Run(e)
    }
}

/// The blocking points of a dispatch task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Connect,
    Send,
    Receive,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Connect => "connecting",
            Stage::Send => "sending the request",
            Stage::Receive => "receiving the response",
        };

        f.write_str(s)
    }
}

/// Why a single partition could not be computed.
#[derive(Debug)]
pub enum TaskError {
    /// The worker was unreachable or the connection dropped mid exchange.
    Connection { stage: Stage, source: io::Error },
    /// A blocking point took longer than the configured timeout.
    Timeout { stage: Stage, after: Duration },
    /// The response was not a well formed matrix.
    Decode(io::Error),
    /// The response decoded fine but doesn't have the partition's shape.
    Shape {
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// The task panicked or was cancelled before reporting.
    Aborted(JoinError),
    /// The task finished without its result reaching the barrier.
    Lost,
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection { stage, source } => {
                write!(f, "connection error while {stage}: {source}")
            }
            Self::Timeout { stage, after } => {
                write!(f, "timed out after {after:?} while {stage}")
            }
            Self::Decode(e) => write!(f, "decode error: {e}"),
            Self::Shape { expected, got } => write!(
                f,
                "expected a {}x{} partial product, got {}x{}",
                expected.0, expected.1, got.0, got.1
            ),
            Self::Aborted(e) => write!(f, "task aborted: {e}"),
            Self::Lost => write!(f, "task result was lost"),
        }
    }
}

impl Error for TaskError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection { source, .. } => Some(source),
            Self::Decode(e) => Some(e),
            Self::Aborted(e) => Some(e),
            _ => None,
        }
    }
}

/// A task failure tagged with the partition and worker it belongs to.
#[derive(Debug)]
pub struct TaskFailure {
    pub index: usize,
    pub addr: String,
    pub error: TaskError,
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "partition {} ({}): {}", self.index, self.addr, self.error)
    }
}

/// Every failed partition of a run, in ascending index order.
#[derive(Debug)]
pub struct AggregateRunError {
    pub failures: Vec<TaskFailure>,
}

impl AggregateRunError {
    /// The indices of the failed partitions.
    pub fn failed_indices(&self) -> Vec<usize> {
        self.failures.iter().map(|f| f.index).collect()
    }
}

impl fmt::Display for AggregateRunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} partition(s) failed", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "; {failure}")?;
        }

        Ok(())
    }
}

impl Error for AggregateRunError {}
