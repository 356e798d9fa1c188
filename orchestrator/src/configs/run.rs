use std::{num::NonZeroUsize, time::Duration};

use serde::Deserialize;

use crate::{OrchestratorError, partition};

const DEFAULT_IO_TIMEOUT_MS: u64 = 30_000;

fn default_io_timeout_ms() -> u64 {
    DEFAULT_IO_TIMEOUT_MS
}

fn default_frame_limit() -> usize {
    comms::DEFAULT_FRAME_LIMIT
}

/// Everything a single distributed multiplication needs to know.
///
/// `A` is `rows_a x cols_a` and `B` is `cols_a x cols_b`, `A` gets split in as many
/// row blocks as there are `workers`.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// One `host:port` per worker slot, partition `i` goes to `workers[i]`.
    pub workers: Vec<String>,
    pub rows_a: usize,
    pub cols_a: usize,
    pub cols_b: usize,
    /// Makes the generated operands reproducible.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Bound for connecting, writing the request and reading the response.
    #[serde(default = "default_io_timeout_ms")]
    pub io_timeout_ms: u64,
    /// Upper bound of simultaneously open worker connections, defaults to one per worker.
    #[serde(default)]
    pub max_in_flight: Option<NonZeroUsize>,
    /// Largest response frame accepted from a worker, in bytes.
    #[serde(default = "default_frame_limit")]
    pub frame_limit: usize,
}

impl RunConfig {
    pub fn new(workers: Vec<String>, rows_a: usize, cols_a: usize, cols_b: usize) -> Self {
        Self {
            workers,
            rows_a,
            cols_a,
            cols_b,
            seed: None,
            io_timeout_ms: DEFAULT_IO_TIMEOUT_MS,
            max_in_flight: None,
            frame_limit: default_frame_limit(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_io_timeout(mut self, io_timeout: Duration) -> Self {
        self.io_timeout_ms = io_timeout.as_millis() as u64;
        self
    }

    pub fn with_max_in_flight(mut self, max_in_flight: NonZeroUsize) -> Self {
        self.max_in_flight = Some(max_in_flight);
        self
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
            .map(NonZeroUsize::get)
            .unwrap_or(self.workers.len())
    }

    /// Checks every precondition of a run, before anything touches the network.
    ///
    /// # Errors
    /// Returns `OrchestratorError::InvalidConfig` describing the first violation.
    pub fn validate(&self) -> Result<(), OrchestratorError> {
        if self.workers.is_empty() {
            return Err(OrchestratorError::InvalidConfig(
                "at least one worker address is required".into(),
            ));
        }

        if let Some(i) = self.workers.iter().position(|w| w.trim().is_empty()) {
            return Err(OrchestratorError::InvalidConfig(format!(
                "worker {i} has an empty address"
            )));
        }

        if self.cols_a == 0 || self.cols_b == 0 {
            return Err(OrchestratorError::InvalidConfig(format!(
                "matrix dimensions must be positive, got cols_a={} cols_b={}",
                self.cols_a, self.cols_b
            )));
        }

        if self.io_timeout_ms == 0 {
            return Err(OrchestratorError::InvalidConfig(
                "io_timeout_ms must be greater than 0".into(),
            ));
        }

        if self.frame_limit == 0 {
            return Err(OrchestratorError::InvalidConfig(
                "frame_limit must be greater than 0".into(),
            ));
        }

        partition::check(self.rows_a, self.workers.len())
    }
}
