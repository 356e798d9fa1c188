use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use log::{info, warn};
use matrix::{Matrix, MatrixSource};
use tokio::task;

use crate::{
    assemble,
    configs::RunConfig,
    dispatch,
    error::OrchestratorError,
    partition,
    verify::{self, Verdict},
};

/// The terminal result of a run.
#[derive(Debug)]
pub struct RunOutcome {
    /// The distributed product `C = A * B`.
    pub product: Matrix,
    pub verdict: Verdict,
    /// Partitioning, dispatch and reassembly.
    pub distributed_time: Duration,
    /// The local reference multiplication.
    pub serial_time: Duration,
}

/// Drives a distributed multiplication over a fixed set of workers.
pub struct Coordinator {
    config: RunConfig,
}

impl Coordinator {
    /// Creates a new `Coordinator`.
    ///
    /// # Errors
    /// Returns `OrchestratorError::InvalidConfig` if `config` describes an invalid run.
    pub fn new(config: RunConfig) -> Result<Self, OrchestratorError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Draws `A` and `B` from `source` and runs the multiplication.
    ///
    /// # Errors
    /// See `run_with`, plus `OrchestratorError::Source` if the operands can't be produced.
    pub async fn run<S: MatrixSource>(&self, source: &mut S) -> Result<RunOutcome, OrchestratorError> {
        let RunConfig {
            rows_a,
            cols_a,
            cols_b,
            ..
        } = self.config;

        let a = source
            .generate(rows_a, cols_a)
            .map_err(OrchestratorError::Source)?;
        let b = source
            .generate(cols_a, cols_b)
            .map_err(OrchestratorError::Source)?;

        self.run_with(a, b).await
    }

    /// Multiplies the given operands on the workers and checks the result locally.
    ///
    /// A mismatch against the local product is reported through the outcome's
    /// verdict, it is not an error.
    ///
    /// # Errors
    /// Returns `OrchestratorError::InvalidConfig` if the operands don't have the
    /// configured shapes, `OrchestratorError::Run` if any partition failed.
    pub async fn run_with(&self, a: Matrix, b: Matrix) -> Result<RunOutcome, OrchestratorError> {
        let cfg = &self.config;
        let expected_a = (cfg.rows_a, cfg.cols_a);
        let expected_b = (cfg.cols_a, cfg.cols_b);

        if a.shape() != expected_a || b.shape() != expected_b {
            return Err(OrchestratorError::InvalidConfig(format!(
                "operands are {:?} and {:?}, expected {expected_a:?} and {expected_b:?}",
                a.shape(),
                b.shape()
            )));
        }

        let start = Instant::now();
        let partitions = partition::partition(cfg.rows_a, cfg.workers.len())?;

        let blocks = partitions
            .into_iter()
            .map(|p| a.slice_rows(p.rows.clone()).map(|block| (p, block)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(OrchestratorError::Source)?;

        info!("distributing work to {} worker(s)", blocks.len());
        let b = Arc::new(b);
        let results = dispatch::dispatch(cfg, blocks, Arc::clone(&b)).await;
        info!("all workers finished");

        let product = assemble::reassemble(results)?;
        let distributed_time = start.elapsed();

        let start = Instant::now();
        let reference = task::spawn_blocking(move || matrix::multiply(&a, &b))
            .await
            .map_err(|e| OrchestratorError::Compute(e.to_string()))?
            .map_err(|e| OrchestratorError::Compute(e.to_string()))?;
        let serial_time = start.elapsed();

        let verdict = verify::verify(&product, &reference);
        match &verdict {
            Verdict::Match => info!("verification succeeded"),
            other => warn!("verification failed: {other:?}"),
        }

        Ok(RunOutcome {
            product,
            verdict,
            distributed_time,
            serial_time,
        })
    }
}
