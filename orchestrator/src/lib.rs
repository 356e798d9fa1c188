mod assemble;
pub mod configs;
mod coordinator;
mod dispatch;
pub mod error;
pub mod partition;
mod verify;

use matrix::MatrixSource;

pub use configs::RunConfig;
pub use coordinator::{Coordinator, RunOutcome};
pub use dispatch::TaskResult;
pub use error::{AggregateRunError, OrchestratorError, Stage, TaskError, TaskFailure};
pub use partition::Partition;
pub use verify::Verdict;

/// Runs a whole distributed multiplication with operands drawn from `source`.
///
/// # Errors
/// Returns an `OrchestratorError` if the configuration is invalid or any partition fails.
pub async fn run<S: MatrixSource>(
    config: RunConfig,
    source: &mut S,
) -> Result<RunOutcome, OrchestratorError> {
    log::info!(
        "multiplying {}x{} by {}x{}",
        config.rows_a,
        config.cols_a,
        config.cols_a,
        config.cols_b
    );

    Coordinator::new(config)?.run(source).await
}
