use matrix::Matrix;

use crate::{
    dispatch::TaskResult,
    error::{AggregateRunError, OrchestratorError},
};

/// Stacks the partial products in ascending partition order.
///
/// Nothing is stacked unless every task succeeded.
///
/// # Errors
/// Returns `OrchestratorError::Run` listing every failed partition, or
/// `OrchestratorError::Compute` if the partial products don't fit together.
pub fn reassemble(mut results: Vec<TaskResult>) -> Result<Matrix, OrchestratorError> {
    results.sort_by_key(TaskResult::index);

    let mut products = Vec::with_capacity(results.len());
    let mut failures = Vec::new();

    for result in results {
        match result {
            TaskResult::Done { index, product } => products.push((index, product)),
            TaskResult::Failed(failure) => failures.push(failure),
        }
    }

    if !failures.is_empty() {
        return Err(AggregateRunError { failures }.into());
    }

    if let Some((pos, (index, _))) = products
        .iter()
        .enumerate()
        .find(|(pos, (index, _))| pos != index)
    {
        return Err(OrchestratorError::Compute(format!(
            "expected partition {pos} at position {pos}, found partition {index}"
        )));
    }

    let parts: Vec<Matrix> = products.into_iter().map(|(_, product)| product).collect();
    matrix::vstack(&parts).map_err(|e| OrchestratorError::Compute(e.to_string()))
}
