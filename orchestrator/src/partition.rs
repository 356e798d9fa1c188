//! Row partitioning of the left operand.

use std::ops::Range;

use crate::OrchestratorError;

/// A contiguous block of rows of `A` assigned to the worker at `index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub index: usize,
    pub rows: Range<usize>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Validates that `rows` can be split evenly in `parts` blocks.
///
/// # Errors
/// Returns `OrchestratorError::InvalidConfig` if either value is zero or `parts`
/// does not divide `rows`.
pub fn check(rows: usize, parts: usize) -> Result<(), OrchestratorError> {
    if rows == 0 || parts == 0 {
        return Err(OrchestratorError::InvalidConfig(format!(
            "rows ({rows}) and number of workers ({parts}) must both be positive"
        )));
    }

    if rows % parts != 0 {
        return Err(OrchestratorError::InvalidConfig(format!(
            "the {rows} rows of A can't be split evenly between {parts} workers"
        )));
    }

    Ok(())
}

/// Splits `[0, rows)` in `parts` equally sized, ascending row ranges.
///
/// # Returns
/// Exactly `parts` partitions, the `i`-th one having index `i`.
///
/// # Errors
/// Returns `OrchestratorError::InvalidConfig` under the same conditions as `check`.
pub fn partition(rows: usize, parts: usize) -> Result<Vec<Partition>, OrchestratorError> {
    check(rows, parts)?;

    let size = rows / parts;
    let partitions = (0..parts)
        .map(|index| Partition {
            index,
            rows: index * size..(index + 1) * size,
        })
        .collect();

    Ok(partitions)
}
