//! Injectable providers for the operand matrices of a run.

use std::collections::VecDeque;

use ndarray::Array2;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{Elem, Matrix, MatrixErr, Result};

/// Inclusive lower bound of the default sampling range.
pub const DEFAULT_LOW: Elem = -10;
/// Exclusive upper bound of the default sampling range.
pub const DEFAULT_HIGH: Elem = 10;

/// Something that can hand out matrices of a requested shape.
pub trait MatrixSource {
    /// Produces the next `rows x cols` matrix.
    fn generate(&mut self, rows: usize, cols: usize) -> Result<Matrix>;
}

/// A source that samples every element uniformly from `[low, high)`.
pub struct RandomSource<R: Rng> {
    rng: R,
    low: Elem,
    high: Elem,
}

impl<R: Rng> RandomSource<R> {
    /// Creates a new `RandomSource`.
    ///
    /// # Arguments
    /// * `rng` - The random number generator to sample from.
    /// * `low` - The inclusive lower limit.
    /// * `high` - The exclusive upper limit.
    ///
    /// # Returns
    /// An error if the range is empty (low >= high).
    pub fn new(rng: R, low: Elem, high: Elem) -> Result<Self> {
        if low >= high {
            return Err(MatrixErr::InvalidRange { low, high });
        }

        Ok(Self { rng, low, high })
    }
}

impl RandomSource<StdRng> {
    /// A reproducible source over the default range.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            low: DEFAULT_LOW,
            high: DEFAULT_HIGH,
        }
    }

    /// A source seeded from the operating system, or from `seed` when given.
    pub fn from_seed_or_os(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self {
                rng: StdRng::from_os_rng(),
                low: DEFAULT_LOW,
                high: DEFAULT_HIGH,
            },
        }
    }
}

impl<R: Rng> MatrixSource for RandomSource<R> {
    fn generate(&mut self, rows: usize, cols: usize) -> Result<Matrix> {
        let Self { rng, low, high } = self;
        let array = Array2::from_shape_simple_fn((rows, cols), || rng.random_range(*low..*high));
        Ok(Matrix::from_array(array))
    }
}

/// A source that hands out a fixed list of matrices in order.
#[derive(Debug, Default)]
pub struct FixedSource {
    queue: VecDeque<Matrix>,
}

impl FixedSource {
    pub fn new<I: IntoIterator<Item = Matrix>>(matrices: I) -> Self {
        Self {
            queue: matrices.into_iter().collect(),
        }
    }
}

impl MatrixSource for FixedSource {
    fn generate(&mut self, rows: usize, cols: usize) -> Result<Matrix> {
        let Some(next) = self.queue.pop_front() else {
            return Err(MatrixErr::SourceExhausted {
                requested: (rows, cols),
            });
        };

        if next.shape() != (rows, cols) {
            return Err(MatrixErr::DimensionMismatch {
                op: "generate",
                left: (rows, cols),
                right: next.shape(),
            });
        }

        Ok(next)
    }
}
