mod error;
mod matrix;
mod ops;
pub mod source;

pub use error::{MatrixErr, Result};
pub use matrix::{Elem, Matrix};
pub use ops::{multiply, vstack};
pub use source::{FixedSource, MatrixSource, RandomSource};
