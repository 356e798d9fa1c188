use ndarray::{Axis, concatenate, prelude::*};

use crate::{Elem, Matrix, MatrixErr, Result};

/// Computes the dense product `x * y`.
///
/// Every dot product is accumulated in `i128`, so the result is exact whenever
/// it fits an `Elem`, regardless of the build profile.
///
/// # Returns
/// A `x.rows() x y.cols()` matrix, or an error if `x.cols() != y.rows()` or
/// some element of the product doesn't fit an `Elem`.
pub fn multiply(x: &Matrix, y: &Matrix) -> Result<Matrix> {
    if x.cols() != y.rows() {
        return Err(MatrixErr::DimensionMismatch {
            op: "multiply",
            left: x.shape(),
            right: y.shape(),
        });
    }

    let (xv, yv) = (x.view(), y.view());
    let mut out = Vec::with_capacity(x.rows() * y.cols());
    let mut acc = vec![0i128; y.cols()];

    for x_row in xv.rows() {
        acc.fill(0);

        for (&coef, y_row) in x_row.iter().zip(yv.rows()) {
            for (sum, &v) in acc.iter_mut().zip(y_row) {
                *sum = sum
                    .checked_add(i128::from(coef) * i128::from(v))
                    .ok_or(MatrixErr::Overflow { op: "multiply" })?;
            }
        }

        for &sum in &acc {
            out.push(Elem::try_from(sum).map_err(|_| MatrixErr::Overflow { op: "multiply" })?);
        }
    }

    Matrix::new(x.rows(), y.cols(), out)
}

/// Concatenates `parts` vertically, keeping their order.
///
/// # Returns
/// The stacked matrix, or an error if `parts` is empty or the column counts differ.
pub fn vstack(parts: &[Matrix]) -> Result<Matrix> {
    let Some(first) = parts.first() else {
        return Err(MatrixErr::NothingToStack);
    };

    if let Some(odd) = parts.iter().find(|m| m.cols() != first.cols()) {
        return Err(MatrixErr::DimensionMismatch {
            op: "vstack",
            left: first.shape(),
            right: odd.shape(),
        });
    }

    let views: Vec<ArrayView2<'_, _>> = parts.iter().map(Matrix::view).collect();
    let stacked = concatenate(Axis(0), &views)?;
    Ok(Matrix::from_array(stacked))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiply_small() {
        let a = Matrix::from_rows(&[[1, 2, 3], [4, 5, 6]]).unwrap();
        let b = Matrix::from_rows(&[[1, 0], [0, 1], [1, 1]]).unwrap();

        let c = multiply(&a, &b).unwrap();
        assert_eq!(c, Matrix::from_rows(&[[4, 5], [10, 11]]).unwrap());
    }

    #[test]
    fn multiply_rejects_bad_inner_dim() {
        let a = Matrix::from_rows(&[[1, 2]]).unwrap();
        let b = Matrix::from_rows(&[[1, 2]]).unwrap();

        assert!(matches!(
            multiply(&a, &b),
            Err(MatrixErr::DimensionMismatch { op: "multiply", .. })
        ));
    }

    #[test]
    fn multiply_reports_overflow() {
        let a = Matrix::from_rows(&[[Elem::MAX, 1]]).unwrap();
        let b = Matrix::from_rows(&[[2], [0]]).unwrap();

        assert!(matches!(
            multiply(&a, &b),
            Err(MatrixErr::Overflow { op: "multiply" })
        ));
    }

    #[test]
    fn multiply_exact_near_the_edges() {
        // The running sum leaves the Elem range but the result doesn't.
        let a = Matrix::from_rows(&[[Elem::MAX, 1, -1]]).unwrap();
        let b = Matrix::from_rows(&[[1], [1], [1]]).unwrap();
        assert_eq!(multiply(&a, &b).unwrap(), Matrix::from_rows(&[[Elem::MAX]]).unwrap());

        let a = Matrix::from_rows(&[[Elem::MIN, 0]]).unwrap();
        let b = Matrix::from_rows(&[[1, -1], [5, 5]]).unwrap();
        assert!(multiply(&a, &b).is_err());
        assert_eq!(
            multiply(&a, &Matrix::from_rows(&[[1], [5]]).unwrap()).unwrap(),
            Matrix::from_rows(&[[Elem::MIN]]).unwrap()
        );
    }

    #[test]
    fn vstack_keeps_order() {
        let top = Matrix::from_rows(&[[1, 2]]).unwrap();
        let bottom = Matrix::from_rows(&[[3, 4], [5, 6]]).unwrap();

        let m = vstack(&[top, bottom]).unwrap();
        assert_eq!(m, Matrix::from_rows(&[[1, 2], [3, 4], [5, 6]]).unwrap());
    }

    #[test]
    fn vstack_rejects_empty_and_ragged() {
        assert!(matches!(vstack(&[]), Err(MatrixErr::NothingToStack)));

        let a = Matrix::from_rows(&[[1, 2]]).unwrap();
        let b = Matrix::from_rows(&[[1, 2, 3]]).unwrap();
        assert!(vstack(&[a, b]).is_err());
    }
}
