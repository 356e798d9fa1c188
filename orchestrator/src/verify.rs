use matrix::Matrix;

/// The result of checking the distributed product against the local one.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Match,
    Mismatch { mismatched: usize, diff_norm: f64 },
    ShapeMismatch {
        distributed: (usize, usize),
        reference: (usize, usize),
    },
}

impl Verdict {
    pub fn is_match(&self) -> bool {
        matches!(self, Verdict::Match)
    }
}

/// Compares `distributed` and `reference` element by element.
pub fn verify(distributed: &Matrix, reference: &Matrix) -> Verdict {
    let (Ok(mismatched), Ok(diff_norm)) = (
        distributed.mismatches(reference),
        distributed.diff_norm(reference),
    ) else {
        return Verdict::ShapeMismatch {
            distributed: distributed.shape(),
            reference: reference.shape(),
        };
    };

    if mismatched == 0 {
        Verdict::Match
    } else {
        Verdict::Mismatch {
            mismatched,
            diff_norm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_products_match() {
        let c = Matrix::from_rows(&[[4, 5], [10, 11]]).unwrap();
        assert_eq!(verify(&c, &c.clone()), Verdict::Match);
    }

    #[test]
    fn mismatch_carries_magnitude() {
        let c = Matrix::from_rows(&[[4, 5], [10, 14]]).unwrap();
        let r = Matrix::from_rows(&[[4, 5], [10, 11]]).unwrap();

        assert_eq!(
            verify(&c, &r),
            Verdict::Mismatch {
                mismatched: 1,
                diff_norm: 3.0
            }
        );
    }

    #[test]
    fn shape_mismatch() {
        let c = Matrix::from_rows(&[[1, 2]]).unwrap();
        let r = Matrix::from_rows(&[[1], [2]]).unwrap();

        assert!(matches!(verify(&c, &r), Verdict::ShapeMismatch { .. }));
        assert!(!verify(&c, &r).is_match());
    }
}
