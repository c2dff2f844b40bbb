//! Dense linear system solving for small regression problems.

use crate::core::error::{Error, Result};

/// Solve `a * x = b` using Gaussian elimination with partial pivoting
pub fn solve_linear_system(a: &[Vec<f64>], b: &[f64]) -> Result<Vec<f64>> {
    let n = a.len();
    if b.len() != n || a.iter().any(|row| row.len() != n) {
        return Err(Error::Computation(format!(
            "linear system must be square: {} rows, {} right-hand values",
            n,
            b.len()
        )));
    }

    // Create augmented coefficient matrix
    let mut augmented: Vec<Vec<f64>> = a
        .iter()
        .zip(b)
        .map(|(row, &rhs)| {
            let mut row = row.clone();
            row.push(rhs);
            row
        })
        .collect();

    for i in 0..n {
        // Pivot selection (partial pivoting)
        let mut max_idx = i;
        let mut max_val = augmented[i][i].abs();
        for (j, row) in augmented.iter().enumerate().skip(i + 1) {
            if row[i].abs() > max_val {
                max_idx = j;
                max_val = row[i].abs();
            }
        }

        if max_val < 1e-12 || !max_val.is_finite() {
            return Err(Error::Computation(
                "Singular matrix, cannot solve linear system".to_string(),
            ));
        }

        if max_idx != i {
            augmented.swap(i, max_idx);
        }

        // Normalize by diagonal element
        let pivot = augmented[i][i];
        for value in augmented[i][i..].iter_mut() {
            *value /= pivot;
        }

        // Eliminate other rows
        let pivot_row = augmented[i].clone();
        for (j, row) in augmented.iter_mut().enumerate() {
            if j != i {
                let factor = row[i];
                if factor != 0.0 {
                    for k in i..=n {
                        row[k] -= factor * pivot_row[k];
                    }
                }
            }
        }
    }

    Ok(augmented.into_iter().map(|row| row[n]).collect())
}

/// Diagonal of `a`'s inverse, one solve per unit vector
pub fn inverse_diagonal(a: &[Vec<f64>]) -> Result<Vec<f64>> {
    let n = a.len();
    let mut diagonal = Vec::with_capacity(n);
    let mut unit = vec![0.0; n];
    for i in 0..n {
        unit[i] = 1.0;
        diagonal.push(solve_linear_system(a, &unit)?[i]);
        unit[i] = 0.0;
    }
    Ok(diagonal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_small_system() {
        // 2x + y = 5, x + 3y = 10
        let a = vec![vec![2.0, 1.0], vec![1.0, 3.0]];
        let x = solve_linear_system(&a, &[5.0, 10.0]).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-10);
        assert!((x[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_needs_pivoting() {
        let a = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let x = solve_linear_system(&a, &[2.0, 3.0]).unwrap();
        assert_eq!(x, vec![3.0, 2.0]);
    }

    #[test]
    fn test_inverse_diagonal() {
        // inverse of [[4, 2], [2, 3]] is [[3, -2], [-2, 4]] / 8
        let a = vec![vec![4.0, 2.0], vec![2.0, 3.0]];
        let diagonal = inverse_diagonal(&a).unwrap();
        assert!((diagonal[0] - 0.375).abs() < 1e-12);
        assert!((diagonal[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_singular_matrix() {
        let a = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        assert!(matches!(
            solve_linear_system(&a, &[1.0, 2.0]),
            Err(Error::Computation(_))
        ));
    }
}
