//! Normal-equation solver for least squares

use faer::Mat;

use crate::pipeline::error::{PipelineError, Result};

/// Pivots at or below this fraction of the largest diagonal entry are
/// treated as zero.
const SINGULAR_TOLERANCE: f64 = 1e-10;

/// Solve `(XᵀX + λI) β = Xᵀy` for β.
///
/// `x` is the (already centered, when fitting an intercept) design matrix and
/// `y` the matching label column vector. Columns are scaled to unit norm
/// before forming the Gram matrix so the singularity test does not depend on
/// feature units.
pub fn solve_least_squares(x: &Mat<f64>, y: &Mat<f64>, reg_param: f64) -> Result<Vec<f64>> {
    let (n, p) = (x.nrows(), x.ncols());

    let mut norms = Vec::with_capacity(p);
    for j in 0..p {
        let norm = x.col(j).norm_l2();
        if norm == 0.0 {
            if reg_param > 0.0 {
                // A zero column gets a zero coefficient under any penalty
                norms.push(1.0);
                continue;
            }
            return Err(PipelineError::Singular { pivot: j, size: p });
        }
        norms.push(norm);
    }

    let scaled = Mat::from_fn(n, p, |i, j| x[(i, j)] / norms[j]);

    let mut gram = scaled.transpose() * &scaled;
    let rhs = scaled.transpose() * y;

    for (j, norm) in norms.iter().enumerate() {
        gram[(j, j)] += reg_param / (norm * norm);
    }

    let b: Vec<f64> = (0..p).map(|j| rhs[(j, 0)]).collect();
    let gamma = cholesky_solve(&gram, &b)?;

    Ok(gamma.iter().zip(&norms).map(|(g, norm)| g / norm).collect())
}

/// Solve the symmetric positive-definite system `a · x = b`
pub fn cholesky_solve(a: &Mat<f64>, b: &[f64]) -> Result<Vec<f64>> {
    let n = a.nrows();
    if n == 0 {
        return Ok(Vec::new());
    }

    let scale = (0..n).map(|i| a[(i, i)].abs()).fold(0.0, f64::max);
    let tolerance = SINGULAR_TOLERANCE * scale.max(f64::MIN_POSITIVE);

    // A = L·Lᵀ
    let mut l = Mat::<f64>::zeros(n, n);
    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[(i, k)] * l[(j, k)];
            }

            if i == j {
                let diag = a[(i, i)] - sum;
                if !diag.is_finite() || diag <= tolerance {
                    return Err(PipelineError::Singular { pivot: i, size: n });
                }
                l[(i, j)] = diag.sqrt();
            } else {
                l[(i, j)] = (a[(i, j)] - sum) / l[(j, j)];
            }
        }
    }

    // L·z = b
    let mut z = vec![0.0; n];
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[(i, j)] * z[j]).sum();
        z[i] = (b[i] - sum) / l[(i, i)];
    }

    // Lᵀ·x = z
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let sum: f64 = ((i + 1)..n).map(|j| l[(j, i)] * x[j]).sum();
        x[i] = (z[i] - sum) / l[(i, i)];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mat(rows: &[&[f64]]) -> Mat<f64> {
        let mut m = Mat::<f64>::zeros(rows.len(), rows[0].len());
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                m[(i, j)] = v;
            }
        }
        m
    }

    #[test]
    fn test_cholesky_solve_spd() {
        let a = mat(&[&[4.0, 2.0], &[2.0, 3.0]]);
        let x = cholesky_solve(&a, &[6.0, 5.0]).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_singular_matrix_rejected() {
        let a = mat(&[&[1.0, 2.0], &[2.0, 4.0]]);
        let result = cholesky_solve(&a, &[1.0, 2.0]);
        assert!(matches!(result, Err(PipelineError::Singular { pivot: 1, size: 2 })));
    }

    #[test]
    fn test_least_squares_exact_fit() {
        // y = 2a - b
        let x = mat(&[&[1.0, 0.0], &[0.0, 1.0], &[1.0, 1.0], &[2.0, 1.0]]);
        let y = mat(&[&[2.0], &[-1.0], &[1.0], &[3.0]]);
        let beta = solve_least_squares(&x, &y, 0.0).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-9);
        assert!((beta[1] + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_mixed_units_not_flagged_singular() {
        // y = 0.5 * salary-scale column + 3 * inch-scale column
        let rows: Vec<[f64; 2]> = (0..6)
            .map(|i| {
                let i = i as f64;
                [1.0e6 * (i - 2.5) + 2.0e5 * (i * i - 5.0), 0.5 * (i % 3.0 - 1.0)]
            })
            .collect();
        let x = Mat::from_fn(6, 2, |i, j| rows[i][j]);
        let y = Mat::from_fn(6, 1, |i, _| 0.5 * rows[i][0] + 3.0 * rows[i][1]);

        let beta = solve_least_squares(&x, &y, 0.0).unwrap();

        assert!((beta[0] - 0.5).abs() < 1e-9);
        assert!((beta[1] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_regularization_makes_collinear_solvable() {
        let x = mat(&[&[1.0, 1.0], &[2.0, 2.0], &[3.0, 3.0]]);
        let y = mat(&[&[1.0], &[2.0], &[3.0]]);
        assert!(solve_least_squares(&x, &y, 0.0).is_err());
        assert!(solve_least_squares(&x, &y, 0.1).is_ok());
    }
}
