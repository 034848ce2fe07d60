//! RSRQ trend predictor
//!
//! Fits a least-squares polynomial through the last few RSRQ samples
//! (t = 0, 1, .., n-1) and extrapolates it one step ahead, to t = n. The
//! degree grows with the amount of data: constant for one sample, linear
//! for two or three, quadratic from four on.

use ndarray::{Array1, Array2, ArrayView1};

/// Polynomial degree used for `n` samples
pub fn fit_degree(n: usize) -> usize {
    match n {
        0 | 1 => 0,
        2 | 3 => 1,
        _ => 2,
    }
}

/// Least-squares coefficients `c[0] + c[1] t + c[2] t^2 ..` of the given
/// degree through `(i, samples[i])`.
///
/// Returns `None` when there are fewer samples than coefficients or the
/// normal equations are singular.
pub fn fit_polynomial(samples: &[f64], degree: usize) -> Option<Vec<f64>> {
    let m = degree + 1;
    let n = samples.len();
    if n < m {
        return None;
    }

    // Vandermonde design matrix, row i = [1, t, t^2, ..] at t = i
    let x = Array2::from_shape_fn((n, m), |(i, j)| (i as f64).powi(j as i32));
    let y = ArrayView1::from(samples);

    // Normal equations: (X^T X) c = X^T y
    let xt = x.t();
    let xtx = xt.dot(&x);
    let xty = xt.dot(&y);

    solve(xtx, xty).map(|c| c.to_vec())
}

/// Gaussian elimination with partial pivoting on `a c = b`
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Option<Array1<f64>> {
    let m = b.len();
    for col in 0..m {
        let pivot = (col..m).max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))?;
        if a[[pivot, col]].abs() < 1e-12 {
            return None;
        }
        if pivot != col {
            for k in 0..m {
                a.swap([col, k], [pivot, k]);
            }
            b.swap(col, pivot);
        }

        for row in (col + 1)..m {
            let factor = a[[row, col]] / a[[col, col]];
            for k in col..m {
                let delta = factor * a[[col, k]];
                a[[row, k]] -= delta;
            }
            let delta = factor * b[col];
            b[row] -= delta;
        }
    }

    let mut c = Array1::<f64>::zeros(m);
    for row in (0..m).rev() {
        let tail: f64 = ((row + 1)..m).map(|k| a[[row, k]] * c[k]).sum();
        c[row] = (b[row] - tail) / a[[row, row]];
    }
    Some(c)
}

/// Value of `coefficients` (lowest order first) at `t`
pub fn evaluate(coefficients: &[f64], t: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * t + c)
}

/// Extrapolation of `samples` to the next time step
pub fn predict_next(samples: &[f64]) -> Option<f64> {
    let n = samples.len();
    if n == 0 {
        return None;
    }
    let coefficients = fit_polynomial(samples, fit_degree(n))?;
    Some(evaluate(&coefficients, n as f64))
}
