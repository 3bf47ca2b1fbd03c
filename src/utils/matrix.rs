//! Column-wise helpers on `faer` matrices.

use faer::{Col, Mat};

/// Flags columns whose values all lie within `tolerance` of the first row.
/// With no rows every column counts as constant.
pub fn detect_constant_columns(x: &Mat<f64>, tolerance: f64) -> Vec<bool> {
    (0..x.ncols())
        .map(|j| {
            x.nrows() == 0 || (1..x.nrows()).all(|i| (x[(i, j)] - x[(0, j)]).abs() < tolerance)
        })
        .collect()
}

/// Subtracts each column's mean; returns the centered matrix and the means.
pub fn center_columns(x: &Mat<f64>) -> (Mat<f64>, Col<f64>) {
    let n = x.nrows() as f64;
    let means = Col::from_fn(x.ncols(), |j| (0..x.nrows()).map(|i| x[(i, j)]).sum::<f64>() / n);
    let centered = Mat::from_fn(x.nrows(), x.ncols(), |i, j| x[(i, j)] - means[j]);
    (centered, means)
}

/// Subtracts the mean of `y`; returns the centered vector and the mean.
pub fn center_vector(y: &Col<f64>) -> (Col<f64>, f64) {
    let mean = y.iter().sum::<f64>() / y.nrows() as f64;
    (Col::from_fn(y.nrows(), |i| y[i] - mean), mean)
}

/// Rows `start..end` of a design matrix and its response.
pub fn row_range(x: &Mat<f64>, y: &Col<f64>, start: usize, end: usize) -> (Mat<f64>, Col<f64>) {
    let n = end - start;
    (
        Mat::from_fn(n, x.ncols(), |i, j| x[(start + i, j)]),
        Col::from_fn(n, |i| y[start + i]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_columns() {
        let x = Mat::from_fn(5, 3, |i, j| match j {
            0 => 1.0,
            1 => i as f64,
            _ => 2.0,
        });
        assert_eq!(detect_constant_columns(&x, 1e-10), vec![true, false, true]);

        let empty = Mat::<f64>::zeros(0, 2);
        assert_eq!(detect_constant_columns(&empty, 1e-10), vec![true, true]);
    }

    #[test]
    fn test_constant_tolerance() {
        let x = Mat::from_fn(3, 1, |i, _| if i == 1 { 1.000001 } else { 1.0 });
        assert_eq!(detect_constant_columns(&x, 1e-10), vec![false]);
        assert_eq!(detect_constant_columns(&x, 1e-5), vec![true]);
    }

    #[test]
    fn test_centering() {
        let x = Mat::from_fn(4, 2, |i, j| (i + 1) as f64 * if j == 0 { 1.0 } else { 10.0 });
        let (centered, means) = center_columns(&x);

        assert!((means[0] - 2.5).abs() < 1e-12);
        assert!((means[1] - 25.0).abs() < 1e-12);
        for j in 0..2 {
            let sum: f64 = (0..4).map(|i| centered[(i, j)]).sum();
            assert!(sum.abs() < 1e-10);
        }

        let (yc, mean) = center_vector(&Col::from_fn(4, |i| (i + 1) as f64));
        assert!((mean - 2.5).abs() < 1e-12);
        assert!(yc.iter().sum::<f64>().abs() < 1e-12);
    }

    #[test]
    fn test_row_range() {
        let x = Mat::from_fn(6, 1, |i, _| i as f64);
        let y = Col::from_fn(6, |i| 10.0 * i as f64);

        let (x_mid, y_mid) = row_range(&x, &y, 2, 5);
        assert_eq!(x_mid.nrows(), 3);
        assert_eq!(x_mid[(0, 0)], 2.0);
        assert_eq!(y_mid[2], 40.0);
    }
}
