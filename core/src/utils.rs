use nalgebra::DMatrix;

use crate::error::GridError;

/// Create a symmetric, square matrix. Function is only run for the lower triangle of the matrix
pub(crate) fn symmetric_matrix(n: usize, mut func: impl FnMut(usize, usize) -> f64) -> DMatrix<f64> {
    let m = DMatrix::from_fn(n, n, |i, j| if i >= j { func(i, j) } else { 0.0 });
    DMatrix::from_fn(n, n, |i, j| if i >= j { m[(i, j)] } else { m[(j, i)] })
}

/// Allocates `len` zeroes, reporting allocation failure instead of aborting.
pub(crate) fn try_zeroed(len: usize, what: &'static str) -> Result<Vec<f64>, GridError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| GridError::Allocation {
            what,
            elements: len,
        })?;
    buffer.resize(len, 0.0);
    Ok(buffer)
}

/// `base^exp` by repeated multiplication. Non-positive exponents give 1, including `0^0`.
#[inline(always)]
pub(crate) fn int_pow(base: f64, exp: i32) -> f64 {
    let mut result = 1.0;
    for _ in 0..exp {
        result *= base;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_matrix_mirrors_lower_triangle() {
        let m = symmetric_matrix(3, |i, j| (10 * i + j) as f64);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(m[(i, j)], m[(j, i)]);
            }
        }
        assert_eq!(m[(0, 2)], 20.0);
    }

    #[test]
    fn int_pow_treats_zero_exponent_as_one() {
        assert_eq!(int_pow(0.0, 0), 1.0);
        assert_eq!(int_pow(-2.0, 3), -8.0);
        assert_eq!(int_pow(3.0, -1), 1.0);
    }
}
