//! Utility functions for density-matrix arithmetic.
//!
//! This module contains helper functions for:
//! - Matrix operations (Kronecker product, trace, adjoint, outer product, square root).
//! - Trace norms and the positive polar factor $|A| = \sqrt{A^\dagger A}$.
//! - Operator expansion to larger systems.
//! - Completeness checks for measurements and channels.
//!
//! Wires are numbered from the left of the tensor product: wire 0 is the most
//! significant bit of a basis index.

use nalgebra::DMatrix;
use ndarray::{Array1, Array2};
use num_complex::Complex64;

/// Computes the Kronecker (Tensor) product of two matrices.
///
/// If `A` is an $m \times n$ matrix and `B` is a $p \times q$ matrix,
/// the result is an $mp \times nq$ matrix with `A` on the leading wires.
pub fn kronecker_product(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Array2<Complex64> {
    let (m, n) = a.dim();
    let (p, q) = b.dim();

    Array2::from_shape_fn((m * p, n * q), |(r, c)| a[[r / p, c / q]] * b[[r % p, c % q]])
}

/// Computes the trace of a matrix (sum of diagonal elements).
pub fn trace(matrix: &Array2<Complex64>) -> Complex64 {
    matrix.diag().sum()
}

/// Conjugate transpose.
pub fn dagger(matrix: &Array2<Complex64>) -> Array2<Complex64> {
    matrix.t().mapv(|c| c.conj())
}

/// Generates the full operator matrix ($2^N \times 2^N$) for the whole system.
///
/// It expands a local operator acting on `targets` (and controlled by `controls`)
/// to an operator on the full system of `num_total_qubits`. The first entry of
/// `targets` is the most significant bit of the local operator's index.
///
/// Callers are expected to have validated the wire indices.
pub fn expand_operator(
    num_total_qubits: usize,
    matrix: &Array2<Complex64>,
    targets: &[usize],
    controls: &[usize],
) -> Array2<Complex64> {
    let dim = 1 << num_total_qubits;
    let mut full_matrix = Array2::<Complex64>::zeros((dim, dim));

    let control_mask = controls
        .iter()
        .fold(0usize, |mask, &c| mask | wire_bit(num_total_qubits, c));
    let target_mask = targets
        .iter()
        .fold(0usize, |mask, &t| mask | wire_bit(num_total_qubits, t));
    let passive_mask = !target_mask;

    for col_idx in 0..dim {
        // Controls not all set: the basis state passes through untouched
        if (col_idx & control_mask) != control_mask {
            full_matrix[[col_idx, col_idx]] = Complex64::new(1.0, 0.0);
            continue;
        }

        let small_col = extract_bits(num_total_qubits, col_idx, targets);
        for small_row in 0..matrix.nrows() {
            let val = matrix[[small_row, small_col]];
            if val.norm_sqr() < f64::EPSILON {
                continue;
            }
            let row_idx =
                (col_idx & passive_mask) | deposit_bits(num_total_qubits, small_row, targets);
            full_matrix[[row_idx, col_idx]] = val;
        }
    }
    full_matrix
}

/// Bit of the global basis index that carries `wire`.
pub(crate) fn wire_bit(num_total_qubits: usize, wire: usize) -> usize {
    1 << (num_total_qubits - 1 - wire)
}

/// Gathers the bits of `value` on `wires` into a compact index, first wire most significant.
pub(crate) fn extract_bits(num_total_qubits: usize, value: usize, wires: &[usize]) -> usize {
    wires.iter().fold(0, |acc, &w| {
        let bit = usize::from(value & wire_bit(num_total_qubits, w) != 0);
        (acc << 1) | bit
    })
}

/// Scatters the bits of `compact_value` onto `wires`; inverse of [`extract_bits`].
pub(crate) fn deposit_bits(num_total_qubits: usize, compact_value: usize, wires: &[usize]) -> usize {
    let len = wires.len();
    wires.iter().enumerate().fold(0, |acc, (i, &w)| {
        if (compact_value >> (len - 1 - i)) & 1 == 1 {
            acc | wire_bit(num_total_qubits, w)
        } else {
            acc
        }
    })
}

/// Find duplicate in a slice of usize
pub fn find_duplicate(indices: &[usize]) -> Option<usize> {
    let mut seen = std::collections::HashSet::new();
    indices.iter().find(|&&idx| !seen.insert(idx)).copied()
}

/// Checks completeness relation for Kraus operators.
///
/// Verifies if $\sum K_k^\dagger K_k = I$.
pub fn check_completeness(ops: &[Array2<Complex64>], dim: usize) -> bool {
    let eye = Array2::<Complex64>::eye(dim);
    let sum = ops
        .iter()
        .fold(Array2::<Complex64>::zeros((dim, dim)), |acc, op| {
            acc + dagger(op).dot(op)
        });
    sum.iter()
        .zip(eye.iter())
        .all(|(a, b)| (a - b).norm() < 1e-9)
}

/// Computes the outer product of two vectors $|a\rangle\langle b|$.
pub fn outer_product(a: &Array1<Complex64>, b: &Array1<Complex64>) -> Array2<Complex64> {
    Array2::from_shape_fn((a.len(), b.len()), |(i, j)| a[i] * b[j].conj())
}

/// Finds the square root of a positive semi-definite matrix.
///
/// Uses spectral decomposition $M = V D V^\dagger$ to compute $\sqrt{M} = V \sqrt{D} V^\dagger$.
pub fn sqrt_positive_matrix(mat: &Array2<Complex64>) -> Array2<Complex64> {
    let (rows, cols) = mat.dim();

    if rows == 2 && cols == 2 {
        return sqrt_2x2_analytical(mat);
    }

    sqrt_nxn_nalgebra(mat)
}

/// Positive polar factor $|A| = \sqrt{A^\dagger A}$.
pub fn abs_matrix(mat: &Array2<Complex64>) -> Array2<Complex64> {
    sqrt_positive_matrix(&dagger(mat).dot(mat))
}

/// Trace norm $\mathrm{tr}|A|$.
///
/// Hermitian input takes the eigenvalue path ($\sum_i |\lambda_i|$), anything
/// else falls back to the sum of singular values.
pub fn trace_norm(mat: &Array2<Complex64>) -> f64 {
    let na_mat = to_nalgebra(mat);

    if is_hermitian(mat, 1e-10) {
        na_mat
            .symmetric_eigenvalues()
            .iter()
            .map(|val| val.abs())
            .sum()
    } else {
        na_mat.singular_values().iter().sum()
    }
}

/// Direct formula for square root of a 2x2 matrix
/// sqrt(A) = (A + sqrt(det)I) / sqrt(tr + 2sqrt(det))
fn sqrt_2x2_analytical(mat: &Array2<Complex64>) -> Array2<Complex64> {
    let tr = mat[[0, 0]] + mat[[1, 1]];
    let det = mat[[0, 0]] * mat[[1, 1]] - mat[[0, 1]] * mat[[1, 0]];

    let clean_det = if det.norm() < 1e-12 {
        Complex64::new(0.0, 0.0)
    } else {
        det
    };
    let sqrt_det = clean_det.sqrt();

    let s = (tr + Complex64::new(2.0, 0.0) * sqrt_det).sqrt();

    if s.norm() < 1e-12 {
        return Array2::zeros((2, 2));
    }

    let factor = Complex64::new(1.0, 0.0) / s;
    let identity = Array2::<Complex64>::eye(2);

    let numerator = mat + &identity.mapv(|x| x * sqrt_det);
    numerator.mapv(|x| x * factor)
}

fn sqrt_nxn_nalgebra(mat: &Array2<Complex64>) -> Array2<Complex64> {
    let rows = mat.nrows();
    let eigen = to_nalgebra(mat).symmetric_eigen();

    // Clamp the small negative eigenvalues produced by rounding
    let sqrt_eigenvals = DMatrix::from_fn(rows, rows, |r, c| {
        if r == c {
            Complex64::new(eigen.eigenvalues[r].max(0.0).sqrt(), 0.0)
        } else {
            Complex64::new(0.0, 0.0)
        }
    });

    let v = &eigen.eigenvectors;
    let result = v * sqrt_eigenvals * v.adjoint();

    from_nalgebra(&result)
}

fn to_nalgebra(mat: &Array2<Complex64>) -> DMatrix<Complex64> {
    let (rows, cols) = mat.dim();
    DMatrix::from_fn(rows, cols, |r, c| mat[[r, c]])
}

fn from_nalgebra(mat: &DMatrix<Complex64>) -> Array2<Complex64> {
    Array2::from_shape_fn((mat.nrows(), mat.ncols()), |(r, c)| mat[(r, c)])
}

/// Checks if a matrix is Hermitian
pub fn is_hermitian(mat: &Array2<Complex64>, tol: f64) -> bool {
    mat.iter()
        .zip(mat.t().iter())
        .all(|(a, b)| (a - b.conj()).norm() < tol)
}

/// Largest element-wise distance between two matrices of the same shape.
pub fn max_abs_diff(a: &Array2<Complex64>, b: &Array2<Complex64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn kron_places_left_factor_on_leading_wire() {
        let one = array![[c(0.0), c(0.0)], [c(0.0), c(1.0)]];
        let zero = array![[c(1.0), c(0.0)], [c(0.0), c(0.0)]];

        // |1><1| (x) |0><0| = |10><10|
        let k = kronecker_product(&one, &zero);
        assert_eq!(k.dim(), (4, 4));
        assert_eq!(k[[2, 2]], c(1.0));
        assert_relative_eq!(trace(&k).re, 1.0);
    }

    #[test]
    fn expand_operator_uses_leftmost_wire_as_msb() {
        let x = array![[c(0.0), c(1.0)], [c(1.0), c(0.0)]];

        // X on wire 0 of two qubits maps |00> (index 0) to |10> (index 2)
        let full = expand_operator(2, &x, &[0], &[]);
        assert_eq!(full[[2, 0]], c(1.0));
        assert_eq!(full[[0, 0]], c(0.0));

        // Controlled on wire 0, target wire 1: CNOT in the usual textbook layout
        let cnot = expand_operator(2, &x, &[1], &[0]);
        assert_eq!(cnot[[3, 2]], c(1.0));
        assert_eq!(cnot[[2, 3]], c(1.0));
        assert_eq!(cnot[[1, 1]], c(1.0));
    }

    #[test]
    fn bit_helpers_round_trip_on_reordered_wires() {
        let wires = [2, 0];
        for compact in 0..4 {
            let global = deposit_bits(3, compact, &wires);
            assert_eq!(extract_bits(3, global, &wires), compact);
        }
        // compact 0b10 sets wire 2 (global bit 0)
        assert_eq!(deposit_bits(3, 0b10, &wires), 0b001);
    }

    #[test]
    fn trace_norm_matches_polar_factor() {
        let a = array![
            [c(0.3), Complex64::new(0.1, -0.2), c(0.0)],
            [Complex64::new(0.1, 0.2), c(-0.5), c(0.05)],
            [c(0.0), c(0.05), c(0.2)]
        ];
        let via_polar = trace(&abs_matrix(&a)).re;
        assert_relative_eq!(trace_norm(&a), via_polar, epsilon = 1e-9);
    }

    #[test]
    fn trace_norm_of_non_hermitian_uses_singular_values() {
        let a = array![[c(0.0), c(2.0)], [c(0.0), c(0.0)]];
        assert_relative_eq!(trace_norm(&a), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn sqrt_of_projector_is_itself() {
        let p = array![[c(0.5), c(0.5)], [c(0.5), c(0.5)]];
        let root = sqrt_positive_matrix(&p);
        assert!(max_abs_diff(&root, &p) < 1e-9);
    }
}
