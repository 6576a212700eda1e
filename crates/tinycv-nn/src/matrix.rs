use crate::error::NetworkError;

/// A dense row-major matrix of `f64` values.
///
/// This is the minimal container the network needs: owned contiguous storage
/// with a (rows, cols) shape. Products are delegated to
/// `matrixmultiply::dgemm`, with transposed operands expressed through strides
/// so no data is copied.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Create a matrix from row-major data.
    ///
    /// # Errors
    ///
    /// Returns an error if the data length does not match `rows * cols`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tinycv_nn::matrix::Matrix;
    ///
    /// let m = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    /// assert_eq!(m.get(1, 0), Some(&3.0));
    /// ```
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, NetworkError> {
        if data.len() != rows * cols {
            return Err(NetworkError::InvalidShape(data.len(), rows, cols));
        }
        Ok(Self { data, rows, cols })
    }

    /// Create a matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Create a matrix by calling `f` for each element in row-major order.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut() -> f64) -> Self {
        Self {
            data: (0..rows * cols).map(|_| f()).collect(),
            rows,
            cols,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get a reference to the value at `(row, col)`, or `None` if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col)
    }

    /// The underlying row-major data slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// The underlying mutable row-major data slice.
    pub fn as_slice_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Sum each column over the rows, producing one value per column.
    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.cols];
        for row in self.data.chunks_exact(self.cols) {
            for (sum, v) in sums.iter_mut().zip(row.iter()) {
                *sum += v;
            }
        }
        sums
    }
}

/// C = A * B for row-major operands.
///
/// Shapes must conform: `a` is (m, k), `b` is (k, n).
pub(crate) fn matmul(a: &Matrix, b: &Matrix) -> Matrix {
    debug_assert_eq!(a.cols, b.rows);
    let (m, k, n) = (a.rows, a.cols, b.cols);
    let mut c = Matrix::zeros(m, n);
    unsafe {
        matrixmultiply::dgemm(
            m,
            k,
            n,
            1.0,
            a.data.as_ptr(),
            k as isize,
            1,
            b.data.as_ptr(),
            n as isize,
            1,
            0.0,
            c.data.as_mut_ptr(),
            n as isize,
            1,
        );
    }
    c
}

/// C = A^T * B without materializing the transpose.
///
/// Shapes must conform: `a` is (k, m), `b` is (k, n).
pub(crate) fn matmul_ta(a: &Matrix, b: &Matrix) -> Matrix {
    debug_assert_eq!(a.rows, b.rows);
    let (m, k, n) = (a.cols, a.rows, b.cols);
    let mut c = Matrix::zeros(m, n);
    unsafe {
        matrixmultiply::dgemm(
            m,
            k,
            n,
            1.0,
            a.data.as_ptr(),
            1,
            a.cols as isize,
            b.data.as_ptr(),
            n as isize,
            1,
            0.0,
            c.data.as_mut_ptr(),
            n as isize,
            1,
        );
    }
    c
}

/// C = A * B^T without materializing the transpose.
///
/// Shapes must conform: `a` is (m, k), `b` is (n, k).
pub(crate) fn matmul_tb(a: &Matrix, b: &Matrix) -> Matrix {
    debug_assert_eq!(a.cols, b.cols);
    let (m, k, n) = (a.rows, a.cols, b.rows);
    let mut c = Matrix::zeros(m, n);
    unsafe {
        matrixmultiply::dgemm(
            m,
            k,
            n,
            1.0,
            a.data.as_ptr(),
            k as isize,
            1,
            b.data.as_ptr(),
            1,
            b.cols as isize,
            0.0,
            c.data.as_mut_ptr(),
            n as isize,
            1,
        );
    }
    c
}
