use utils::{GemmShape, MatrixShape};

use crate::error::{BenchError, Result};
use crate::matrix::Matrix;

/// Sequential `i-j-k` product used as the validation oracle.
///
/// One `f32` accumulator per output cell, `k` summed in ascending order.
pub fn reference_multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let Some(shape) = GemmShape::from_operands(&a.shape(), &b.shape()) else {
        return Err(BenchError::ShapeMismatch {
            expected: MatrixShape::new(a.shape().cols, b.shape().cols),
            actual: b.shape(),
        });
    };

    let (lhs, rhs) = (a.as_slice(), b.as_slice());
    let mut result = Matrix::zeros(shape.output());
    let out = result.as_mut_slice();

    for i in 0..shape.rows {
        for j in 0..shape.cols {
            let mut sum = 0.0f32;
            for k in 0..shape.inner {
                sum += lhs[i * shape.inner + k] * rhs[k * shape.cols + j];
            }
            out[i * shape.cols + j] = sum;
        }
    }

    Ok(result)
}
