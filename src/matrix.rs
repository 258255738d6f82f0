use rand::Rng;
use utils::MatrixShape;

use crate::error::{BenchError, Result};

/// Dense row-major `f32` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    shape: MatrixShape,
    data: Vec<f32>,
}

impl Matrix {
    pub fn zeros(shape: MatrixShape) -> Self {
        Self {
            shape,
            data: vec![0.0; shape.size()],
        }
    }

    pub fn from_vec(shape: MatrixShape, data: Vec<f32>) -> Result<Self> {
        if data.len() != shape.size() {
            return Err(BenchError::BufferLength {
                shape,
                len: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> MatrixShape {
        self.shape
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[self.shape.index(row, col)]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }
}

/// Fills a matrix with independent uniform samples from `[0, 1)`.
pub fn generate_matrix<R: Rng + ?Sized>(rng: &mut R, shape: MatrixShape) -> Matrix {
    let data = (0..shape.size()).map(|_| rng.gen::<f32>()).collect();
    Matrix { shape, data }
}
