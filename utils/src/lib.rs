mod matrix_defs;

pub use matrix_defs::{GemmShape, MatrixShape, TileConfig};
