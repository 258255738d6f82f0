//! Host models of the device kernels.
//!
//! The tiled model walks the same work-group decomposition the device uses.
//! Each chunk runs as two phases over every work-item of the group: first
//! all staging loads, then all partial products. That is the ordering the
//! two barriers in the kernel enforce, so the model reproduces the device
//! result cell for cell, including the ragged-edge handling.

use utils::{GemmShape, TileConfig};

/// Per-cell multiply-accumulate straight from the operands.
pub fn naive_multiplication(shape: GemmShape, a: &[f32], b: &[f32]) -> Vec<f32> {
    assert_operands(&shape, a, b);

    let mut result = vec![0.0f32; shape.output().size()];
    for row in 0..shape.rows {
        for col in 0..shape.cols {
            let mut sum = 0.0f32;
            for k in 0..shape.inner {
                sum += a[row * shape.inner + k] * b[k * shape.cols + col];
            }
            result[row * shape.cols + col] = sum;
        }
    }
    result
}

/// Work-group model of the tiled kernel.
pub fn tiled_multiplication(shape: GemmShape, tile: TileConfig, a: &[f32], b: &[f32]) -> Vec<f32> {
    assert_operands(&shape, a, b);
    assert!(tile.block > 0, "tile edge must be positive");

    let block = tile.block;
    let [global_rows, global_cols] = tile.global_size(&shape);
    let mut result = vec![0.0f32; shape.output().size()];

    let mut tile_a = vec![0.0f32; tile.work_items()];
    let mut tile_b = vec![0.0f32; tile.work_items()];
    let mut sums = vec![0.0f32; tile.work_items()];

    for group_row in 0..global_rows / block {
        for group_col in 0..global_cols / block {
            sums.fill(0.0);

            for chunk in 0..tile.chunks(shape.inner) {
                let base = chunk * block;

                for local_row in 0..block {
                    for local_col in 0..block {
                        let row = group_row * block + local_row;
                        let col = group_col * block + local_col;
                        let a_col = base + local_col;
                        let b_row = base + local_row;

                        let slot = local_row * block + local_col;

                        tile_a[slot] = if row < shape.rows && a_col < shape.inner {
                            a[row * shape.inner + a_col]
                        } else {
                            0.0
                        };
                        tile_b[slot] = if b_row < shape.inner && col < shape.cols {
                            b[b_row * shape.cols + col]
                        } else {
                            0.0
                        };
                    }
                }

                let span = block.min(shape.inner - base);
                for local_row in 0..block {
                    for local_col in 0..block {
                        let sum = &mut sums[local_row * block + local_col];
                        for k in 0..span {
                            *sum += tile_a[local_row * block + k] * tile_b[k * block + local_col];
                        }
                    }
                }
            }

            for local_row in 0..block {
                for local_col in 0..block {
                    let row = group_row * block + local_row;
                    let col = group_col * block + local_col;
                    if row < shape.rows && col < shape.cols {
                        result[row * shape.cols + col] = sums[local_row * block + local_col];
                    }
                }
            }
        }
    }

    result
}

fn assert_operands(shape: &GemmShape, a: &[f32], b: &[f32]) {
    let (lhs, rhs) = (shape.lhs(), shape.rhs());
    assert_eq!(a.len(), lhs.size(), "lhs length does not match {lhs}");
    assert_eq!(b.len(), rhs.size(), "rhs length does not match {rhs}");
}
