use std::path::PathBuf;

use utils::{GemmShape, TileConfig};

use crate::error::{BenchError, Result};
use crate::validate::Comparison;

/// Benchmark parameters. Defaults reproduce the 512^3, 16x16-tile run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    pub shape: GemmShape,
    pub tile: TileConfig,
    pub platform_index: usize,
    pub device_index: usize,
    /// Directory the kernel file is resolved against.
    pub resource_root: PathBuf,
    pub kernel_file: PathBuf,
    pub seed: Option<u64>,
    pub iterations: usize,
    pub warmup: usize,
    pub comparison: Comparison,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            shape: GemmShape::square(512),
            tile: TileConfig::new(16),
            platform_index: 0,
            device_index: 0,
            resource_root: PathBuf::from(cl_kernel::RESOURCE_DIR),
            kernel_file: PathBuf::from(cl_kernel::KERNEL_FILE),
            seed: None,
            iterations: 1,
            warmup: 0,
            comparison: Comparison::default(),
        }
    }
}

impl BenchConfig {
    pub fn kernel_path(&self) -> PathBuf {
        self.resource_root.join(&self.kernel_file)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.shape.is_valid() {
            return Err(BenchError::InvalidConfig(format!(
                "matrix dimensions must be positive ({})",
                self.shape
            )));
        }
        if self.tile.block == 0 {
            return Err(BenchError::InvalidConfig(
                "tile size must be positive".into(),
            ));
        }
        if self.iterations == 0 {
            return Err(BenchError::InvalidConfig(
                "at least one timed iteration is required".into(),
            ));
        }
        if let Comparison::Relative { tolerance } = self.comparison {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(BenchError::InvalidConfig(format!(
                    "tolerance must be a finite non-negative number, got {tolerance}"
                )));
            }
        }
        // The device indexes with 32-bit ints.
        let largest = self.shape.rows.max(self.shape.cols).max(self.shape.inner);
        let (lhs, rhs, out) = (self.shape.lhs(), self.shape.rhs(), self.shape.output());
        let cells = lhs.size().max(rhs.size()).max(out.size());
        if largest.max(cells) > i32::MAX as usize {
            return Err(BenchError::InvalidConfig(format!(
                "{} overflows 32-bit kernel indexing",
                self.shape
            )));
        }
        Ok(())
    }
}
