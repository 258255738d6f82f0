use std::fmt;

use utils::{GemmShape, TileConfig};

/// The two entry points of the kernel program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelVariant {
    /// Local-memory tiled kernel, `BLOCK x BLOCK` work-groups.
    Tiled,
    /// Global-memory kernel, device-chosen work-groups.
    Naive,
}

impl KernelVariant {
    /// Benchmark order. The tiled run and its validation finish before the
    /// naive run reuses the result buffer.
    pub const ALL: [Self; 2] = [Self::Tiled, Self::Naive];

    pub fn entry_point(self) -> &'static str {
        match self {
            Self::Tiled => cl_kernel::TILED_ENTRY,
            Self::Naive => cl_kernel::NAIVE_ENTRY,
        }
    }

    pub fn global_size(self, shape: &GemmShape, tile: &TileConfig) -> [usize; 2] {
        match self {
            Self::Tiled => tile.global_size(shape),
            Self::Naive => [shape.rows, shape.cols],
        }
    }

    /// `None` leaves the work-group shape to the device.
    pub fn local_size(self, tile: &TileConfig) -> Option<[usize; 2]> {
        match self {
            Self::Tiled => Some(tile.local_size()),
            Self::Naive => None,
        }
    }

    /// Runs the host model of this kernel.
    pub fn emulate(self, shape: GemmShape, tile: TileConfig, a: &[f32], b: &[f32]) -> Vec<f32> {
        match self {
            Self::Tiled => cl_kernel::emulate::tiled_multiplication(shape, tile, a, b),
            Self::Naive => cl_kernel::emulate::naive_multiplication(shape, a, b),
        }
    }
}

impl fmt::Display for KernelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entry_point())
    }
}
