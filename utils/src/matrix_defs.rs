use core::fmt;

const F32_BYTES: usize = core::mem::size_of::<f32>();

/// Logical dimensions of a dense row-major matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixShape {
    pub rows: usize,
    pub cols: usize,
}

impl MatrixShape {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub const fn size(&self) -> usize {
        self.rows * self.cols
    }

    pub const fn is_valid(&self) -> bool {
        self.rows > 0 && self.cols > 0
    }

    /// Byte length of an `f32` buffer holding this matrix.
    pub const fn byte_len(&self) -> usize {
        self.size() * F32_BYTES
    }

    pub fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows, "Row index out of bounds");
        debug_assert!(col < self.cols, "Column index out of bounds");
        row * self.cols + col
    }
}

impl fmt::Display for MatrixShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Dimensions of `A (R x G) * B (G x C) = Result (R x C)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GemmShape {
    pub rows: usize,
    pub inner: usize,
    pub cols: usize,
}

impl GemmShape {
    pub const fn new(rows: usize, inner: usize, cols: usize) -> Self {
        Self { rows, inner, cols }
    }

    pub const fn square(size: usize) -> Self {
        Self::new(size, size, size)
    }

    pub const fn lhs(&self) -> MatrixShape {
        MatrixShape::new(self.rows, self.inner)
    }

    pub const fn rhs(&self) -> MatrixShape {
        MatrixShape::new(self.inner, self.cols)
    }

    pub const fn output(&self) -> MatrixShape {
        MatrixShape::new(self.rows, self.cols)
    }

    pub const fn is_valid(&self) -> bool {
        self.rows > 0 && self.inner > 0 && self.cols > 0
    }

    /// Floating point operations of one multiplication (one mul + one add per term).
    pub fn flops(&self) -> f64 {
        2.0 * self.rows as f64 * self.inner as f64 * self.cols as f64
    }

    pub fn is_compatible(a: &MatrixShape, b: &MatrixShape, c: &MatrixShape) -> bool {
        a.cols == b.rows && a.rows == c.rows && b.cols == c.cols
    }

    /// Derives the GEMM shape from two operand shapes, if they chain.
    pub fn from_operands(a: &MatrixShape, b: &MatrixShape) -> Option<Self> {
        if a.cols != b.rows {
            return None;
        }
        Some(Self::new(a.rows, a.cols, b.cols))
    }
}

impl fmt::Display for GemmShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R={}, G={}, C={}", self.rows, self.inner, self.cols)
    }
}

/// Square work-group decomposition used by the tiled kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileConfig {
    pub block: usize,
}

impl TileConfig {
    pub const fn new(block: usize) -> Self {
        Self { block }
    }

    pub const fn work_items(&self) -> usize {
        self.block * self.block
    }

    /// Local memory taken by the two staged `f32` tiles of one work-group.
    pub const fn local_mem_bytes(&self) -> usize {
        2 * self.work_items() * F32_BYTES
    }

    /// Number of `block`-wide chunks needed to cover the inner dimension.
    pub const fn chunks(&self, inner: usize) -> usize {
        (inner + self.block - 1) / self.block
    }

    pub const fn round_up(&self, extent: usize) -> usize {
        self.chunks(extent) * self.block
    }

    /// 2D global index space covering the output, padded to whole work-groups.
    pub const fn global_size(&self, shape: &GemmShape) -> [usize; 2] {
        [self.round_up(shape.rows), self.round_up(shape.cols)]
    }

    pub const fn local_size(&self) -> [usize; 2] {
        [self.block, self.block]
    }

    pub const fn divides(&self, shape: &GemmShape) -> bool {
        shape.rows % self.block == 0 && shape.cols % self.block == 0
    }
}

impl Default for TileConfig {
    fn default() -> Self {
        Self::new(16)
    }
}
