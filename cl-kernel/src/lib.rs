//! Accelerator-side matrix multiplication program.
//!
//! The OpenCL C source lives in `resources/kernel.cl` and is compiled by the
//! host at runtime. It exposes two entry points:
//!
//! * [`TILED_ENTRY`] `(A, B, Result, R, C, G)` - one `BLOCK_SIZE x BLOCK_SIZE`
//!   output tile per work-group, staging operand tiles in local memory.
//! * [`NAIVE_ENTRY`] `(A, B, Result, R, C)` - one output cell per work-item,
//!   reading both operands straight from global memory.
//!
//! [`emulate`] models both kernels on the host, work-group by work-group.

pub mod emulate;

/// Tiled (local-memory) kernel entry point.
pub const TILED_ENTRY: &str = "optimization_1_multiplication";

/// Naive (global-memory) kernel entry point.
pub const NAIVE_ENTRY: &str = "simple_multiplication";

/// Preprocessor define carrying the tile edge into the program build.
pub const BLOCK_SIZE_DEFINE: &str = "BLOCK_SIZE";

/// Preprocessor define carrying the inner dimension `G` to the naive kernel.
pub const GENERAL_SIZE_DEFINE: &str = "GENERAL_SIZE";

/// Directory shipping the kernel source.
pub const RESOURCE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/resources");

/// Kernel source file name inside [`RESOURCE_DIR`].
pub const KERNEL_FILE: &str = "kernel.cl";

/// Kernel source as shipped with this crate.
pub const SOURCE: &str = include_str!("../resources/kernel.cl");
