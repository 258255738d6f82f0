//! Naive vs. tiled OpenCL matrix multiplication benchmark.
//!
//! Generates two random matrices, computes a sequential CPU reference, then
//! runs the tiled and the naive kernel from `cl-kernel` on one OpenCL device,
//! timing each dispatch with profiling events and validating its output.
//! Device support is behind the `opencl` feature.

pub mod bench;
pub mod config;
pub mod device;
pub mod error;
#[cfg(feature = "opencl")]
pub mod executor;
pub mod matrix;
pub mod reference;
pub mod report;
pub mod source;
pub mod timing;
pub mod validate;
pub mod variant;

pub use bench::{run_benchmark, Workload};
pub use config::BenchConfig;
pub use device::DeviceReport;
pub use error::{BenchError, Result};
pub use matrix::{generate_matrix, Matrix};
pub use reference::reference_multiply;
pub use report::KernelReport;
pub use source::KernelSource;
pub use timing::TimingSample;
pub use utils::{GemmShape, MatrixShape, TileConfig};
pub use validate::{validate, Comparison, Validation};
pub use variant::KernelVariant;

#[cfg(feature = "opencl")]
pub use bench::Benchmark;
#[cfg(feature = "opencl")]
pub use device::{list_devices, TargetDevice};
#[cfg(feature = "opencl")]
pub use executor::{DeviceExecutor, KernelRun, ResultLease, StagedOperands};
