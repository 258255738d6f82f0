use std::path::PathBuf;

use thiserror::Error;
use utils::MatrixShape;

pub type Result<T> = std::result::Result<T, BenchError>;

/// Direction of a host/device copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    HostToDevice,
    DeviceToHost,
}

impl std::fmt::Display for Transfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HostToDevice => f.write_str("host to device"),
            Self::DeviceToHost => f.write_str("device to host"),
        }
    }
}

/// Errors produced while staging, building and running the benchmark.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("no OpenCL platform found, install an OpenCL runtime")]
    NoPlatform,

    #[error("no OpenCL platform at index {index} ({available} available)")]
    PlatformIndex { index: usize, available: usize },

    #[error("no OpenCL devices found on platform {platform}")]
    NoDevice { platform: String },

    #[error("no OpenCL device at index {index} ({available} available)")]
    DeviceIndex { index: usize, available: usize },

    #[error("OpenCL support not compiled, rebuild with --features opencl")]
    OpenClUnavailable,

    #[error("failed to query {what}: {message}")]
    Query { what: &'static str, message: String },

    #[error("failed to create {what}: {message}")]
    Setup { what: &'static str, message: String },

    #[error("failed to read kernel source {}: {source}", .path.display())]
    KernelSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error building kernel program for {device}:\n{log}")]
    Build { device: String, log: String },

    #[error("failed to allocate {bytes} byte device buffer: {message}")]
    Allocation { bytes: usize, message: String },

    #[error("{direction} transfer of {bytes} bytes failed: {message}")]
    Transfer {
        direction: Transfer,
        bytes: usize,
        message: String,
    },

    #[error("failed to bind arguments of {kernel}: {message}")]
    ArgumentBinding {
        kernel: &'static str,
        message: String,
    },

    #[error("dispatch of {kernel} failed: {message}")]
    Dispatch {
        kernel: &'static str,
        message: String,
    },

    #[error("failed to read profiling timestamps of {kernel}: {message}")]
    Profiling {
        kernel: &'static str,
        message: String,
    },

    #[error(
        "work-group {block}x{block} exceeds device limits \
         (max work-group size {max_work_group_size}, local memory {local_mem_bytes} bytes)"
    )]
    WorkGroupLimit {
        block: usize,
        max_work_group_size: usize,
        local_mem_bytes: u64,
    },

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        expected: MatrixShape,
        actual: MatrixShape,
    },

    #[error("buffer of {len} values cannot hold a {shape} matrix")]
    BufferLength { shape: MatrixShape, len: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),
}

impl BenchError {
    /// True when the machine has nothing to run on; no computation was attempted.
    pub fn is_environment(&self) -> bool {
        matches!(
            self,
            Self::NoPlatform
                | Self::PlatformIndex { .. }
                | Self::NoDevice { .. }
                | Self::DeviceIndex { .. }
                | Self::OpenClUnavailable
        )
    }

    pub fn is_build(&self) -> bool {
        matches!(self, Self::Build { .. })
    }
}
