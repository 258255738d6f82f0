//! Console report of a benchmark run.

use std::io::{self, Write};

use utils::GemmShape;

use crate::device::DeviceReport;
use crate::timing::{self, TimingSample};
use crate::validate::Validation;

/// Timings and verdict of one kernel.
#[derive(Debug, Clone)]
pub struct KernelReport {
    /// Registered name of the compiled kernel.
    pub name: String,
    pub samples: Vec<TimingSample>,
    pub validation: Validation,
}

impl KernelReport {
    pub fn mean_ms(&self) -> f64 {
        timing::mean_ms(&self.samples).unwrap_or(0.0)
    }

    pub fn min_ms(&self) -> f64 {
        timing::min_ms(&self.samples).unwrap_or(0.0)
    }

    pub fn gflops(&self, shape: &GemmShape) -> f64 {
        let seconds = self.mean_ms() / 1_000.0;
        if seconds > 0.0 {
            shape.flops() / seconds / 1e9
        } else {
            0.0
        }
    }
}

pub fn write_device<W: Write>(out: &mut W, device: &DeviceReport) -> io::Result<()> {
    writeln!(out, "Device name: {}", device.name)?;
    writeln!(out, "Device max compute units: {}", device.compute_units)?;
    writeln!(out, "Device local mem size: {}", device.local_mem_bytes)?;
    writeln!(
        out,
        "Device max work group size: {}",
        device.max_work_group_size
    )?;
    writeln!(out)
}

pub fn write_selected<W: Write>(out: &mut W, name: &str) -> io::Result<()> {
    writeln!(out, "Using device: {name}")
}

pub fn write_kernel<W: Write>(
    out: &mut W,
    report: &KernelReport,
    shape: &GemmShape,
) -> io::Result<()> {
    writeln!(out, "Execution time in milliseconds: {}", report.mean_ms())?;
    if report.samples.len() > 1 {
        writeln!(
            out,
            "  {} runs: min {:.3} ms, mean {:.3} ms, {:.2} GFLOPS",
            report.samples.len(),
            report.min_ms(),
            report.mean_ms(),
            report.gflops(shape)
        )?;
    }
    let verdict = if report.validation.is_correct() {
        "correct"
    } else {
        "incorrect"
    };
    writeln!(out, "Calculation in {} is {verdict}.", report.name)
}
