//! Benchmark orchestration: host data, device staging and the two kernel runs.

use std::io::Write;

use rand::Rng;
use tracing::info;
use utils::GemmShape;

use crate::config::BenchConfig;
use crate::error::Result;
use crate::matrix::{generate_matrix, Matrix};
use crate::reference::reference_multiply;
use crate::report::KernelReport;

/// Random operands and their reference product.
#[derive(Debug, Clone)]
pub struct Workload {
    pub shape: GemmShape,
    pub a: Matrix,
    pub b: Matrix,
    pub reference: Matrix,
}

impl Workload {
    pub fn generate<R: Rng + ?Sized>(shape: GemmShape, rng: &mut R) -> Result<Self> {
        let a = generate_matrix(rng, shape.lhs());
        let b = generate_matrix(rng, shape.rhs());
        info!("Computing CPU reference for {}", shape);
        let reference = reference_multiply(&a, &b)?;
        Ok(Self {
            shape,
            a,
            b,
            reference,
        })
    }
}

#[cfg(feature = "opencl")]
pub use self::opencl::Benchmark;

#[cfg(feature = "opencl")]
mod opencl {
    use tracing::warn;

    use super::Workload;
    use crate::config::BenchConfig;
    use crate::device::TargetDevice;
    use crate::error::{BenchError, Result};
    use crate::executor::{DeviceExecutor, StagedOperands};
    use crate::report::KernelReport;
    use crate::source::KernelSource;
    use crate::validate::{validate, Validation};
    use crate::variant::KernelVariant;

    /// A compiled program with the workload staged on the device.
    pub struct Benchmark {
        executor: DeviceExecutor,
        staged: StagedOperands,
        workload: Workload,
        config: BenchConfig,
    }

    impl Benchmark {
        pub fn prepare(
            config: &BenchConfig,
            target: &TargetDevice,
            workload: Workload,
        ) -> Result<Self> {
            config.validate()?;
            let source = KernelSource::load(config.kernel_path())?;
            let executor = DeviceExecutor::new(target, &source, workload.shape, config.tile)?;
            let staged = executor.stage(&workload.a, &workload.b)?;
            Ok(Self {
                executor,
                staged,
                workload,
                config: config.clone(),
            })
        }

        /// Warm-up dispatches, timed dispatches, then validation of the last output.
        pub fn run(&mut self, variant: KernelVariant) -> Result<KernelReport> {
            for _ in 0..self.config.warmup {
                self.executor.dispatch(variant, self.staged.lease())?;
            }

            let mut samples = Vec::with_capacity(self.config.iterations);
            let mut last = None;
            for _ in 0..self.config.iterations {
                let run = self.executor.dispatch(variant, self.staged.lease())?;
                samples.push(run.timing);
                last = Some(run);
            }
            let last = last.ok_or_else(|| {
                BenchError::InvalidConfig("at least one timed iteration is required".into())
            })?;

            let reference = &self.workload.reference;
            let validation = validate(reference, &last.output, self.config.comparison);
            if let Validation::Incorrect { mismatches, first } = &validation {
                warn!(
                    kernel = %last.name,
                    mismatches,
                    row = first.row,
                    col = first.col,
                    expected = first.expected,
                    actual = first.actual,
                    "result differs from CPU reference"
                );
            }

            Ok(KernelReport {
                name: last.name,
                samples,
                validation,
            })
        }
    }
}

/// Runs the whole benchmark, writing the console report to `out` as it goes.
#[cfg(feature = "opencl")]
pub fn run_benchmark<R: Rng + ?Sized, W: Write>(
    config: &BenchConfig,
    rng: &mut R,
    out: &mut W,
) -> Result<Vec<KernelReport>> {
    use crate::device::{list_devices, TargetDevice};
    use crate::report::{write_device, write_kernel, write_selected};
    use crate::variant::KernelVariant;

    config.validate()?;
    let workload = Workload::generate(config.shape, rng)?;

    let devices = list_devices(config.platform_index)?;
    writeln!(out, "Information about devices:")?;
    for device in &devices {
        write_device(out, device)?;
    }
    let target = TargetDevice::resolve(config.platform_index, config.device_index)?;
    write_selected(out, target.name())?;

    let mut bench = Benchmark::prepare(config, &target, workload)?;
    let mut reports = Vec::with_capacity(KernelVariant::ALL.len());
    for variant in KernelVariant::ALL {
        let report = bench.run(variant)?;
        write_kernel(out, &report, &config.shape)?;
        reports.push(report);
    }
    Ok(reports)
}

#[cfg(not(feature = "opencl"))]
pub fn run_benchmark<R: Rng + ?Sized, W: Write>(
    config: &BenchConfig,
    _rng: &mut R,
    _out: &mut W,
) -> Result<Vec<KernelReport>> {
    config.validate()?;
    Err(crate::error::BenchError::OpenClUnavailable)
}
