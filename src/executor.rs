use ocl::enums::{ProfilingInfo, ProfilingInfoResult};
use ocl::{flags, Buffer, Context, Event, Kernel, Program, Queue};
use tracing::{debug, info};
use utils::{GemmShape, MatrixShape, TileConfig};

use crate::device::{DeviceReport, TargetDevice};
use crate::error::{BenchError, Result, Transfer};
use crate::matrix::Matrix;
use crate::source::KernelSource;
use crate::timing::TimingSample;
use crate::variant::KernelVariant;

/// Owns the compute context, command queue and compiled program of one device.
pub struct DeviceExecutor {
    queue: Queue,
    program: Program,
    report: DeviceReport,
    shape: GemmShape,
    tile: TileConfig,
}

/// Device-resident operands plus the shared result buffer.
pub struct StagedOperands {
    shape: GemmShape,
    a: Buffer<f32>,
    b: Buffer<f32>,
    result: Buffer<f32>,
}

/// Exclusive hold on the result buffer for one dispatch.
///
/// Consumed by [`DeviceExecutor::dispatch`]; the next lease can only be taken
/// once the previous dispatch has returned its read-back output.
pub struct ResultLease<'a> {
    shape: GemmShape,
    a: &'a Buffer<f32>,
    b: &'a Buffer<f32>,
    result: &'a mut Buffer<f32>,
}

/// Output and timing of one kernel dispatch.
#[derive(Debug, Clone)]
pub struct KernelRun {
    /// Function name reported by the compiled kernel object.
    pub name: String,
    pub timing: TimingSample,
    pub output: Matrix,
}

impl StagedOperands {
    pub fn lease(&mut self) -> ResultLease<'_> {
        ResultLease {
            shape: self.shape,
            a: &self.a,
            b: &self.b,
            result: &mut self.result,
        }
    }
}

fn setup<E: std::fmt::Display>(what: &'static str) -> impl FnOnce(E) -> BenchError {
    move |e| BenchError::Setup {
        what,
        message: e.to_string(),
    }
}

fn dispatch_failed<E: std::fmt::Display>(kernel: &'static str) -> impl FnOnce(E) -> BenchError {
    move |e| BenchError::Dispatch {
        kernel,
        message: e.to_string(),
    }
}

fn profiling_failed<E: std::fmt::Display>(kernel: &'static str) -> impl FnOnce(E) -> BenchError {
    move |e| BenchError::Profiling {
        kernel,
        message: e.to_string(),
    }
}

fn transfer<E: std::fmt::Display>(
    direction: Transfer,
    shape: MatrixShape,
) -> impl FnOnce(E) -> BenchError {
    move |e| BenchError::Transfer {
        direction,
        bytes: shape.byte_len(),
        message: e.to_string(),
    }
}

impl DeviceExecutor {
    /// Creates the context and profiling queue and builds the program.
    ///
    /// The program is compiled once for `shape`/`tile` and serves both kernels.
    pub fn new(
        target: &TargetDevice,
        source: &KernelSource,
        shape: GemmShape,
        tile: TileConfig,
    ) -> Result<Self> {
        let context = Context::builder()
            .platform(target.platform)
            .devices(target.device)
            .build()
            .map_err(setup("context"))?;

        let profiling = Some(flags::CommandQueueProperties::PROFILING_ENABLE);
        let queue = Queue::new(&context, target.device, profiling)
            .map_err(setup("command queue"))?;

        info!("Building {} for {}", source.path().display(), target.name());
        let program = Program::builder()
            .src(source.text())
            .devices(target.device)
            .cmplr_def(cl_kernel::BLOCK_SIZE_DEFINE, tile.block as i32)
            .cmplr_def(cl_kernel::GENERAL_SIZE_DEFINE, shape.inner as i32)
            .build(&context)
            .map_err(|e| BenchError::Build {
                device: target.name().to_owned(),
                log: e.to_string(),
            })?;

        Ok(Self {
            queue,
            program,
            report: target.report.clone(),
            shape,
            tile,
        })
    }

    fn allocate(&self, shape: MatrixShape, flags: flags::MemFlags) -> Result<Buffer<f32>> {
        Buffer::<f32>::builder()
            .queue(self.queue.clone())
            .flags(flags)
            .len(shape.size())
            .build()
            .map_err(|e| BenchError::Allocation {
                bytes: shape.byte_len(),
                message: e.to_string(),
            })
    }

    fn expect_shape(expected: MatrixShape, matrix: &Matrix) -> Result<()> {
        if matrix.shape() != expected {
            return Err(BenchError::ShapeMismatch {
                expected,
                actual: matrix.shape(),
            });
        }
        Ok(())
    }

    /// Allocates the three buffers and copies `a` and `b` to the device.
    ///
    /// Both writes block until the transfer has completed.
    pub fn stage(&self, a: &Matrix, b: &Matrix) -> Result<StagedOperands> {
        Self::expect_shape(self.shape.lhs(), a)?;
        Self::expect_shape(self.shape.rhs(), b)?;

        let a_buf = self.allocate(self.shape.lhs(), flags::MEM_READ_ONLY)?;
        let b_buf = self.allocate(self.shape.rhs(), flags::MEM_READ_ONLY)?;
        let result = self.allocate(self.shape.output(), flags::MEM_READ_WRITE)?;

        a_buf
            .write(a.as_slice())
            .enq()
            .map_err(transfer(Transfer::HostToDevice, self.shape.lhs()))?;
        b_buf
            .write(b.as_slice())
            .enq()
            .map_err(transfer(Transfer::HostToDevice, self.shape.rhs()))?;

        debug!(
            lhs = %self.shape.lhs(),
            rhs = %self.shape.rhs(),
            bytes = self.shape.lhs().byte_len() + self.shape.rhs().byte_len(),
            "operands staged"
        );
        Ok(StagedOperands {
            shape: self.shape,
            a: a_buf,
            b: b_buf,
            result,
        })
    }

    fn check_work_group(&self) -> Result<()> {
        let fits = self.tile.work_items() <= self.report.max_work_group_size
            && self.tile.local_mem_bytes() as u64 <= self.report.local_mem_bytes;
        if !fits {
            return Err(BenchError::WorkGroupLimit {
                block: self.tile.block,
                max_work_group_size: self.report.max_work_group_size,
                local_mem_bytes: self.report.local_mem_bytes,
            });
        }
        Ok(())
    }

    /// Runs one kernel to completion and reads its result back.
    pub fn dispatch(&self, variant: KernelVariant, lease: ResultLease<'_>) -> Result<KernelRun> {
        let entry = variant.entry_point();
        let shape = lease.shape;
        if variant == KernelVariant::Tiled {
            self.check_work_group()?;
        }

        let global = variant.global_size(&shape, &self.tile);
        let local = variant.local_size(&self.tile);
        debug!(kernel = entry, ?global, ?local, "dispatching");

        let mut builder = Kernel::builder();
        builder
            .program(&self.program)
            .name(entry)
            .queue(self.queue.clone())
            .global_work_size(global)
            .arg(lease.a)
            .arg(lease.b)
            .arg(&*lease.result)
            .arg(shape.rows as i32)
            .arg(shape.cols as i32);
        if variant == KernelVariant::Tiled {
            builder.arg(shape.inner as i32);
        }
        if let Some(local) = local {
            builder.local_work_size(local);
        }
        let kernel = builder.build().map_err(|e| BenchError::ArgumentBinding {
            kernel: entry,
            message: e.to_string(),
        })?;

        let mut event = Event::empty();
        unsafe {
            kernel
                .cmd()
                .enew(&mut event)
                .enq()
                .map_err(dispatch_failed(entry))?;
        }
        event.wait_for().map_err(dispatch_failed(entry))?;
        self.queue.finish().map_err(dispatch_failed(entry))?;

        let timestamp = |info: ProfilingInfo| -> Result<u64> {
            let answer = event.profiling_info(info);
            match answer.map_err(profiling_failed(entry))? {
                ProfilingInfoResult::Start(ns) | ProfilingInfoResult::End(ns) => Ok(ns),
                other => {
                    let message = format!("unexpected answer {other:?}");
                    Err(profiling_failed(entry)(message))
                }
            }
        };
        let start = timestamp(ProfilingInfo::Start)?;
        let end = timestamp(ProfilingInfo::End)?;
        let timing = TimingSample::new(start, end);

        let name = kernel.name().map_err(|e| BenchError::Query {
            what: "kernel name",
            message: e.to_string(),
        })?;

        let mut output = Matrix::zeros(shape.output());
        lease
            .result
            .read(output.as_mut_slice())
            .enq()
            .map_err(transfer(Transfer::DeviceToHost, shape.output()))?;

        info!("{} finished in {:.3} ms", name, timing.elapsed_ms());
        Ok(KernelRun {
            name,
            timing,
            output,
        })
    }
}
