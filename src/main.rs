use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use cl_matmul_bench::{run_benchmark, BenchConfig, Comparison, GemmShape, KernelReport, TileConfig};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Benchmark a naive and a tiled OpenCL matrix multiplication kernel
/// against a sequential CPU reference.
#[derive(Parser, Debug)]
#[command(name = "matmul-bench")]
#[command(version)]
struct Args {
    /// Rows of A and of the result (R)
    #[arg(long, default_value_t = 512)]
    rows: usize,

    /// Columns of B and of the result (C)
    #[arg(long, default_value_t = 512)]
    cols: usize,

    /// Columns of A and rows of B (G)
    #[arg(long, default_value_t = 512)]
    inner: usize,

    /// Tile edge of the tiled kernel's work-groups
    #[arg(long, default_value_t = 16)]
    block: usize,

    /// OpenCL platform index
    #[arg(long, default_value_t = 0)]
    platform: usize,

    /// Device index within the platform
    #[arg(long, default_value_t = 0)]
    device: usize,

    /// Directory the kernel file is resolved against
    #[arg(
        long,
        env = "MATMUL_RESOURCE_ROOT",
        default_value = cl_kernel::RESOURCE_DIR
    )]
    resource_root: PathBuf,

    /// Kernel source file, relative to the resource root
    #[arg(long, default_value = cl_kernel::KERNEL_FILE)]
    kernel_file: PathBuf,

    /// Seed for the matrix generator; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Timed dispatches per kernel
    #[arg(long, default_value_t = 1)]
    iterations: usize,

    /// Untimed dispatches per kernel before timing
    #[arg(long, default_value_t = 0)]
    warmup: usize,

    /// Require bit-exact agreement with the CPU reference
    #[arg(long, conflicts_with = "tolerance")]
    exact: bool,

    /// Relative tolerance for validation
    #[arg(long, default_value_t = 1e-4)]
    tolerance: f32,
}

impl From<Args> for BenchConfig {
    fn from(args: Args) -> Self {
        Self {
            shape: GemmShape::new(args.rows, args.inner, args.cols),
            tile: TileConfig::new(args.block),
            platform_index: args.platform,
            device_index: args.device,
            resource_root: args.resource_root,
            kernel_file: args.kernel_file,
            seed: args.seed,
            iterations: args.iterations,
            warmup: args.warmup,
            comparison: if args.exact {
                Comparison::Exact
            } else {
                Comparison::Relative {
                    tolerance: args.tolerance,
                }
            },
        }
    }
}

/// Prints the diagnostic of a failed run and picks the exit status.
///
/// A machine without a usable device is not a failure. A program that does
/// not build is, and so is anything else that went wrong mid-run.
fn exit_code<W: Write>(
    outcome: cl_matmul_bench::Result<Vec<KernelReport>>,
    out: &mut W,
) -> Result<ExitCode> {
    match outcome {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) if e.is_environment() => {
            writeln!(out, "{e}")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_build() => {
            writeln!(out, "{e}")?;
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = BenchConfig::from(Args::parse());
    let block = config.tile.block;
    tracing::info!("Matrix dimensions: {}, tile {block}x{block}", config.shape);

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let outcome = run_benchmark(&config, &mut rng, &mut out);
    exit_code(outcome, &mut out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cl_matmul_bench::error::Transfer;
    use cl_matmul_bench::BenchError;

    fn status(outcome: cl_matmul_bench::Result<Vec<KernelReport>>) -> (String, String) {
        let mut out = Vec::new();
        let code = exit_code(outcome, &mut out).unwrap();
        (format!("{code:?}"), String::from_utf8(out).unwrap())
    }

    fn success() -> String {
        format!("{:?}", ExitCode::SUCCESS)
    }

    fn failure() -> String {
        format!("{:?}", ExitCode::FAILURE)
    }

    #[test]
    fn defaults_match_library_defaults() {
        let config = BenchConfig::from(Args::parse_from(["matmul-bench"]));
        assert_eq!(config, BenchConfig::default());
    }

    #[test]
    fn exact_flag_selects_bitwise_comparison() {
        let config = BenchConfig::from(Args::parse_from(["matmul-bench", "--exact"]));
        assert_eq!(config.comparison, Comparison::Exact);
    }

    #[test]
    fn rectangular_dimensions() {
        let args = Args::parse_from([
            "matmul-bench",
            "--rows",
            "64",
            "--inner",
            "32",
            "--cols",
            "48",
            "--block",
            "8",
            "--seed",
            "9",
        ]);
        let config = BenchConfig::from(args);
        assert_eq!(config.shape, GemmShape::new(64, 32, 48));
        assert_eq!(config.tile, TileConfig::new(8));
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn exact_conflicts_with_tolerance() {
        let args = ["matmul-bench", "--exact", "--tolerance", "0.1"];
        assert!(Args::try_parse_from(args).is_err());
    }

    #[test]
    fn completed_run_succeeds() {
        let (code, printed) = status(Ok(Vec::new()));
        assert_eq!(code, success());
        assert!(printed.is_empty());
    }

    #[test]
    fn missing_hardware_is_reported_without_failing() {
        let outcomes = [
            BenchError::NoPlatform,
            BenchError::DeviceIndex {
                index: 2,
                available: 1,
            },
            BenchError::OpenClUnavailable,
        ];
        for err in outcomes {
            let message = err.to_string();
            let (code, printed) = status(Err(err));
            assert_eq!(code, success(), "{message}");
            assert_eq!(printed, format!("{message}\n"));
        }
    }

    #[test]
    fn build_failure_prints_log_and_fails() {
        let log = "kernel.cl:3:1: error: expected ';'";
        let err = BenchError::Build {
            device: "Test GPU".into(),
            log: log.into(),
        };
        let (code, printed) = status(Err(err));
        assert_eq!(code, failure());
        assert!(printed.contains(log), "{printed}");
    }

    #[test]
    fn operation_failure_propagates() {
        let err = BenchError::Transfer {
            direction: Transfer::DeviceToHost,
            bytes: 1024,
            message: "CL_OUT_OF_RESOURCES".into(),
        };
        let mut out = Vec::new();
        let err = exit_code(Err(err), &mut out).unwrap_err();
        assert!(err.to_string().contains("CL_OUT_OF_RESOURCES"));
        assert!(out.is_empty());
    }
}
