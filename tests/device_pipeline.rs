//! End-to-end runs on a real OpenCL device.
//!
//! Every test skips when the machine exposes no platform or device.

use cl_matmul_bench::{
    run_benchmark, BenchConfig, BenchError, Benchmark, Comparison, DeviceExecutor, GemmShape,
    KernelSource, KernelVariant, TargetDevice, TileConfig, Validation, Workload,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn target() -> Option<TargetDevice> {
    match TargetDevice::resolve(0, 0) {
        Ok(target) => Some(target),
        Err(e) if e.is_environment() => {
            eprintln!("skipping: {e}");
            None
        }
        Err(e) => panic!("device discovery failed: {e}"),
    }
}

fn config(shape: GemmShape, block: usize) -> BenchConfig {
    BenchConfig {
        shape,
        tile: TileConfig::new(block),
        seed: Some(17),
        ..BenchConfig::default()
    }
}

fn workload(config: &BenchConfig, seed: u64) -> Workload {
    let mut rng = StdRng::seed_from_u64(seed);
    Workload::generate(config.shape, &mut rng).unwrap()
}

fn run_variant(target: &TargetDevice, config: &BenchConfig, variant: KernelVariant) -> Validation {
    let workload = workload(config, 17);
    let mut bench = Benchmark::prepare(config, target, workload).unwrap();
    let report = bench.run(variant).unwrap();
    assert_eq!(report.name, variant.entry_point());
    assert_eq!(report.samples.len(), config.iterations);
    report.validation
}

#[test]
fn tiled_kernel_matches_reference() {
    let Some(target) = target() else { return };
    let config = config(GemmShape::square(32), 16);
    let validation = run_variant(&target, &config, KernelVariant::Tiled);
    assert!(validation.is_correct());
}

#[test]
fn naive_kernel_matches_reference() {
    let Some(target) = target() else { return };
    let config = config(GemmShape::square(32), 16);
    let validation = run_variant(&target, &config, KernelVariant::Naive);
    assert!(validation.is_correct());
}

#[test]
fn tiled_kernel_handles_ragged_shape() {
    let Some(target) = target() else { return };
    let config = config(GemmShape::new(37, 23, 29), 8);
    let validation = run_variant(&target, &config, KernelVariant::Tiled);
    assert!(validation.is_correct());
}

#[test]
fn both_kernels_share_one_result_buffer() {
    let Some(target) = target() else { return };
    let config = BenchConfig {
        iterations: 2,
        warmup: 1,
        ..config(GemmShape::square(48), 16)
    };
    let workload = workload(&config, 5);
    let mut bench = Benchmark::prepare(&config, &target, workload).unwrap();
    for variant in KernelVariant::ALL {
        let report = bench.run(variant).unwrap();
        let validation = &report.validation;
        assert!(validation.is_correct(), "{variant}: {validation:?}");
        assert_eq!(report.samples.len(), 2);
    }
}

#[test]
fn full_run_writes_report() {
    let Some(_) = target() else { return };
    let config = BenchConfig {
        comparison: Comparison::default(),
        ..config(GemmShape::square(64), 16)
    };
    let mut out = Vec::new();
    let mut rng = StdRng::seed_from_u64(1);
    let reports = run_benchmark(&config, &mut rng, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(reports.len(), 2);
    assert!(text.starts_with("Information about devices:\n"));
    assert!(text.contains("Using device: "));
    for name in ["optimization_1_multiplication", "simple_multiplication"] {
        let verdict = format!("Calculation in {name} is correct.");
        assert!(text.contains(&verdict), "{text}");
    }
}

#[test]
fn syntax_error_surfaces_build_log() {
    let Some(target) = target() else { return };
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kernel.cl");
    let broken = "__kernel void simple_multiplication(__global float* a) { a[0] = 1.0f }\n";
    std::fs::write(&path, broken).unwrap();

    let source = KernelSource::load(&path).unwrap();
    let (shape, tile) = (GemmShape::square(16), TileConfig::new(16));
    let err = DeviceExecutor::new(&target, &source, shape, tile)
        .err()
        .expect("broken source must not build");
    match err {
        BenchError::Build { ref log, .. } => assert!(!log.trim().is_empty()),
        other => panic!("expected build error, got {other}"),
    }
}

#[test]
fn oversized_work_group_is_rejected() {
    let Some(target) = target() else { return };
    let block = (target.report.max_work_group_size as f64).sqrt() as usize + 1;
    let config = config(GemmShape::square(block), block);
    let workload = workload(&config, 3);
    let mut bench = match Benchmark::prepare(&config, &target, workload) {
        Ok(bench) => bench,
        // Some compilers already refuse the oversized local arrays.
        Err(BenchError::Build { .. }) => return,
        Err(e) => panic!("{e}"),
    };
    let err = bench.run(KernelVariant::Tiled).unwrap_err();
    assert!(matches!(err, BenchError::WorkGroupLimit { .. }), "{err}");
}
