use cl_matmul_bench::{reference_multiply, GemmShape, KernelVariant, TileConfig, Workload};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn benchmark_host_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("host_matmul");
    let tile = TileConfig::new(16);

    for size in [64usize, 128] {
        let shape = GemmShape::square(size);
        let mut rng = StdRng::seed_from_u64(size as u64);
        let workload = Workload::generate(shape, &mut rng).unwrap();

        let id = BenchmarkId::new("reference", size);
        group.bench_with_input(id, &workload, |b, w| {
            b.iter(|| {
                let (a, rhs) = (black_box(&w.a), black_box(&w.b));
                reference_multiply(a, rhs).unwrap()
            })
        });

        for variant in KernelVariant::ALL {
            let id = BenchmarkId::new(variant.entry_point(), size);
            group.bench_with_input(id, &workload, |b, w| {
                b.iter(|| {
                    let (a, rhs) = (black_box(w.a.as_slice()), black_box(w.b.as_slice()));
                    variant.emulate(shape, tile, a, rhs)
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_host_paths);
criterion_main!(benches);
