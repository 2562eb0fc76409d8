use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use spatial_dilemma::{Field, Schedule, step};

fn bench_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_step");
    // Square field sides, overridable as SD_BENCH_SIDES=64,256
    let sides: Vec<usize> = std::env::var("SD_BENCH_SIDES")
        .ok()
        .map(|s| {
            s.split(',')
                .filter_map(|t| t.trim().parse::<usize>().ok())
                .filter(|v| *v > 0)
                .collect::<Vec<_>>()
        })
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| vec![100, 400]);

    for &side in &sides {
        let start = Field::random(side, side, 0.1, &mut StdRng::seed_from_u64(0xBEEF))
            .expect("bench field dimensions are positive");
        for schedule in [Schedule::Sequential, Schedule::Parallel] {
            group.bench_function(format!("{side}x{side}_{schedule:?}"), |b| {
                b.iter_batched(
                    || start.clone(),
                    |mut field| {
                        step(&mut field, 1.65, schedule);
                        field
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_steps);
criterion_main!(benches);
