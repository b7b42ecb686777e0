use criterion::{criterion_group, criterion_main, Criterion};
use probsat::*;

pub fn planted(c: &mut Criterion) {
    let formula = Formula::parse_file("inputs/planted-100.cnf").unwrap();
    let config = SolverConfig {
        max_tries: 10,
        max_flips: 2_000,
        ..SolverConfig::default()
    };

    let mut seed = 0;
    c.bench_function("planted-100 incremental", |b| {
        b.iter(|| {
            seed += 1;
            solve_seeded(&formula, config, Strategy::Incremental, seed)
        })
    });

    let mut seed = 0;
    c.bench_function("planted-100 recompute", |b| {
        b.iter(|| {
            seed += 1;
            solve_seeded(&formula, config, Strategy::Recompute, seed)
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = planted
}
criterion_main!(benches);
