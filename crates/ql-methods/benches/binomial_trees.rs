use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ql_core::Real;
use ql_methods::lattice::{BinomialLattice, BinomialScheme};
use ql_processes::BlackScholesProcess;
use std::hint::black_box;

const STRIKE: Real = 100.0;
const RATE: Real = 0.05;

fn american_put(lattice: &dyn BinomialLattice) -> Real {
    let n = lattice.steps();
    let dt = lattice.dt();
    let discount = (-RATE * dt).exp();
    let payoff = |s: Real| (STRIKE - s).max(0.0);
    let mut values: Vec<Real> = (0..lattice.size(n))
        .map(|j| payoff(lattice.underlying(n, j)))
        .collect();
    for i in (0..n).rev() {
        for j in 0..lattice.size(i) {
            let down = lattice.probability(i, j, 0).expect("valid probability");
            let up = lattice.probability(i, j, 1).expect("valid probability");
            let continuation = discount
                * (down * values[lattice.descendant(i, j, 0)]
                    + up * values[lattice.descendant(i, j, 1)]);
            values[j] = continuation.max(payoff(lattice.underlying(i, j)));
        }
    }
    values[0]
}

fn bench_construction(c: &mut Criterion) {
    let process = BlackScholesProcess::flat(100.0, RATE, 0.0, 0.20).expect("valid process");
    let mut group = c.benchmark_group("lattice_construction");
    for scheme in BinomialScheme::ALL {
        group.bench_function(scheme.name(), |b| {
            b.iter(|| {
                let lattice = scheme
                    .build(black_box(&process), 1.0, black_box(500), STRIKE)
                    .expect("lattice should build");
                black_box(lattice.steps())
            })
        });
    }
    group.finish();
}

fn bench_american_put(c: &mut Criterion) {
    let process = BlackScholesProcess::flat(100.0, RATE, 0.0, 0.20).expect("valid process");
    for scheme in BinomialScheme::ALL {
        let mut group = c.benchmark_group(format!("american_put/{scheme}"));
        for steps in [100_usize, 500, 1000] {
            let lattice = scheme
                .build(&process, 1.0, steps, STRIKE)
                .expect("lattice should build");
            group.bench_with_input(BenchmarkId::from_parameter(steps), &steps, |b, _| {
                b.iter(|| black_box(american_put(black_box(lattice.as_ref()))))
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_construction, bench_american_put);
criterion_main!(benches);
