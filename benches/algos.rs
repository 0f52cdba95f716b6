use criterion::{criterion_group, criterion_main, Criterion};
use gfopt::{
    algo::{AnnealedHillClimber, Cuckoo, HillClimber, OnePlusOneEs},
    nalgebra as na,
    testing::*,
    Domain, Function, Optimizer,
};
use rand::{rngs::StdRng, SeedableRng};

const MAX_ITERS: usize = 1_000_000;
const TOLERANCE: f64 = 1e-6;

fn optimize<F, O>(
    f: &F,
    dom: &Domain<F::Field>,
    mut optimizer: O,
    mut x: na::OVector<F::Field, na::Dyn>,
) -> bool
where
    F: Function<Field = f64>,
    O: Optimizer<F>,
{
    let mut iter = 0;
    loop {
        let fx = match optimizer.opt_next(f, dom, &mut x) {
            Ok(fx) => fx,
            Err(_) => return false,
        };

        if fx < TOLERANCE {
            return true;
        }

        if iter == MAX_ITERS {
            return false;
        } else {
            iter += 1;
        }
    }
}

fn sphere(c: &mut Criterion) {
    let f = Sphere::new(4);
    let dom = f.domain();
    let x = &f.initials()[0];

    c.bench_function("(1+1)-ES sphere", |b| {
        b.iter(|| {
            let rng = StdRng::seed_from_u64(42);
            assert!(optimize(
                &f,
                &dom,
                OnePlusOneEs::with_rng(&f, &dom, rng),
                x.clone_owned()
            ))
        })
    });

    c.bench_function("hill climber sphere", |b| {
        b.iter(|| {
            let rng = StdRng::seed_from_u64(42);
            assert!(optimize(
                &f,
                &dom,
                HillClimber::with_rng(&f, &dom, rng),
                x.clone_owned()
            ))
        })
    });

    c.bench_function("annealed hill climber sphere", |b| {
        b.iter(|| {
            let rng = StdRng::seed_from_u64(42);
            assert!(optimize(
                &f,
                &dom,
                AnnealedHillClimber::with_rng(&f, &dom, rng),
                x.clone_owned()
            ))
        })
    });
}

fn rosenbrock(c: &mut Criterion) {
    let f = ExtendedRosenbrock::new(2);
    let dom = f.domain();
    let x = &f.initials()[0];

    c.bench_function("(1+1)-ES rosenbrock", |b| {
        b.iter(|| {
            let rng = StdRng::seed_from_u64(42);
            assert!(optimize(
                &f,
                &dom,
                OnePlusOneEs::with_rng(&f, &dom, rng),
                x.clone_owned()
            ))
        })
    });

    c.bench_function("cuckoo rosenbrock", |b| {
        b.iter(|| {
            let rng = StdRng::seed_from_u64(42);
            assert!(optimize(
                &f,
                &dom,
                Cuckoo::with_rng(&f, &dom, rng),
                x.clone_owned()
            ))
        })
    });
}

fn rastrigin(c: &mut Criterion) {
    let f = Rastrigin::new(2);
    let dom = f.domain();
    let x = &f.initials()[0];

    c.bench_function("(1+1)-ES rastrigin", |b| {
        b.iter(|| {
            let rng = StdRng::seed_from_u64(42);
            assert!(optimize(
                &f,
                &dom,
                OnePlusOneEs::with_rng(&f, &dom, rng),
                x.clone_owned()
            ))
        })
    });

    c.bench_function("cuckoo rastrigin", |b| {
        b.iter(|| {
            let rng = StdRng::seed_from_u64(42);
            assert!(optimize(
                &f,
                &dom,
                Cuckoo::with_rng(&f, &dom, rng),
                x.clone_owned()
            ))
        })
    });
}

criterion_group!(algos, sphere, rosenbrock, rastrigin);
criterion_main!(algos);
