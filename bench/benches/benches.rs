use criterion::{Criterion, criterion_group, criterion_main};
use terrain_noise::{
    FillMode, GradientNoise, NoiseGenerator, SimplexNoise, SubdivisionMode, SubdivisionNoise,
    utils::{normalize, to_terrain_rgb},
};

const RES: usize = 128;
const SEED: u64 = 2025;

fn bench_gradient(c: &mut Criterion) {
    // 25×25 lattice cells at K = 10 gives a 250×250 map
    let perlin = GradientNoise::with_seed(SEED, 25, 25).unwrap();
    c.bench_function("GradientNoise 250x250", |b| b.iter(|| perlin.generate_map()));
}

fn bench_gradient_pipeline(c: &mut Criterion) {
    let perlin = GradientNoise::with_seed(SEED, 25, 25).unwrap();
    c.bench_function("GradientNoise + normalize + terrain rgb", |b| {
        b.iter(|| {
            let mut map = perlin.generate_map();
            normalize(&mut map);
            let _img = to_terrain_rgb(&map);
        })
    });
}

fn bench_simplex(c: &mut Criterion) {
    let simplex = SimplexNoise::with_seed(SEED, RES, RES).unwrap();
    c.bench_function("SimplexNoise 128x128, 10 octaves", |b| {
        b.iter(|| simplex.generate_map())
    });
}

fn bench_simplex_single_octave(c: &mut Criterion) {
    let simplex = SimplexNoise::with_seed(SEED, RES, RES)
        .unwrap()
        .octaves(1)
        .unwrap();
    c.bench_function("SimplexNoise 128x128, 1 octave", |b| {
        b.iter(|| simplex.generate_map())
    });
}

fn bench_polynomial(c: &mut Criterion) {
    let flat = SubdivisionNoise::with_seed(SEED, 513, 513).unwrap();
    c.bench_function("SubdivisionNoise flat 513x513", |b| {
        b.iter(|| flat.generate_map())
    });

    let recursive = SubdivisionNoise::with_seed(SEED, 513, 513)
        .unwrap()
        .mode(SubdivisionMode::Recursive)
        .fill(FillMode::Mask);
    c.bench_function("SubdivisionNoise recursive 513x513", |b| {
        b.iter(|| recursive.generate_map())
    });
}

criterion_group!(
    terrain_benchmarks,
    bench_gradient,
    bench_gradient_pipeline,
    bench_simplex,
    bench_simplex_single_octave,
    bench_polynomial
);
criterion_main!(terrain_benchmarks);
