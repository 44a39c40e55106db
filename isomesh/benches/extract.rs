use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion,
};
use isomesh::{
    color::TransferFunction,
    mesh::{NormalMode, Settings},
    StructuredGrid,
};

fn gyroid(n: usize) -> StructuredGrid {
    let k = 0.35;
    let mut values = Vec::with_capacity(n * n * n);
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                let (x, y, z) = (x as f32 * k, y as f32 * k, z as f32 * k);
                values.push(
                    x.sin() * y.cos() + y.sin() * z.cos() + z.sin() * x.cos(),
                );
            }
        }
    }
    StructuredGrid::scalar([n, n, n], values).unwrap()
}

pub fn gyroid_modes(c: &mut Criterion) {
    let grid = &gyroid(64);
    let tf = &TransferFunction::default();

    let mut group = c.benchmark_group("speed vs mode (gyroid, 64³)");
    for (name, duplicate, normals) in [
        ("duplicate", true, NormalMode::PerFace),
        ("welded-per-face", false, NormalMode::PerFace),
        ("welded-per-vertex", false, NormalMode::PerVertex),
    ] {
        let settings = &Settings {
            isolevel: 0.0,
            duplicate,
            normals,
        };
        group.bench_function(BenchmarkId::new("extract", name), move |b| {
            b.iter(|| black_box(isomesh::extract(grid, settings, tf)))
        });
    }
}

pub fn gyroid_size_sweep(c: &mut Criterion) {
    let tf = &TransferFunction::default();
    let settings = &Settings::default();

    let mut group = c.benchmark_group("speed vs size (gyroid, welded)");
    for n in [16, 32, 64, 128] {
        let grid = &gyroid(n);
        group.bench_function(BenchmarkId::new("extract", n), move |b| {
            b.iter(|| black_box(isomesh::extract(grid, settings, tf)))
        });
    }
}

criterion_group!(benches, gyroid_modes, gyroid_size_sweep);
criterion_main!(benches);
