use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use tcad_mesh::algs::reindex::reindex;
use tcad_mesh::topology::elements::{Triangle, decode_elements};

/// Structured grid of `n x n` vertices; returns the table and the triangles
/// of its upper half, as a region would reference a slice of the device.
fn grid(n: usize) -> (Vec<[f64; 2]>, Vec<Triangle>) {
    let mut table = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            table.push([i as f64, j as f64]);
        }
    }
    let mut tris = Vec::new();
    for j in n / 2..n - 1 {
        for i in 0..n - 1 {
            let v = j * n + i;
            tris.push([v, v + 1, v + n + 1]);
            tris.push([v, v + n + 1, v + n]);
        }
    }
    (table, tris)
}

fn bench_reindex(c: &mut Criterion) {
    let mut group = c.benchmark_group("reindex");

    for &n in &[100usize, 500usize] {
        let (table, tris) = grid(n);
        let raw: Vec<i64> = tris
            .iter()
            .flat_map(|t| [2, t[0] as i64, t[1] as i64, t[2] as i64])
            .collect();

        group.bench_with_input(BenchmarkId::new("reindex", n * n), &n, |b, _| {
            b.iter(|| {
                let mesh = reindex(&tris, &table).expect("in-range grid");
                black_box(mesh);
            });
        });

        group.bench_with_input(BenchmarkId::new("decode_and_reindex", n * n), &n, |b, _| {
            b.iter(|| {
                let decoded = decode_elements(&raw).expect("triangle records");
                let mesh = reindex(&decoded, &table).expect("in-range grid");
                black_box(mesh);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reindex);
criterion_main!(benches);
