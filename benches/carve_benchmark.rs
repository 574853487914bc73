use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use layercarve::carve::resolve_carving;
use layercarve::cutting::apply_cutting_meshes;
use layercarve::overlap::generate_bonding_overlap;
use layercarve::{
    BoundingBox, CarveConfig, LayerGeometry, Polygon, Solid, SolidSettings, SurfaceMode,
    process_multi_volumes,
};
use std::hint::black_box;

/// Generate a grid of overlapping square solids, `per_side` x `per_side`
fn generate_grid(per_side: usize, layers: usize) -> Vec<Solid> {
    let mut solids = Vec::with_capacity(per_side * per_side);
    for row in 0..per_side {
        for col in 0..per_side {
            // 10 mm squares on an 8 mm pitch overlap their neighbours by 2 mm
            let x0 = col as f64 * 8.0;
            let y0 = row as f64 * 8.0;
            let layer = LayerGeometry::from_polygons(vec![Polygon::rectangle(
                x0,
                y0,
                x0 + 10.0,
                y0 + 10.0,
            )]);
            solids.push(Solid::new(
                format!("solid-{row}-{col}"),
                SolidSettings::new().with_carve_order(((row + col) % 3) as i32),
                BoundingBox::from_corners((x0, y0, 0.0), (x0 + 10.0, y0 + 10.0, layers as f64 * 0.2)),
                vec![layer; layers],
            ));
        }
    }
    solids
}

/// Add a surface-only stencil crossing the whole grid diagonally
fn with_stencil(mut solids: Vec<Solid>, per_side: usize, layers: usize) -> Vec<Solid> {
    let extent = per_side as f64 * 8.0 + 2.0;
    let layer = LayerGeometry::from_polygons(vec![Polygon::rectangle(
        extent * 0.25,
        extent * 0.25,
        extent * 0.75,
        extent * 0.75,
    )]);
    solids.push(Solid::new(
        "stencil",
        SolidSettings::new()
            .as_cutting_stencil()
            .with_surface_mode(SurfaceMode::Surface),
        BoundingBox::from_corners((0.0, 0.0, 0.0), (extent, extent, layers as f64 * 0.2)),
        vec![layer; layers],
    ));
    solids
}

fn bench_carving(c: &mut Criterion) {
    let mut group = c.benchmark_group("carving");

    for &(per_side, layers) in &[(2, 50), (4, 50), (8, 20)] {
        let solids = generate_grid(per_side, layers);
        group.bench_with_input(
            BenchmarkId::new("grid", format!("{}x{}_{}l", per_side, per_side, layers)),
            &solids,
            |b, solids| {
                b.iter(|| {
                    let mut solids = solids.clone();
                    resolve_carving(&mut solids, true, true).unwrap();
                    black_box(solids)
                });
            },
        );
    }

    group.finish();
}

fn bench_bonding(c: &mut Criterion) {
    let mut group = c.benchmark_group("bonding");

    for &(per_side, layers) in &[(2, 50), (4, 50)] {
        let mut carved = generate_grid(per_side, layers);
        resolve_carving(&mut carved, true, true).unwrap();
        group.bench_with_input(
            BenchmarkId::new("grid", format!("{}x{}_{}l", per_side, per_side, layers)),
            &carved,
            |b, carved| {
                b.iter(|| {
                    let mut solids = carved.clone();
                    generate_bonding_overlap(&mut solids, 0.02, true).unwrap();
                    black_box(solids)
                });
            },
        );
    }

    group.finish();
}

fn bench_cutting(c: &mut Criterion) {
    let mut group = c.benchmark_group("cutting");

    for &(per_side, layers) in &[(2, 50), (4, 50)] {
        let solids = with_stencil(generate_grid(per_side, layers), per_side, layers);
        group.bench_with_input(
            BenchmarkId::new("surface_stencil", format!("{}x{}_{}l", per_side, per_side, layers)),
            &solids,
            |b, solids| {
                b.iter(|| {
                    let mut solids = solids.clone();
                    apply_cutting_meshes(&mut solids, true).unwrap();
                    black_box(solids)
                });
            },
        );
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10); // Reduce sample size for the larger grids

    let per_side = 6;
    let layers = 100;
    let solids = with_stencil(generate_grid(per_side, layers), per_side, layers);
    for parallel in [false, true] {
        let config = CarveConfig::new().with_parallel(parallel);
        group.bench_with_input(
            BenchmarkId::new("parallel", parallel),
            &solids,
            |b, solids| {
                b.iter(|| {
                    let mut solids = solids.clone();
                    process_multi_volumes(&mut solids, &config).unwrap();
                    black_box(solids)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_carving,
    bench_bonding,
    bench_cutting,
    bench_pipeline
);
criterion_main!(benches);
