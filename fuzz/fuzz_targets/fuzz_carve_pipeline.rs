#![no_main]

use libfuzzer_sys::arbitrary::{Arbitrary, Result, Unstructured};
use libfuzzer_sys::fuzz_target;

#[derive(Debug)]
struct FuzzSolid {
    carve_order: i32,
    role: u8,
    surface_mode: u8,
    bonding_overlap: f64,
    // One outline per layer, as raw (x, y) pairs
    outlines: Vec<Vec<(f64, f64)>>,
}

#[derive(Debug)]
struct FuzzScene {
    alternate: bool,
    solids: Vec<FuzzSolid>,
}

impl<'a> Arbitrary<'a> for FuzzScene {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let layers = u.int_in_range(1..=4)?;
        let solid_count = u.int_in_range(0..=5)?;
        let mut solids = Vec::with_capacity(solid_count);
        for _ in 0..solid_count {
            let mut outlines = Vec::with_capacity(layers);
            for _ in 0..layers {
                let point_count = u.int_in_range(0..=8)?;
                let mut points = Vec::with_capacity(point_count);
                for _ in 0..point_count {
                    // Keep coordinates on a bounded grid so the clipper scale cannot overflow
                    let x = u.int_in_range(-500..=500)? as f64 / 10.0;
                    let y = u.int_in_range(-500..=500)? as f64 / 10.0;
                    points.push((x, y));
                }
                outlines.push(points);
            }
            solids.push(FuzzSolid {
                carve_order: u.int_in_range(-2..=2)?,
                role: u.int_in_range(0..=5)?,
                surface_mode: u.int_in_range(0..=2)?,
                bonding_overlap: u.int_in_range(0..=5)? as f64 / 10.0,
                outlines,
            });
        }
        Ok(FuzzScene {
            alternate: u.arbitrary()?,
            solids,
        })
    }
}

fuzz_target!(|scene: FuzzScene| {
    use layercarve::{
        CarveConfig, LayerGeometry, Polygon, Solid, SolidSettings, SurfaceMode, Vertex2D,
    };

    let solids: Vec<Solid> = scene
        .solids
        .iter()
        .enumerate()
        .map(|(index, fuzz)| {
            let mut settings = SolidSettings::new()
                .with_carve_order(fuzz.carve_order)
                .with_bonding_overlap(fuzz.bonding_overlap)
                .with_surface_mode(match fuzz.surface_mode {
                    0 => SurfaceMode::Area,
                    1 => SurfaceMode::SurfaceAndInterior,
                    _ => SurfaceMode::Surface,
                });
            settings = match fuzz.role {
                1 => settings.as_cutting_stencil(),
                2 => settings.as_support(),
                3 => settings.as_anti_overhang(),
                4 => settings.as_infill_only(),
                _ => settings,
            };
            let layers: Vec<LayerGeometry> = fuzz
                .outlines
                .iter()
                .map(|points| {
                    let vertices: Vec<Vertex2D> = points.iter().copied().map(Vertex2D::from).collect();
                    if vertices.len() >= 3 {
                        LayerGeometry::from_polygons(vec![Polygon::new(vertices)])
                    } else {
                        LayerGeometry::default()
                    }
                })
                .collect();
            Solid::from_layers(format!("solid-{index}"), settings, layers, 0.0, 0.2)
        })
        .collect();

    let config = CarveConfig::new().with_alternate_carve_order(scene.alternate);

    // Valid input must always process, with the same result on any thread count
    let mut carved = solids.clone();
    layercarve::process_multi_volumes(&mut carved, &config)
        .expect("valid scene must process without error");

    let mut sequential = solids;
    layercarve::process_multi_volumes(&mut sequential, &config.clone().with_parallel(false))
        .expect("valid scene must process without error");
    for (a, b) in carved.iter().zip(&sequential) {
        assert_eq!(a.layers, b.layers, "parallel and sequential runs differ");
    }
});
