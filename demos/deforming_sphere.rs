#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
//! Exports a pulsating sphere coloured by surface strain.
//!
//! The sphere is keyframed at eleven instants over one beat and exported at
//! 51 time steps with morphed vertices and colours. Stretching is shown in
//! red, compression in blue, both on a log scale.
//!
//! Run with: cargo run --example `deforming_sphere` -- [output dir] [options.json]

use std::f32::consts::PI;

use scenebundle::*;

const KEYFRAMES: usize = 10;

/// Generates a UV sphere of unit radius.
fn generate_sphere(n_lat: usize, n_lon: usize) -> (Vec<Vec3>, Vec<[u32; 3]>) {
    let mut points = Vec::with_capacity((n_lat + 1) * n_lon);
    for i in 0..=n_lat {
        let theta = PI * i as f32 / n_lat as f32;
        for j in 0..n_lon {
            let phi = 2.0 * PI * j as f32 / n_lon as f32;
            points.push(Vec3::new(
                theta.sin() * phi.cos(),
                theta.sin() * phi.sin(),
                theta.cos(),
            ));
        }
    }

    let mut triangles = Vec::with_capacity(2 * n_lat * n_lon);
    for i in 0..n_lat {
        for j in 0..n_lon {
            let a = (i * n_lon + j) as u32;
            let b = (i * n_lon + (j + 1) % n_lon) as u32;
            let c = ((i + 1) * n_lon + j) as u32;
            let d = ((i + 1) * n_lon + (j + 1) % n_lon) as u32;
            triangles.push([a, c, b]);
            triangles.push([b, c, d]);
        }
    }
    (points, triangles)
}

/// Radial stretch of a unit-sphere point at phase `t` of the beat.
fn strain(point: Vec3, t: f32) -> f32 {
    0.25 * (2.0 * PI * t).sin() * (2.0 * point.z * point.z - 1.0)
}

fn strain_spectrum() -> Spectrum {
    Spectrum::new("strain")
        .with_component(
            SpectrumComponent::new(0.0, 0.25, ColourMapping::WhiteToRed)
                .with_extend(false, true)
                .with_log_scale(10.0),
        )
        .with_component(
            SpectrumComponent::new(-0.25, 0.0, ColourMapping::WhiteToBlue)
                .with_extend(true, false)
                .with_log_scale(10.0)
                .reversed(),
        )
}

fn build_scene() -> Result<Scene> {
    let (rest, triangles) = generate_sphere(24, 48);
    let mut coordinates: TimeSeries<Vec3> = TimeSeries::empty();
    let mut values: TimeSeries<f32> = TimeSeries::empty();
    for k in 0..=KEYFRAMES {
        let t = k as f32 / KEYFRAMES as f32;
        let strains: Vec<f32> = rest.iter().map(|p| strain(*p, t)).collect();
        let points: Vec<Vec3> = rest
            .iter()
            .zip(&strains)
            .map(|(p, s)| *p * (1.0 + s))
            .collect();
        coordinates.push_keyframe(f64::from(t), points)?;
        values.push_keyframe(f64::from(t), strains)?;
    }

    let mut scene = Scene::new("sphere");
    scene.spectra_mut().register(strain_spectrum())?;
    scene.add_graphic(
        Graphic::surfaces("wall", coordinates, triangles)
            .with_material("muscle")
            .with_data(values, "strain"),
    )?;

    // A fixed ring marking the equator at rest
    let ring: Vec<Vec3> = (0..48)
        .map(|j| {
            let phi = 2.0 * PI * j as f32 / 48.0;
            Vec3::new(phi.cos(), phi.sin(), 0.0) * 1.3
        })
        .collect();
    let segments = (0..48u32).map(|j| [j, (j + 1) % 48]).collect();
    scene.add_graphic(
        Graphic::lines("equator", TimeSeries::constant(ring), segments).with_material("gold"),
    )?;
    Ok(scene)
}

fn main() -> Result<()> {
    init_logging();

    let mut args = std::env::args().skip(1);
    let dir = args.next().unwrap_or_else(|| "html".to_string());
    let options = match args.next() {
        Some(path) => ExportOptions::from_json_file(path)?,
        None => ExportOptions::with_prefix("sphere")
            .with_time_range(51, 0.0, 1.0)
            .with_time_dependence(true, true),
    };

    let scene = build_scene()?;
    let mut view = ViewState::look_at(Vec3::new(0.0, -5.0, 2.0), Vec3::ZERO, Vec3::Z);
    let bundle = export_scene_to_dir(&scene, &mut view, &options, &dir)?;

    for name in bundle.names() {
        println!("{dir}/{name}");
    }
    Ok(())
}
