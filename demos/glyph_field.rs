#![allow(clippy::cast_precision_loss)]
//! Exports a sheet of fibre glyphs that rotate over time.
//!
//! Each glyph is an arrow whose axis follows the local fibre direction and
//! whose colour shows the fibre angle. Every glyph carries a text label.
//!
//! Run with: cargo run --example `glyph_field` -- [output dir] [options.json]

use std::f32::consts::FRAC_PI_2;

use scenebundle::*;

const GRID: usize = 8;

fn fibre(angle: f32) -> Vec3 {
    Vec3::new(angle.cos(), angle.sin(), 0.0)
}

fn build_scene() -> Result<Scene> {
    let mut points = Vec::with_capacity(GRID * GRID);
    let mut labels = Vec::with_capacity(GRID * GRID);
    let mut start_angles = Vec::with_capacity(GRID * GRID);
    for i in 0..GRID {
        for j in 0..GRID {
            points.push(Vec3::new(i as f32, j as f32, 0.0));
            labels.push(format!("f{i}_{j}"));
            // Fibre angle sweeps across the sheet
            start_angles.push(FRAC_PI_2 * j as f32 / (GRID - 1) as f32);
        }
    }

    let mut orientation: TimeSeries<Vec3> = TimeSeries::empty();
    let mut angles: TimeSeries<f32> = TimeSeries::empty();
    for (time, twist) in [(0.0, 0.0), (1.0, FRAC_PI_2)] {
        let current: Vec<f32> = start_angles.iter().map(|a| a + twist).collect();
        orientation.push_keyframe(time, current.iter().map(|a| fibre(*a) * 0.8).collect())?;
        angles.push_keyframe(time, current)?;
    }

    let settings = GlyphSettings {
        base_size: Vec3::new(0.0, 0.1, 0.1),
        scale_factors: Vec3::new(1.0, 0.0, 0.0),
        orientation: Some(orientation),
        ..GlyphSettings::new(GlyphShape::Arrow)
    };

    let mut scene = Scene::new("fibres");
    scene
        .spectra_mut()
        .register(Spectrum::rainbow("angle", 0.0, 2.0 * FRAC_PI_2))?;
    scene.add_graphic(
        Graphic::glyphs("fibres", TimeSeries::constant(points), settings)
            .with_data(angles, "angle")
            .with_labels(labels),
    )?;
    Ok(scene)
}

fn main() -> Result<()> {
    init_logging();

    let mut args = std::env::args().skip(1);
    let dir = args.next().unwrap_or_else(|| "html".to_string());
    let options = match args.next() {
        Some(path) => ExportOptions::from_json_file(path)?,
        None => ExportOptions::with_prefix("fibres")
            .with_time_range(11, 0.0, 1.0)
            .with_time_dependence(true, true),
    };

    let scene = build_scene()?;
    let mut view = ViewState::default();
    let bundle = export_scene_to_dir(&scene, &mut view, &options, &dir)?;

    for name in bundle.names() {
        println!("{dir}/{name}");
    }
    Ok(())
}
