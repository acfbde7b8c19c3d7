//! Integration tests for scene export.
//!
//! Each test builds a scene, exports it into a temporary directory, and
//! inspects the files on disk.

use std::fs;
use std::path::Path;

use proptest::prelude::*;
use scenebundle::*;
use serde_json::Value;

fn triangle_at(offset: Vec3) -> TimeSeries<Vec3> {
    TimeSeries::constant(vec![offset, offset + Vec3::X, offset + Vec3::Y])
}

/// A scene with a surface, a line and a point graphic.
fn three_graphic_scene() -> Scene {
    let mut scene = Scene::new("test");
    scene
        .add_graphic(Graphic::surfaces("surface", triangle_at(Vec3::ZERO), vec![[0, 1, 2]]))
        .unwrap();
    scene
        .add_graphic(
            Graphic::lines("lines", triangle_at(Vec3::Z), vec![[0, 1], [1, 2], [2, 0]])
                .with_material("red"),
        )
        .unwrap();
    scene
        .add_graphic(Graphic::points("points", triangle_at(Vec3::ONE)).with_material("blue"))
        .unwrap();
    scene
}

fn read_json(path: &Path) -> Value {
    let text = fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_three_graphics_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let options = ExportOptions::with_prefix("Test");
    let mut view = ViewState::default();
    let bundle = export_scene_to_dir(&three_graphic_scene(), &mut view, &options, dir.path()).unwrap();

    assert_eq!(bundle.payloads.len(), 3);
    assert_eq!(
        file_names(dir.path()),
        vec![
            "Test_1.json",
            "Test_2.json",
            "Test_3.json",
            "Test_metadata.json",
            "Test_view.json"
        ]
    );

    let text = fs::read_to_string(dir.path().join("Test_metadata.json")).unwrap();
    assert!(!text.contains("memory_resource_"));
    let metadata: Value = serde_json::from_str(&text).unwrap();
    let urls: Vec<&str> = metadata["Objects"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["URL"].as_str().unwrap())
        .collect();
    assert_eq!(urls, vec!["Test_1.json", "Test_2.json", "Test_3.json"]);

    // Insertion order determines numbering
    assert_eq!(metadata["Objects"][0]["GroupName"], "surface");
    assert_eq!(metadata["Objects"][1]["Type"], "Lines");
    assert_eq!(metadata["Objects"][2]["Type"], "Points");

    let lines = read_json(&dir.path().join("Test_2.json"));
    assert_eq!(lines["lines"], serde_json::json!([0, 1, 1, 2, 2, 0]));
    assert_eq!(lines["materials"][0]["colorDiffuse"], serde_json::json!([1.0, 0.0, 0.0]));
}

#[test]
fn test_empty_scene_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let options = ExportOptions::with_prefix("Test");
    let mut view = ViewState::default();
    let bundle = export_scene_to_dir(&Scene::new("empty"), &mut view, &options, dir.path()).unwrap();

    assert!(bundle.payloads.is_empty());
    assert_eq!(
        file_names(dir.path()),
        vec!["Test_metadata.json", "Test_view.json"]
    );
    let metadata = read_json(&dir.path().join("Test_metadata.json"));
    assert_eq!(metadata["Objects"], serde_json::json!([]));

    // Nothing to frame; the camera is untouched
    assert_eq!(view, ViewState::default());
}

#[test]
fn test_view_file() {
    let dir = tempfile::tempdir().unwrap();
    let options = ExportOptions::with_prefix("Test");
    let mut view = ViewState::look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
    export_scene_to_dir(&three_graphic_scene(), &mut view, &options, dir.path()).unwrap();

    let json = read_json(&dir.path().join("Test_view.json"));
    for key in ["farPlane", "nearPlane", "eyePosition", "targetPosition", "upVector"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["upVector"], serde_json::json!([0.0, 1.0, 0.0]));
    // The captured camera reflects the framing done during export
    let target: Vec<f64> = json["targetPosition"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    assert_eq!(target, vec![1.0, 1.0, 0.5]);
}

#[test]
fn test_time_steps_declared() {
    let mut scene = Scene::new("anim");
    let coordinates = TimeSeries::empty()
        .with_keyframe(0.0, vec![Vec3::ZERO, Vec3::X, Vec3::Y])
        .unwrap()
        .with_keyframe(1.0, vec![Vec3::ZERO, Vec3::X * 2.0, Vec3::Y])
        .unwrap();
    scene
        .add_graphic(Graphic::surfaces("s", coordinates, vec![[0, 1, 2]]))
        .unwrap();
    let options = ExportOptions::with_prefix("anim")
        .with_time_range(51, 0.0, 1.0)
        .with_time_dependence(true, true);
    let bundle = export_scene(&scene, &mut ViewState::default(), &options).unwrap();

    let metadata = bundle.metadata.json().unwrap();
    assert_eq!(metadata["TimeSteps"]["NumberOfTimeSteps"], 51);
    assert_eq!(metadata["TimeSteps"]["InitialTime"], 0.0);
    assert_eq!(metadata["TimeSteps"]["FinishTime"], 1.0);

    let payload = bundle.payloads[0].json().unwrap();
    let targets = payload["morphTargets"].as_array().unwrap();
    assert_eq!(targets.len(), 51);
    assert_eq!(targets[0]["vertices"][3], 1.0);
    assert_eq!(targets[50]["vertices"][3], 2.0);
}

#[test]
fn test_export_is_idempotent() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let scene = three_graphic_scene();
    let options = ExportOptions::with_prefix("Test").with_time_range(5, 0.0, 1.0);

    export_scene_to_dir(&scene, &mut ViewState::default(), &options, first.path()).unwrap();
    export_scene_to_dir(&scene, &mut ViewState::default(), &options, second.path()).unwrap();
    // Exporting again over the first bundle leaves it unchanged
    export_scene_to_dir(&scene, &mut ViewState::default(), &options, first.path()).unwrap();

    let names = file_names(first.path());
    assert_eq!(names, file_names(second.path()));
    for name in names {
        assert_eq!(
            fs::read(first.path().join(&name)).unwrap(),
            fs::read(second.path().join(&name)).unwrap(),
            "{name} differs"
        );
    }
}

#[test]
fn test_export_with_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("export.json");
    fs::write(
        &config,
        r#"{"prefix": "configured", "number_of_time_steps": 3, "finish_time": 2.0}"#,
    )
    .unwrap();
    let out = dir.path().join("html");
    let bundle = export_with_config(
        &three_graphic_scene(),
        &mut ViewState::default(),
        &config,
        &out,
    )
    .unwrap();
    assert_eq!(bundle.metadata.name, "configured_metadata.json");
    let metadata = read_json(&out.join("configured_metadata.json"));
    assert_eq!(metadata["TimeSteps"]["FinishTime"], 2.0);
}

#[test]
fn test_data_coloured_export() {
    let mut scene = Scene::new("strain");
    scene
        .spectra_mut()
        .register(Spectrum::rainbow("rainbow", 0.0, 1.0))
        .unwrap();
    scene
        .add_graphic(
            Graphic::points("p", triangle_at(Vec3::ZERO))
                .with_data(TimeSeries::constant(vec![0.0, 0.5, 1.0]), "rainbow"),
        )
        .unwrap();
    let bundle = export_scene(
        &scene,
        &mut ViewState::default(),
        &ExportOptions::with_prefix("strain"),
    )
    .unwrap();
    let payload = bundle.payloads[0].json().unwrap();
    assert_eq!(
        payload["colors"],
        serde_json::json!([0x0000ff, 0x80ff80, 0xff0000])
    );
}

/// Keyframed coordinates and strain data over `[0, 1]`.
fn deforming_scene() -> Scene {
    let mut scene = Scene::new("beating");
    scene
        .spectra_mut()
        .register(Spectrum::rainbow("rainbow", 0.0, 1.0))
        .unwrap();
    let coordinates = TimeSeries::empty()
        .with_keyframe(0.0, vec![Vec3::ZERO, Vec3::X, Vec3::Y])
        .unwrap()
        .with_keyframe(0.5, vec![Vec3::ZERO, Vec3::X * 1.5, Vec3::Y * 0.5])
        .unwrap()
        .with_keyframe(1.0, vec![Vec3::ZERO, Vec3::X * 2.0, Vec3::Y])
        .unwrap();
    let strain = TimeSeries::empty()
        .with_keyframe(0.0, vec![0.0, 0.0, 0.0])
        .unwrap()
        .with_keyframe(1.0, vec![0.2, 0.6, 1.0])
        .unwrap();
    scene
        .add_graphic(
            Graphic::surfaces("wall", coordinates, vec![[0, 1, 2]]).with_data(strain, "rainbow"),
        )
        .unwrap();
    scene
}

#[test]
fn test_morphing_export_is_idempotent() {
    let scene = deforming_scene();
    let options = ExportOptions::with_prefix("beat")
        .with_time_range(11, 0.0, 1.0)
        .with_time_dependence(true, true);
    let first = export_scene(&scene, &mut ViewState::default(), &options).unwrap();
    let second = export_scene(&scene, &mut ViewState::default(), &options).unwrap();
    assert_eq!(first, second);

    let metadata = first.metadata.json().unwrap();
    assert_eq!(metadata["Objects"][0]["MorphVertices"], true);
    assert_eq!(metadata["Objects"][0]["MorphColours"], true);
    let payload = first.payloads[0].json().unwrap();
    assert_eq!(payload["morphTargets"].as_array().unwrap().len(), 11);
    assert_eq!(payload["morphColors"].as_array().unwrap().len(), 11);
    // Halfway through, the second vertex sits on the middle keyframe
    assert_eq!(payload["morphTargets"][5]["vertices"][3], 1.5);
}

#[test]
fn test_glyph_export() {
    let dir = tempfile::tempdir().unwrap();
    let mut scene = three_graphic_scene();
    let settings = GlyphSettings {
        orientation: Some(TimeSeries::constant(vec![Vec3::Y; 3])),
        ..GlyphSettings::new(GlyphShape::Arrow)
    };
    scene
        .add_graphic(Graphic::glyphs("fibres", triangle_at(Vec3::ZERO), settings).with_material("gold"))
        .unwrap();
    let options = ExportOptions::with_prefix("Test").with_strict_references(true);
    let bundle = export_scene_to_dir(&scene, &mut ViewState::default(), &options, dir.path()).unwrap();

    assert_eq!(bundle.payloads.len(), 4);
    assert_eq!(bundle.glyph_geometries.len(), 1);
    assert_eq!(bundle.len(), 7);
    assert_eq!(
        file_names(dir.path()),
        vec![
            "Test_1.json",
            "Test_2.json",
            "Test_3.json",
            "Test_4.json",
            "Test_glyph_4.json",
            "Test_metadata.json",
            "Test_view.json"
        ]
    );

    let metadata = read_json(&dir.path().join("Test_metadata.json"));
    let glyphs = &metadata["Objects"][3];
    assert_eq!(glyphs["Type"], "Glyph");
    assert_eq!(glyphs["URL"], "Test_4.json");
    assert_eq!(glyphs["GlyphGeometriesURL"], "Test_glyph_4.json");
    assert!(metadata["Objects"][0].get("GlyphGeometriesURL").is_none());

    let payload = read_json(&dir.path().join("Test_4.json"));
    assert_eq!(payload["axis1"]["0"][0], serde_json::json!([0.0, 1.0, 0.0]));
    let mesh = read_json(&dir.path().join("Test_glyph_4.json"));
    assert_eq!(mesh["metadata"]["formatVersion"], 3);
    assert!(!mesh["faces"].as_array().unwrap().is_empty());
    assert_eq!(mesh["materials"][0]["DbgName"], "fibres");
}

#[test]
fn test_placeholder_like_names_survive() {
    let mut scene = Scene::new("names");
    scene
        .add_graphic(Graphic::points("memory_resource_2", triangle_at(Vec3::ZERO)))
        .unwrap();
    scene
        .add_graphic(Graphic::points("memory_resource_7", triangle_at(Vec3::ONE)))
        .unwrap();
    let options = ExportOptions::with_prefix("N").with_strict_references(true);
    let bundle = export_scene(&scene, &mut ViewState::default(), &options).unwrap();

    let metadata = bundle.metadata.json().unwrap();
    assert_eq!(metadata["Objects"][0]["GroupName"], "memory_resource_2");
    assert_eq!(metadata["Objects"][0]["URL"], "N_1.json");
    assert_eq!(metadata["Objects"][1]["GroupName"], "memory_resource_7");
    assert_eq!(metadata["Objects"][1]["URL"], "N_2.json");
}

#[test]
fn test_edited_graphic_fails_export() {
    let mut scene = Scene::new("edited");
    scene
        .add_graphic(Graphic::surfaces("s", triangle_at(Vec3::ZERO), vec![[0, 1, 2]]))
        .unwrap();
    scene
        .graphic_mut("s")
        .unwrap()
        .set_coordinates(TimeSeries::constant(vec![Vec3::ZERO]));

    let options = ExportOptions::with_prefix("Test");
    let mut pipeline = ExportPipeline::new(&options).unwrap();
    let mut sink = MemorySink::new();
    let err = pipeline
        .run(&scene, &mut ViewState::default(), &mut sink)
        .unwrap_err();
    assert!(matches!(err, ExportError::IndexOutOfRange { .. }));
    assert_eq!(pipeline.stage(), ExportStage::Serializing);
    assert!(sink.is_empty());
}

#[test]
fn test_textured_export() {
    let mut scene = Scene::new("plate");
    scene
        .materials_mut()
        .register(Material::new("checker").with_texture("checker.png"))
        .unwrap();
    scene
        .add_graphic(
            Graphic::surfaces("plate", triangle_at(Vec3::ZERO), vec![[0, 1, 2]])
                .with_material("checker")
                .with_texture_coordinates(vec![Vec2::ZERO, Vec2::X, Vec2::Y]),
        )
        .unwrap();
    let bundle = export_scene(
        &scene,
        &mut ViewState::default(),
        &ExportOptions::with_prefix("plate"),
    )
    .unwrap();
    let payload = bundle.payloads[0].json().unwrap();
    assert_eq!(payload["faces"][0], 8);
    assert_eq!(payload["uvs"][0].as_array().unwrap().len(), 6);
    assert_eq!(payload["materials"][0]["mapDiffuse"], "checker.png");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_bundle_has_one_payload_per_graphic(count in 0usize..12, hidden in 0usize..4) {
        let mut scene = Scene::new("prop");
        for i in 0..count {
            let offset = Vec3::splat(i as f32);
            scene
                .add_graphic(Graphic::points(format!("g{i}"), triangle_at(offset)))
                .unwrap();
        }
        let hidden = hidden.min(count);
        for i in 0..hidden {
            scene.graphic_mut(&format!("g{i}")).unwrap().set_visible(false);
        }

        let options = ExportOptions::with_prefix("P");
        let bundle = export_scene(&scene, &mut ViewState::default(), &options).unwrap();
        let exported = count - hidden;
        prop_assert_eq!(bundle.payloads.len(), exported);
        prop_assert_eq!(bundle.len(), exported + 2);

        let text = bundle.metadata.text().unwrap();
        prop_assert!(!text.contains("memory_resource_"));
        let metadata = bundle.metadata.json().unwrap();
        let objects = metadata["Objects"].as_array().unwrap();
        prop_assert_eq!(objects.len(), exported);
        for (k, object) in objects.iter().enumerate() {
            let expected = format!("P_{}.json", k + 1);
            prop_assert_eq!(object["URL"].as_str(), Some(expected.as_str()));
            prop_assert_eq!(bundle.payloads[k].name.as_str(), expected.as_str());
        }
    }
}
