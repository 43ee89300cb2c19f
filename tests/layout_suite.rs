use std::path::Path;

use resume_timeline_renderer::{
    Config, Measurements, RenderOptions, Side, SpacingMode, build_timeline_scene, compute_layout,
    load_document, parse_timeline, render_html, render_with_options, scene_with_options,
};

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).expect("fixture read failed")
}

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    for name in ["resume.json5", "resume-data.js", "branches.json"] {
        let svg = render_with_options(&fixture(name), RenderOptions::default())
            .unwrap_or_else(|err| panic!("{name}: {err}"));
        assert_valid_svg(&svg, name);
    }
}

#[test]
fn resume_sample_positions() {
    let parsed = parse_timeline(&fixture("resume.json5")).unwrap();
    let sides: Vec<Side> = parsed.timeline.events.iter().map(|e| e.side).collect();
    assert_eq!(
        sides,
        vec![Side::Right, Side::Left, Side::Right, Side::Left, Side::Left]
    );

    let config = Config::default();
    let layout = compute_layout(&parsed.timeline, &config.timeline, &Measurements::new());
    let ys: Vec<f32> = layout.events.iter().map(|e| e.y).collect();
    assert_eq!(ys, vec![50.0, 150.0, 250.0, 350.0, 450.0]);
    assert!(layout.events.iter().all(|e| e.x == 120.0));
    assert_eq!(layout.height, 550.0);
}

#[test]
fn resize_reruns_full_pass() {
    let input = fixture("resume.json5");
    let narrow = RenderOptions {
        viewport_width: 400.0,
        ..Default::default()
    };
    let wide = RenderOptions {
        viewport_width: 1600.0,
        ..Default::default()
    };
    let (small, _) = scene_with_options(&input, narrow).unwrap();
    let (large, _) = scene_with_options(&input, wide).unwrap();
    assert_eq!(large.width, 1600.0);
    assert!(small.width < large.width);
    assert_eq!(small.blocks, large.blocks);
    assert_eq!(small.primitives, large.primitives);
}

#[test]
fn branch_document_uses_lanes_and_dynamic_spacing() {
    let (scene, config) = scene_with_options(&fixture("branches.json"), RenderOptions::default()).unwrap();
    assert_eq!(config.timeline.spacing, SpacingMode::Dynamic);
    assert_eq!(config.theme.font_size, 14.0);
    let first = scene.block("bachelor").unwrap();
    let second = scene.block("frontend-dev").unwrap();
    assert!(first.bottom() <= second.y);
    assert!(second.x > first.x);
}

#[test]
fn measured_heights_override_estimates() {
    let mut heights = Measurements::new();
    heights.insert("bachelor", 400.0);
    let mut config = Config::default();
    config.timeline.spacing = SpacingMode::Dynamic;
    let options = RenderOptions {
        config,
        measurements: Some(heights),
        ..Default::default()
    };
    let (scene, config) = scene_with_options(&fixture("branches.json"), options).unwrap();
    let first = scene.block("bachelor").unwrap();
    let second = scene.block("frontend-dev").unwrap();
    assert_eq!(second.y - first.y, 400.0 + config.timeline.block_gap);
    assert_eq!(first.height, 400.0);
    assert!(scene.height >= first.bottom());
}

#[test]
fn html_output_contains_every_event() {
    let input = fixture("resume.json5");
    let (scene, config) = scene_with_options(&input, RenderOptions::default()).unwrap();
    let html = render_html(&scene, &config.theme);
    for id in ["bachelor", "canvas-lib", "frontend-dev", "bash-utils", "timesheet-auto"] {
        assert!(html.contains(&format!("id=\"{id}\"")), "missing block {id}");
    }
}

#[test]
fn malformed_documents_are_errors() {
    assert!(render_with_options("{ events: [ {id: 'a'} ] }", RenderOptions::default()).is_err());
    assert!(render_with_options("not a timeline", RenderOptions::default()).is_err());
}

#[test]
fn empty_event_list_renders() {
    let svg = render_with_options("[]", RenderOptions::default()).unwrap();
    assert_valid_svg(&svg, "empty");
}

#[test]
fn scene_dispatch_reports_layout_heights() {
    let (timeline, config) = load_document(&fixture("resume.json5"), Config::default()).unwrap();
    let (_, fixed) = build_timeline_scene(&timeline, &config, 1200.0, None);
    assert!(fixed.is_empty());

    let mut dynamic = config.clone();
    dynamic.timeline.spacing = SpacingMode::Dynamic;
    let (scene, measured) = build_timeline_scene(&timeline, &dynamic, 1200.0, None);
    assert_eq!(measured.len(), timeline.len());
    for block in &scene.blocks {
        assert_eq!(measured.get(&block.id), Some(block.height));
    }
}
