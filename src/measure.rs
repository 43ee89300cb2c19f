use crate::config::Config;
use crate::ir::Timeline;
use crate::layout::compute_layout;
use crate::scene::{ContentBlock, Scene, build_scene};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Measured content heights keyed by event id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Measurements {
    heights: BTreeMap<String, f32>,
}

impl Measurements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a height; negative or non-finite values are stored as 0.
    pub fn insert(&mut self, id: &str, height: f32) {
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        self.heights.insert(id.to_string(), height);
    }

    pub fn get(&self, id: &str) -> Option<f32> {
        self.heights
            .get(id)
            .map(|height| if height.is_finite() { height.max(0.0) } else { 0.0 })
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn from_json(input: &str) -> anyhow::Result<Self> {
        let raw: BTreeMap<String, f32> = serde_json::from_str(input)?;
        let mut measurements = Self::new();
        for (id, height) in raw {
            measurements.insert(&id, height);
        }
        Ok(measurements)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

/// Reads the rendered height of a content block from some display surface.
pub trait Measure {
    fn measure(&mut self, block: &ContentBlock) -> Option<f32>;
}

/// Measures blocks from the scene's own text layout.
#[derive(Debug, Default, Clone, Copy)]
pub struct SceneMeasurer;

impl Measure for SceneMeasurer {
    fn measure(&mut self, block: &ContentBlock) -> Option<f32> {
        Some(block.height)
    }
}

/// Heights measured elsewhere, e.g. read back from a browser DOM.
impl Measure for Measurements {
    fn measure(&mut self, block: &ContentBlock) -> Option<f32> {
        self.get(&block.id)
    }
}

pub fn measure_scene(scene: &Scene, measurer: &mut dyn Measure) -> Measurements {
    let mut measurements = Measurements::new();
    for block in &scene.blocks {
        match measurer.measure(block) {
            Some(height) => measurements.insert(&block.id, height),
            None => tracing::warn!(id = %block.id, "no measurement for block, keeping estimate"),
        }
    }
    measurements
}

/// Render, measure, relayout, render again.
pub fn render_two_pass(
    timeline: &Timeline,
    config: &Config,
    viewport_width: f32,
    measurer: &mut dyn Measure,
) -> (Scene, Measurements) {
    let first_layout = compute_layout(timeline, &config.timeline, &Measurements::new());
    let first = build_scene(timeline, &first_layout, config, viewport_width);
    let heights = measure_scene(&first, measurer);
    let layout = compute_layout(timeline, &config.timeline, &heights);
    tracing::debug!(measured = heights.len(), "relaid timeline with measured heights");
    (build_scene(timeline, &layout, config, viewport_width), heights)
}
