use crate::config::{SpacingMode, TimelineConfig};
use crate::ir::{DisplayKind, Event, Side, Timeline};
use crate::measure::Measurements;

#[derive(Debug, Clone, PartialEq)]
pub struct EventLayout {
    pub id: String,
    pub index: usize,
    pub kind: DisplayKind,
    pub side: Side,
    pub lane: usize,
    /// Marker position on the spine.
    pub x: f32,
    pub y: f32,
    /// Where the connector meets the content block.
    pub anchor_x: f32,
    /// Left edge and top of the content block.
    pub content_x: f32,
    pub content_y: f32,
    pub block_width: f32,
    pub block_height: f32,
    /// Whether `block_height` came from a measurement rather than an estimate.
    pub measured: bool,
}

impl EventLayout {
    pub fn block_bottom(&self) -> f32 {
        self.content_y + self.block_height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaneLayout {
    pub name: Option<String>,
    pub index: usize,
    pub x: f32,
    pub first_y: Option<f32>,
    pub last_y: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineLayout {
    pub events: Vec<EventLayout>,
    pub lanes: Vec<LaneLayout>,
    pub height: f32,
}

impl TimelineLayout {
    pub fn event(&self, id: &str) -> Option<&EventLayout> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn max_y(&self) -> Option<f32> {
        self.events.iter().map(|event| event.y).reduce(f32::max)
    }
}

/// Assigns every event its spine and content coordinates.
///
/// Pure: measured heights come in through `heights` (possibly empty, in which
/// case per-kind estimates are used), so rerunning with the same inputs gives
/// the same layout.
pub fn compute_layout(
    timeline: &Timeline,
    config: &TimelineConfig,
    heights: &Measurements,
) -> TimelineLayout {
    let min_spacing = config.min_spacing.max(1.0);
    let mut events = Vec::with_capacity(timeline.len());
    let mut y = config.start_y;

    for (index, event) in timeline.events.iter().enumerate() {
        let kind = event.display_kind();
        let lane = timeline.lane_of(event);
        let x = lane_x(config, lane);
        let (block_height, measured) = match heights.get(&event.id) {
            Some(height) => (height, true),
            None => (config.block_estimates.get(kind).max(0.0), false),
        };
        let block_width = config.block_width(kind);
        let (anchor_x, content_x) = content_anchor(event, x, block_width, config);

        events.push(EventLayout {
            id: event.id.clone(),
            index,
            kind,
            side: event.side,
            lane,
            x,
            y,
            anchor_x,
            content_x,
            content_y: y - config.content_offset_y,
            block_width,
            block_height,
            measured,
        });

        y += gap_after(kind, block_height, config).max(min_spacing);
    }

    let lanes = lane_layouts(timeline, config, &events);
    let height = match events.iter().map(|event| event.y).reduce(f32::max) {
        Some(max_y) => (max_y + config.canvas_padding).ceil(),
        None => (config.start_y + config.canvas_padding).ceil(),
    };

    tracing::debug!(
        events = events.len(),
        lanes = lanes.len(),
        height,
        mode = ?config.spacing,
        "computed timeline layout"
    );

    TimelineLayout {
        events,
        lanes,
        height,
    }
}

fn gap_after(kind: DisplayKind, block_height: f32, config: &TimelineConfig) -> f32 {
    match config.spacing {
        SpacingMode::Fixed => config
            .spacing_overrides
            .get(kind)
            .unwrap_or(config.event_spacing),
        SpacingMode::Dynamic => block_height + config.block_gap.max(0.0),
    }
}

fn lane_x(config: &TimelineConfig, lane: usize) -> f32 {
    config.timeline_x + lane as f32 * config.lane_offset
}

fn content_anchor(event: &Event, x: f32, width: f32, config: &TimelineConfig) -> (f32, f32) {
    let anchor_x = x + event.side.sign() * config.content_offset_x;
    let content_x = match event.side {
        Side::Right => anchor_x,
        Side::Left => anchor_x - width,
    };
    (anchor_x, content_x)
}

fn lane_layouts(
    timeline: &Timeline,
    config: &TimelineConfig,
    events: &[EventLayout],
) -> Vec<LaneLayout> {
    let names: Vec<Option<String>> = if timeline.lanes.is_empty() {
        vec![None]
    } else {
        timeline.lanes.iter().cloned().map(Some).collect()
    };
    names
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            let ys = events.iter().filter(|e| e.lane == index).map(|e| e.y);
            LaneLayout {
                name,
                index,
                x: lane_x(config, index),
                first_y: ys.clone().reduce(f32::min),
                last_y: ys.reduce(f32::max),
            }
        })
        .collect()
}
