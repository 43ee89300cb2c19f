use crate::color::{Hsl, color};
use crate::config::{Config, TimelineConfig};
use crate::ir::{DisplayKind, Event, Side, Timeline};
use crate::layout::{EventLayout, TimelineLayout};
use crate::text::{TextBlock, text_width, wrap_text};
use crate::theme::Theme;

const EDGE_PADDING: f32 = 20.0;
const TAG_PAD_X: f32 = 8.0;
const TAG_PAD_Y: f32 = 4.0;
const TAG_GAP: f32 = 6.0;
const SECTION_GAP: f32 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Color(String),
    Gradient(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: String,
    pub opacity: f32,
}

/// Linear gradient in user space, referenced by `Paint::Gradient(id)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientDef {
    pub id: String,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub stops: Vec<GradientStop>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Path {
        d: String,
        stroke: Paint,
        stroke_width: f32,
        class: &'static str,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        stroke: Paint,
        stroke_width: f32,
        class: &'static str,
    },
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        fill: String,
        stroke: Option<String>,
        stroke_width: f32,
        class: &'static str,
    },
    Text {
        x: f32,
        y: f32,
        content: String,
        anchor: TextAnchor,
        font_size: f32,
        fill: String,
        class: &'static str,
    },
}

/// Stack tag pill, positioned relative to its block's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct StackTag {
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    pub id: String,
    pub index: usize,
    pub kind: DisplayKind,
    pub side: Side,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    /// Measured height when one was supplied, else the height of its content.
    pub height: f32,
    pub color: Hsl,
    pub padding: f32,
    pub title: TextBlock,
    pub title_font_size: f32,
    pub year: String,
    pub year_font_size: f32,
    pub line_height: f32,
    pub description: TextBlock,
    pub stack: Vec<StackTag>,
}

impl ContentBlock {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn title_y(&self) -> f32 {
        self.y + self.padding
    }

    pub fn year_y(&self) -> f32 {
        self.title_y() + self.title.height
    }

    pub fn description_y(&self) -> f32 {
        self.year_y() + self.year_height() + SECTION_GAP
    }

    pub fn year_height(&self) -> f32 {
        if self.year.is_empty() {
            0.0
        } else {
            self.year_font_size * self.line_height
        }
    }
}

/// Declarative description of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Left edge of the drawing in layout coordinates; negative when
    /// left-side blocks extend past x = 0.
    pub origin_x: f32,
    pub width: f32,
    pub height: f32,
    pub background: String,
    pub gradients: Vec<GradientDef>,
    pub primitives: Vec<Primitive>,
    pub blocks: Vec<ContentBlock>,
}

impl Scene {
    pub fn block(&self, id: &str) -> Option<&ContentBlock> {
        self.blocks.iter().find(|block| block.id == id)
    }
}

/// Builds the full scene for a computed layout. Each call starts from an
/// empty scene; nothing from earlier passes is reused.
pub fn build_scene(
    timeline: &Timeline,
    layout: &TimelineLayout,
    config: &Config,
    viewport_width: f32,
) -> Scene {
    let tl = &config.timeline;
    let theme = &config.theme;
    let total = timeline.len();
    let mut gradients = Vec::new();
    let mut primitives = Vec::new();
    let mut blocks = Vec::with_capacity(total);

    push_spines(layout, tl, theme, &mut primitives);

    let mut previous: Option<&EventLayout> = None;
    for (event, placed) in timeline.events.iter().zip(&layout.events) {
        let hsl = color(placed.index, total, &config.colors);
        let event_color = hsl.to_string();

        if let Some(prev) = previous
            && prev.lane != placed.lane
        {
            primitives.push(Primitive::Path {
                d: branch_curve(prev, placed, tl.curve_radius),
                stroke: Paint::Color(event_color.clone()),
                stroke_width: tl.connector_width,
                class: "timeline-branch",
            });
        }

        push_connector(placed, tl, &event_color, &mut gradients, &mut primitives);
        push_marker(placed, tl, theme, &event_color, &mut primitives);
        blocks.push(content_block(event, placed, hsl, tl, theme));
        previous = Some(placed);
    }

    let left = blocks
        .iter()
        .map(|block| block.x)
        .fold(0.0f32, f32::min);
    let origin_x = if left < 0.0 { left - EDGE_PADDING } else { 0.0 };
    let right = blocks
        .iter()
        .map(ContentBlock::right)
        .fold(tl.timeline_x, f32::max)
        + EDGE_PADDING;
    let width = viewport_width.max(right - origin_x).ceil();
    let height = blocks
        .iter()
        .map(ContentBlock::bottom)
        .fold(layout.height, f32::max)
        .ceil();

    tracing::debug!(
        blocks = blocks.len(),
        primitives = primitives.len(),
        width,
        height,
        "built timeline scene"
    );

    Scene {
        origin_x,
        width,
        height,
        background: config.render.background.clone(),
        gradients,
        primitives,
        blocks,
    }
}

fn push_spines(
    layout: &TimelineLayout,
    tl: &TimelineConfig,
    theme: &Theme,
    primitives: &mut Vec<Primitive>,
) {
    for lane in &layout.lanes {
        let (top, bottom) = if lane.index == 0 {
            (tl.spine_top, layout.height)
        } else {
            match (lane.first_y, lane.last_y) {
                (Some(first), Some(last)) => (first, last),
                _ => continue,
            }
        };
        primitives.push(Primitive::Path {
            d: format!("M {:.2} {:.2} L {:.2} {:.2}", lane.x, top, lane.x, bottom),
            stroke: Paint::Color(theme.line_color.clone()),
            stroke_width: 2.0,
            class: "timeline-spine",
        });
        if let Some(name) = &lane.name {
            primitives.push(Primitive::Text {
                x: lane.x,
                y: (top - 8.0).max(theme.small_font_size),
                content: name.clone(),
                anchor: TextAnchor::Middle,
                font_size: theme.small_font_size,
                fill: theme.muted_text_color.clone(),
                class: "timeline-lane-label",
            });
        }
    }
}

/// Cubic curve from the previous event's lane into the current one.
fn branch_curve(from: &EventLayout, to: &EventLayout, radius: f32) -> String {
    let dy = (to.y - from.y).abs();
    let bend = radius.max(0.0).min(dy / 2.0);
    format!(
        "M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}",
        from.x,
        from.y,
        from.x,
        from.y + bend,
        to.x,
        to.y - bend,
        to.x,
        to.y
    )
}

fn push_connector(
    placed: &EventLayout,
    tl: &TimelineConfig,
    event_color: &str,
    gradients: &mut Vec<GradientDef>,
    primitives: &mut Vec<Primitive>,
) {
    let start_x = placed.x + placed.side.sign() * tl.dot_radius.max(0.0);
    let stroke = if tl.fade_connectors {
        let id = format!("connector-{}", placed.index);
        gradients.push(GradientDef {
            id: id.clone(),
            x1: start_x,
            y1: placed.y,
            x2: placed.anchor_x,
            y2: placed.y,
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: event_color.to_string(),
                    opacity: 1.0,
                },
                GradientStop {
                    offset: 1.0,
                    color: event_color.to_string(),
                    opacity: 0.15,
                },
            ],
        });
        Paint::Gradient(id)
    } else {
        Paint::Color(event_color.to_string())
    };
    primitives.push(Primitive::Line {
        x1: start_x,
        y1: placed.y,
        x2: placed.anchor_x,
        y2: placed.y,
        stroke,
        stroke_width: tl.connector_width,
        class: "timeline-connector",
    });
}

fn push_marker(
    placed: &EventLayout,
    tl: &TimelineConfig,
    theme: &Theme,
    event_color: &str,
    primitives: &mut Vec<Primitive>,
) {
    let radius = tl.dot_radius.max(0.0);
    let border = tl.dot_border_width.max(0.0);
    if border > 0.0 {
        primitives.push(Primitive::Circle {
            cx: placed.x,
            cy: placed.y,
            r: radius + border,
            fill: theme.background.clone(),
            stroke: Some(event_color.to_string()),
            stroke_width: border,
            class: "timeline-dot-border",
        });
    }
    primitives.push(Primitive::Circle {
        cx: placed.x,
        cy: placed.y,
        r: radius,
        fill: event_color.to_string(),
        stroke: None,
        stroke_width: 0.0,
        class: "timeline-dot",
    });
}

fn content_block(
    event: &Event,
    placed: &EventLayout,
    hsl: Hsl,
    tl: &TimelineConfig,
    theme: &Theme,
) -> ContentBlock {
    let line_height = tl.label_line_height.max(1.0);
    let padding = match placed.kind {
        DisplayKind::Card => tl.card_padding.max(0.0),
        DisplayKind::Label | DisplayKind::Note => 0.0,
    };
    let inner_width = (placed.block_width - padding * 2.0).max(1.0);
    let (title_font_size, year_font_size) = match placed.kind {
        DisplayKind::Card => (theme.title_font_size, theme.small_font_size),
        DisplayKind::Label => (theme.font_size, theme.small_font_size),
        DisplayKind::Note => (theme.small_font_size, theme.small_font_size),
    };
    let title = wrap_text(
        &event.title,
        inner_width,
        title_font_size,
        line_height,
        &theme.font_family,
    );

    let (description, stack) = if placed.kind == DisplayKind::Card {
        let description = wrap_text(
            event.description.as_deref().unwrap_or_default(),
            inner_width,
            theme.font_size,
            line_height,
            &theme.font_family,
        );
        let tags = layout_tags(&event.stack, inner_width, theme);
        (description, tags)
    } else {
        (TextBlock::empty(), Vec::new())
    };

    let mut block = ContentBlock {
        id: event.id.clone(),
        index: placed.index,
        kind: placed.kind,
        side: placed.side,
        x: placed.content_x,
        y: placed.content_y,
        width: placed.block_width,
        height: 0.0,
        color: hsl,
        padding,
        title,
        title_font_size,
        year: event.year.clone(),
        year_font_size,
        line_height,
        description,
        stack,
    };
    block.height = if placed.measured {
        placed.block_height
    } else {
        natural_height(&block)
    };
    block
}

/// Height of everything drawn inside a block, padding included.
fn natural_height(block: &ContentBlock) -> f32 {
    let mut height = block.padding * 2.0 + block.title.height + block.year_height();
    if !block.description.lines.is_empty() {
        height += SECTION_GAP + block.description.height;
    }
    if let Some(bottom) = block.stack.iter().map(|tag| tag.y + tag.height).reduce(f32::max) {
        let tags_top = block.stack.iter().map(|tag| tag.y).fold(f32::MAX, f32::min);
        height += SECTION_GAP + (bottom - tags_top);
    }
    height
}

/// Flows stack tags into rows. Tag `y` is relative to the top of the tag area
/// and is shifted into block coordinates by `tags_offset` when drawn.
fn layout_tags(stack: &[String], max_width: f32, theme: &Theme) -> Vec<StackTag> {
    let height = theme.small_font_size + TAG_PAD_Y * 2.0;
    let mut tags = Vec::with_capacity(stack.len());
    let (mut x, mut y) = (0.0f32, 0.0f32);
    for label in stack.iter().filter(|label| !label.trim().is_empty()) {
        let width = text_width(label, theme.small_font_size, &theme.font_family) + TAG_PAD_X * 2.0;
        if x > 0.0 && x + width > max_width {
            x = 0.0;
            y += height + TAG_GAP;
        }
        tags.push(StackTag {
            label: label.clone(),
            x,
            y,
            width,
            height,
        });
        x += width + TAG_GAP;
    }
    tags
}

/// Top of the tag area inside a block, relative to the block's top edge.
pub fn tags_offset(block: &ContentBlock) -> f32 {
    let mut offset = block.padding + block.title.height + block.year_height() + SECTION_GAP;
    if !block.description.lines.is_empty() {
        offset += block.description.height + SECTION_GAP;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpacingMode;
    use crate::layout::compute_layout;
    use crate::measure::Measurements;

    fn resume() -> Timeline {
        let mut bachelor = Event::new("bachelor", "Bachelor - IT", "2016 - 2019", Side::Right);
        bachelor.description = Some("Computer science education focusing on software engineering.".to_string());
        bachelor.stack = ["Java", "Python", "SQL", "Git", "Linux", "React", "Node.js"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let canvas = Event::new("canvas-lib", "JS Canvas Projects Library", "2017", Side::Left);
        Timeline::from_events(vec![bachelor, canvas])
    }

    fn scene_for(timeline: &Timeline, config: &Config) -> Scene {
        let layout = compute_layout(timeline, &config.timeline, &Measurements::new());
        build_scene(timeline, &layout, config, 800.0)
    }

    #[test]
    fn draws_spine_markers_and_blocks() {
        let timeline = resume();
        let scene = scene_for(&timeline, &Config::default());
        let spines = scene
            .primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Path { class: "timeline-spine", .. }))
            .count();
        let dots = scene
            .primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Circle { class: "timeline-dot", .. }))
            .count();
        assert_eq!(spines, 1);
        assert_eq!(dots, 2);
        assert_eq!(scene.blocks.len(), 2);
        assert_eq!(scene.gradients.len(), 2);
        assert_eq!(scene.blocks[0].kind, DisplayKind::Card);
        assert_eq!(scene.blocks[1].kind, DisplayKind::Note);
    }

    #[test]
    fn bordered_dot_is_optional() {
        let mut config = Config::default();
        config.timeline.dot_border_width = 0.0;
        config.timeline.fade_connectors = false;
        let scene = scene_for(&resume(), &config);
        assert!(!scene
            .primitives
            .iter()
            .any(|p| matches!(p, Primitive::Circle { class: "timeline-dot-border", .. })));
        assert!(scene.gradients.is_empty());
    }

    #[test]
    fn left_blocks_extend_origin() {
        let scene = scene_for(&resume(), &Config::default());
        let left = scene.block("canvas-lib").unwrap();
        assert!(left.x < 0.0);
        assert!(scene.origin_x <= left.x);
        assert!(scene.width >= 800.0);
    }

    #[test]
    fn card_height_covers_content() {
        let scene = scene_for(&resume(), &Config::default());
        let card = scene.block("bachelor").unwrap();
        assert!(!card.description.lines.is_empty());
        assert_eq!(card.stack.len(), 7);
        let last_tag = card.stack.last().unwrap();
        assert!(tags_offset(card) + last_tag.y + last_tag.height <= card.height - card.padding + 0.01);
    }

    #[test]
    fn lane_change_draws_branch_curve() {
        let mut a = Event::new("a", "A", "", Side::Right);
        a.lane = Some("education".to_string());
        let mut b = Event::new("b", "B", "", Side::Right);
        b.lane = Some("professional".to_string());
        let timeline = Timeline::from_events(vec![a, b]);
        let scene = scene_for(&timeline, &Config::default());
        let branches: Vec<&Primitive> = scene
            .primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Path { class: "timeline-branch", .. }))
            .collect();
        assert_eq!(branches.len(), 1);
        let labels = scene
            .primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Text { class: "timeline-lane-label", .. }))
            .count();
        assert_eq!(labels, 2);
    }

    #[test]
    fn empty_timeline_still_has_spine() {
        let scene = scene_for(&Timeline::new(), &Config::default());
        assert!(scene.blocks.is_empty());
        assert_eq!(scene.primitives.len(), 1);
        assert_eq!(scene.height, 150.0);
    }

    #[test]
    fn scene_height_covers_tall_last_block() {
        let mut config = Config::default();
        config.timeline.spacing = SpacingMode::Fixed;
        let scene = scene_for(&resume(), &config);
        assert!(scene.height >= scene.blocks.iter().map(ContentBlock::bottom).fold(0.0, f32::max));
    }
}
