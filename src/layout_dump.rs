use crate::ir::Timeline;
use crate::layout::TimelineLayout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub height: f32,
    pub events: Vec<EventDump>,
    pub lanes: Vec<LaneDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDump {
    pub id: String,
    pub title: String,
    pub kind: String,
    pub side: String,
    pub lane: Option<String>,
    #[serde(rename = "calculatedX")]
    pub calculated_x: f32,
    #[serde(rename = "calculatedY")]
    pub calculated_y: f32,
    pub content_x: f32,
    pub content_y: f32,
    pub block_width: f32,
    pub block_height: f32,
    pub measured: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneDump {
    pub index: usize,
    pub name: Option<String>,
    pub x: f32,
    pub first_y: Option<f32>,
    pub last_y: Option<f32>,
}

impl LayoutDump {
    pub fn from_layout(layout: &TimelineLayout, timeline: &Timeline) -> Self {
        let events = layout
            .events
            .iter()
            .zip(&timeline.events)
            .map(|(placed, event)| EventDump {
                id: placed.id.clone(),
                title: event.title.clone(),
                kind: placed.kind.as_str().to_string(),
                side: format!("{:?}", placed.side).to_lowercase(),
                lane: event.lane.clone(),
                calculated_x: placed.x,
                calculated_y: placed.y,
                content_x: placed.content_x,
                content_y: placed.content_y,
                block_width: placed.block_width,
                block_height: placed.block_height,
                measured: placed.measured,
            })
            .collect();

        let lanes = layout
            .lanes
            .iter()
            .map(|lane| LaneDump {
                index: lane.index,
                name: lane.name.clone(),
                x: lane.x,
                first_y: lane.first_y,
                last_y: lane.last_y,
            })
            .collect();

        LayoutDump {
            height: layout.height,
            events,
            lanes,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &TimelineLayout, timeline: &Timeline) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, timeline);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimelineConfig;
    use crate::ir::{Event, Side};
    use crate::layout::compute_layout;
    use crate::measure::Measurements;

    #[test]
    fn dump_uses_calculated_field_names() {
        let timeline = Timeline::from_events(vec![
            Event::new("a", "A", "2016", Side::Right),
            Event::new("b", "B", "2017", Side::Left),
        ]);
        let layout = compute_layout(&timeline, &TimelineConfig::default(), &Measurements::new());
        let value = serde_json::to_value(LayoutDump::from_layout(&layout, &timeline)).unwrap();
        assert_eq!(value["events"][1]["calculatedY"], 150.0);
        assert_eq!(value["events"][1]["calculatedX"], 120.0);
        assert_eq!(value["events"][1]["side"], "left");
        assert_eq!(value["height"], 250.0);
    }

    #[test]
    fn dump_writes_json_file() {
        let timeline = Timeline::from_events(vec![Event::new("a", "A", "2016", Side::Right)]);
        let layout = compute_layout(&timeline, &TimelineConfig::default(), &Measurements::new());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        write_layout_dump(&path, &layout, &timeline).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("\"calculatedY\": 50.0"));
    }
}
