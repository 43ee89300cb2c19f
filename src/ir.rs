use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    #[default]
    Right,
}

impl Side {
    /// +1 for content drawn to the right of the spine, -1 for the left.
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Presentation tier of an event's content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayKind {
    Card,
    Label,
    Note,
}

impl DisplayKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Label => "label",
            Self::Note => "note",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stack: Vec<String>,
    #[serde(default)]
    pub side: Side,
    #[serde(default, alias = "branch", skip_serializing_if = "Option::is_none")]
    pub lane: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DisplayKind>,
}

impl Event {
    pub fn new(id: &str, title: &str, year: &str, side: Side) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            year: year.to_string(),
            description: None,
            stack: Vec::new(),
            side,
            lane: None,
            kind: None,
        }
    }

    pub fn is_detailed(&self) -> bool {
        self.description.as_deref().is_some_and(|d| !d.trim().is_empty()) || !self.stack.is_empty()
    }

    pub fn display_kind(&self) -> DisplayKind {
        if let Some(kind) = self.kind {
            return kind;
        }
        if self.is_detailed() {
            DisplayKind::Card
        } else if self.side == Side::Right {
            DisplayKind::Label
        } else {
            DisplayKind::Note
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Timeline {
    pub events: Vec<Event>,
    pub lanes: Vec<String>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: Vec<Event>) -> Self {
        let mut timeline = Self::new();
        for event in events {
            timeline.push(event);
        }
        timeline
    }

    /// Appends an event, registering its lane on first sight.
    pub fn push(&mut self, event: Event) {
        if let Some(lane) = &event.lane {
            self.ensure_lane(lane);
        }
        self.events.push(event);
    }

    pub fn ensure_lane(&mut self, name: &str) -> usize {
        if let Some(idx) = self.lane_index(name) {
            return idx;
        }
        self.lanes.push(name.to_string());
        self.lanes.len() - 1
    }

    pub fn lane_index(&self, name: &str) -> Option<usize> {
        self.lanes.iter().position(|lane| lane == name)
    }

    /// Lane slot of an event; events without a lane share slot 0.
    pub fn lane_of(&self, event: &Event) -> usize {
        event
            .lane
            .as_deref()
            .and_then(|lane| self.lane_index(lane))
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
