use crate::config::ConfigFile;
use crate::error::TimelineError;
use crate::ir::{Event, Timeline};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;

static JS_BINDING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(?:const|let|var)\s+(\w+)\s*=\s*").unwrap());

const EVENT_KEYS: [&str; 3] = ["events", "timelineData", "experiences"];
const CONFIG_KEYS: [&str; 3] = ["timeline", "timelineConfig", "treeConfig"];

#[derive(Debug, Default)]
pub struct ParseOutput {
    pub timeline: Timeline,
    pub(crate) config: ConfigFile,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Document {
    Events(Vec<Event>),
    Full(Box<FullDocument>),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FullDocument {
    #[serde(alias = "timelineData", alias = "experiences")]
    events: Vec<Event>,
    #[serde(flatten)]
    config: ConfigFile,
}

/// Parses a timeline document: a JSON/JSON5 object with an `events` array and
/// optional config sections, a bare event array, or a JavaScript data file
/// declaring `const timelineData = [...]` and `const timelineConfig = {...}`.
pub fn parse_timeline(input: &str) -> Result<ParseOutput, TimelineError> {
    let (events, config) = if JS_BINDING_RE.is_match(input) {
        parse_js_bindings(input)?
    } else {
        match json5::from_str::<Document>(input)? {
            Document::Events(events) => (events, ConfigFile::default()),
            Document::Full(doc) => (doc.events, doc.config),
        }
    };

    check_ids(&events)?;
    tracing::debug!(events = events.len(), "parsed timeline document");
    Ok(ParseOutput {
        timeline: Timeline::from_events(events),
        config,
    })
}

fn parse_js_bindings(input: &str) -> Result<(Vec<Event>, ConfigFile), TimelineError> {
    let mut bindings: HashMap<String, &str> = HashMap::new();
    for caps in JS_BINDING_RE.captures_iter(input) {
        let (Some(name), Some(whole)) = (caps.get(1), caps.get(0)) else {
            continue;
        };
        if let Some(literal) = balanced_literal(&input[whole.end()..]) {
            bindings.insert(name.as_str().to_string(), literal);
        }
    }

    let events_src = EVENT_KEYS
        .iter()
        .find_map(|key| bindings.get(*key))
        .ok_or(TimelineError::NoEvents)?;
    let events: Vec<Event> = json5::from_str(events_src)?;

    let mut config = ConfigFile::default();
    if let Some(src) = CONFIG_KEYS.iter().find_map(|key| bindings.get(*key)) {
        // JS data files keep layout and color keys in one object;
        // each section picks up the keys it knows.
        let section: serde_json::Value = json5::from_str(src)?;
        config.timeline = Some(section.clone());
        config.colors = Some(section);
    }
    Ok((events, config))
}

/// Returns the `[...]` or `{...}` literal at the start of `src`, honoring
/// quotes and comments.
fn balanced_literal(src: &str) -> Option<&str> {
    let open = src.chars().next()?;
    if open != '[' && open != '{' {
        return None;
    }
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = src.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if let Some(q) = quote {
            match ch {
                '\\' => {
                    chars.next();
                }
                c if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' | '\'' | '`' => quote = Some(ch),
            '/' if matches!(chars.peek(), Some((_, '/'))) => {
                for (_, c) in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                let mut prev = ' ';
                for (_, c) in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&src[..idx + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

fn check_ids(events: &[Event]) -> Result<(), TimelineError> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (index, event) in events.iter().enumerate() {
        let id = event.id.trim();
        if id.is_empty() {
            return Err(TimelineError::EmptyId { index });
        }
        if let Some(first) = seen.insert(id, index) {
            return Err(TimelineError::DuplicateId {
                id: id.to_string(),
                first,
                second: index,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, apply_config_file};
    use crate::ir::{DisplayKind, Side};

    const JS_DATA: &str = r#"
// Timeline Experience Data Configuration
const timelineData = [
    {
        // Unique identifier
        id: 'bachelor',
        title: 'Bachelor - IT',
        year: '2016 - 2019',
        side: 'right',
        description: 'Education; with {braces} and [brackets] in text.',
        stack: ['Java', 'Python']
    },
    { id: 'canvas-lib', title: 'JS Canvas Projects Library', year: '2017', side: 'left' },
];

/* layout */
const timelineConfig = {
    timelineX: 160,
    startY: 40,
    eventSpacing: 90,
    colorMode: 'hue',
    baseColor: '#7fa8c4'
};
"#;

    #[test]
    fn parses_json_document() {
        let out = parse_timeline(
            r#"{"events": [{"id": "a", "title": "A", "year": "2016", "branch": "education"}],
                "timeline": {"startY": 10}}"#,
        )
        .unwrap();
        assert_eq!(out.timeline.len(), 1);
        assert_eq!(out.timeline.lanes, vec!["education"]);
        assert_eq!(out.timeline.events[0].side, Side::Right);
        let mut config = Config::default();
        apply_config_file(&mut config, out.config).unwrap();
        assert_eq!(config.timeline.start_y, 10.0);
    }

    #[test]
    fn leading_comments_stay_json5() {
        let out = parse_timeline("// my resume\n{ events: [ { id: 'a', title: 'A' } ] }").unwrap();
        assert_eq!(out.timeline.events[0].id, "a");
        let out = parse_timeline("/* events */\n[ { id: 'b', title: 'B' } ]").unwrap();
        assert_eq!(out.timeline.events[0].id, "b");
    }

    #[test]
    fn parses_bare_event_array() {
        let out = parse_timeline("[{id: 'x', title: 'X', kind: 'note'}]").unwrap();
        assert_eq!(out.timeline.events[0].display_kind(), DisplayKind::Note);
    }

    #[test]
    fn parses_javascript_data_file() {
        let out = parse_timeline(JS_DATA).unwrap();
        assert_eq!(out.timeline.len(), 2);
        assert_eq!(out.timeline.events[1].side, Side::Left);
        assert_eq!(
            out.timeline.events[0].description.as_deref(),
            Some("Education; with {braces} and [brackets] in text.")
        );
        let mut config = Config::default();
        apply_config_file(&mut config, out.config).unwrap();
        assert_eq!(config.timeline.timeline_x, 160.0);
        assert_eq!(config.timeline.event_spacing, 90.0);
        assert_eq!(config.colors.color_mode, crate::color::ColorMode::Hue);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = parse_timeline("[{id: 'a', title: 'A'}, {id: 'a', title: 'B'}]").unwrap_err();
        assert!(matches!(err, TimelineError::DuplicateId { first: 0, second: 1, .. }));
    }

    #[test]
    fn rejects_empty_ids() {
        let err = parse_timeline("[{id: ' ', title: 'A'}]").unwrap_err();
        assert!(matches!(err, TimelineError::EmptyId { index: 0 }));
    }

    #[test]
    fn js_without_events_is_an_error() {
        let err = parse_timeline("const other = [1, 2];").unwrap_err();
        assert!(matches!(err, TimelineError::NoEvents));
    }

    #[test]
    fn balanced_literal_skips_comments_and_strings() {
        let src = "{ a: '}', /* } */ b: [1] // }\n } trailing";
        assert_eq!(balanced_literal(src), Some("{ a: '}', /* } */ b: [1] // }\n }"));
        assert_eq!(balanced_literal("[1, [2]"), None);
    }
}
