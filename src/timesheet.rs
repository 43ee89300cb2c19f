//! Weekly timesheet fill planning for the third-party hour registration form.
//!
//! The plan is a declarative list of form steps per working day; applying it
//! happens in the browser through the console script emitted by
//! [`FillPlan::to_console_script`].

use crate::error::TimelineError;
use chrono::{Datelike, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static TICKET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:BUG|FT|US)[-/]?[0-9]+").unwrap());

pub const NEW_EVENT_BUTTON: &str = "#newEventButton";
pub const SAVE_EVENT_BUTTON: &str = "#saveEventButton";
pub const CONFIRM_BOX: &str = "#confirmBox";
pub const CONFIRM_YES: &str = "#alertDeleteYes";
pub const EXISTING_ENTRY_MARKER: &str = ".viewIcon";
/// Delay after each click so the host page can react.
pub const STEP_DELAY_MS: u64 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTemplate {
    pub start_time: String,
    pub end_time: String,
    pub subject: String,
    pub description: String,
}

impl Default for EntryTemplate {
    fn default() -> Self {
        Self {
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
            subject: "Feature Development".to_string(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStep {
    /// Skip the rest of the day when `marker` exists inside `row`.
    SkipIfPresent { row: String, marker: String },
    Click { selector: String },
    /// Click `selector` inside `container`, doing nothing if either is absent.
    ClickIfPresent { container: String, selector: String },
    Fill { selector: String, value: String },
    Wait { ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub steps: Vec<FormStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillPlan {
    pub days: Vec<DayPlan>,
}

pub fn parse_date(value: &str) -> Result<NaiveDate, TimelineError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| TimelineError::InvalidDate {
        value: value.to_string(),
    })
}

/// Monday through Friday dates from `start` to `end`, both inclusive.
pub fn each_weekday_of_interval(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

/// Day format used by the form's date inputs (`yyyy-mm-dd`, zero padded).
pub fn format_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Sorted, de-duplicated ticket references (`FT/123`, `US-45`, `BUG7`).
pub fn extract_ticket_refs(text: &str) -> Vec<String> {
    TICKET_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn description_from_tickets(tickets: &[String]) -> String {
    tickets
        .iter()
        .map(|ticket| format!("- {ticket}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Row of the week table holding a weekday's existing entry.
fn existing_entry_row(date: NaiveDate) -> String {
    format!(
        "#event > tbody > tr:nth-child({})",
        date.weekday().number_from_monday()
    )
}

pub fn plan_week_fill(days: &[NaiveDate], template: &EntryTemplate) -> FillPlan {
    let days = days
        .iter()
        .map(|date| {
            let day = format_day(*date);
            let fill = |name: &str, tag: &str, value: &str| FormStep::Fill {
                selector: format!("{tag}[name={name}]"),
                value: value.to_string(),
            };
            DayPlan {
                date: *date,
                steps: vec![
                    FormStep::SkipIfPresent {
                        row: existing_entry_row(*date),
                        marker: EXISTING_ENTRY_MARKER.to_string(),
                    },
                    FormStep::Click {
                        selector: NEW_EVENT_BUTTON.to_string(),
                    },
                    FormStep::Wait { ms: STEP_DELAY_MS },
                    FormStep::ClickIfPresent {
                        container: CONFIRM_BOX.to_string(),
                        selector: CONFIRM_YES.to_string(),
                    },
                    fill("eventStartTime", "input", &template.start_time),
                    fill("eventEndTime", "input", &template.end_time),
                    fill("eventSubject", "input", &template.subject),
                    fill("eventDescription", "textarea", &template.description),
                    fill("eventStartDate", "input", &day),
                    fill("eventEndDate", "input", &day),
                    FormStep::Click {
                        selector: SAVE_EVENT_BUTTON.to_string(),
                    },
                    FormStep::Wait { ms: STEP_DELAY_MS },
                ],
            }
        })
        .collect();
    FillPlan { days }
}

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

impl FillPlan {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Async script for the browser console that applies the plan. Missing
    /// elements are skipped silently, as the host page gives no feedback.
    pub fn to_console_script(&self) -> String {
        let mut js = String::new();
        js.push_str("(async () => {\n");
        js.push_str("  const sleep = (ms) => new Promise((r) => setTimeout(r, ms));\n");
        js.push_str("  const click = (selector) => document.querySelector(selector)?.click();\n");
        js.push_str("  const fill = (selector, value) => {\n");
        js.push_str("    const el = document.querySelector(selector);\n");
        js.push_str("    if (el) el.value = value;\n");
        js.push_str("  };\n");
        for (idx, day) in self.days.iter().enumerate() {
            js.push_str(&format!("  // {}\n", day.date));
            js.push_str(&format!("  day{idx}: {{\n"));
            for step in &day.steps {
                match step {
                    FormStep::SkipIfPresent { row, marker } => {
                        js.push_str(&format!(
                            "    if (document.querySelector({})?.querySelector({})) break day{idx};\n",
                            js_string(row),
                            js_string(marker)
                        ));
                    }
                    FormStep::Click { selector } => {
                        js.push_str(&format!("    click({});\n", js_string(selector)));
                    }
                    FormStep::ClickIfPresent {
                        container,
                        selector,
                    } => {
                        js.push_str(&format!(
                            "    document.querySelector({})?.querySelector({})?.click();\n",
                            js_string(container),
                            js_string(selector)
                        ));
                    }
                    FormStep::Fill { selector, value } => {
                        js.push_str(&format!("    fill({}, {});\n", js_string(selector), js_string(value)));
                    }
                    FormStep::Wait { ms } => {
                        js.push_str(&format!("    await sleep({ms});\n"));
                    }
                }
            }
            js.push_str("  }\n");
        }
        js.push_str("})();\n");
        js
    }
}
