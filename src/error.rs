use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("invalid timeline document: {0}")]
    Parse(#[from] json5::Error),

    #[error("event #{index} has an empty id")]
    EmptyId { index: usize },

    #[error("duplicate event id `{id}` (events #{first} and #{second})")]
    DuplicateId {
        id: String,
        first: usize,
        second: usize,
    },

    #[error("no timeline events found in input")]
    NoEvents,

    #[error("invalid date `{value}`, expected YYYY-MM-DD")]
    InvalidDate { value: String },
}
