//! Sequence counter DTOs

use serde::{Deserialize, Serialize};

use domain_numbering::SequenceCounter;

#[derive(Debug, Deserialize)]
pub struct ConfigureCounterRequest {
    pub range_start: i64,
    pub range_end: i64,
    #[serde(default)]
    pub allow_outside_range: bool,
}

#[derive(Debug, Serialize)]
pub struct CounterResponse {
    pub key: String,
    pub range_start: i64,
    pub range_end: i64,
    pub next: i64,
    pub allow_outside_range: bool,
}

impl From<&SequenceCounter> for CounterResponse {
    fn from(counter: &SequenceCounter) -> Self {
        Self {
            key: counter.key.as_str().to_string(),
            range_start: counter.range_start,
            range_end: counter.range_end,
            next: counter.next,
            allow_outside_range: counter.allow_outside_range,
        }
    }
}
