//! Persisted document state.
//!
//! ```json
//! { "value": "Hi", "markers": [{ "className": "bold",
//!   "start": { "line": 0, "ch": 0 }, "end": { "line": 0, "ch": 2 } }], "blocks": [] }
//! ```

use serde::{Deserialize, Serialize};

use crate::editing::{Position, Range};
use crate::error::Result;

/// A named span: an inline style in `markers`, a line class in `blocks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub class_name: String,
    pub start: Position,
    pub end: Position,
}

impl Marker {
    pub fn new(class_name: impl Into<String>, start: impl Into<Position>, end: impl Into<Position>) -> Self {
        Self {
            class_name: class_name.into(),
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn range(&self) -> Range {
        Range::new(self.start, self.end)
    }
}

/// Plain text plus the spans layered over it. Never contains list sentinels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentState {
    pub value: String,
    #[serde(default)]
    pub markers: Vec<Marker>,
    #[serde(default)]
    pub blocks: Vec<Marker>,
}

impl DocumentState {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
