#![warn(missing_docs)]
//! Deterministic testing surfaces (event recording, JSONL logs, scripted pointer sessions).

mod recorder;
mod script;

use anyhow::Result;
use raypick_scene::NodeId;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub use recorder::*;
pub use script::*;

/// One recorded interaction event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the recording, starting at zero
    pub seq: u64,
    /// Node of the handler (or selected member, for group events)
    pub node: NodeId,
    /// Event label, e.g. `click` or `group_select`
    pub kind: String,
    /// Selection carried by `select` events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_selected: Option<bool>,
}

/// A sink that writes newline-delimited JSON to disk
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Append an event to the log
    pub fn write(&mut self, event: &EventRecord) -> Result<()> {
        let line = serde_json::to_string(event)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }

    /// Append every event in order
    pub fn write_all(&mut self, events: &[EventRecord]) -> Result<()> {
        for event in events {
            self.write(event)?;
        }
        Ok(())
    }
}

/// Read a JSONL event log back
pub fn read_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<EventRecord>> {
    fs::read_to_string(path)?
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| Ok(serde_json::from_str(line)?))
        .collect()
}
