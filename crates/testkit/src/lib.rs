#![warn(missing_docs)]
//! Headless testing surfaces: interaction event logs and scene fixtures.

mod fixtures;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use vrinteract_core::SimTick;

pub use fixtures::*;

/// First line of every event log, describing the session.
#[derive(Debug, Serialize)]
pub struct SessionHeader {
    /// Wall-clock start of the session.
    pub started_at: DateTime<Utc>,
    /// Ticks per simulated second.
    pub tick_rate: f32,
    /// Free-form label (config path, test name).
    pub label: String,
}

impl SessionHeader {
    /// Header stamped with the current time.
    pub fn now(tick_rate: f32, label: impl Into<String>) -> Self {
        Self {
            started_at: Utc::now(),
            tick_rate,
            label: label.into(),
        }
    }
}

/// One interaction event captured during a headless session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    /// Tick when the event occurred.
    pub tick: SimTick,
    /// Event kind (`state`, `selected`, `countdown`, ...).
    pub kind: String,
    /// Element or subsystem the event concerns.
    pub subject: String,
    /// Free-form detail.
    pub detail: String,
}

impl EventRecord {
    /// Build a record.
    pub fn new(
        tick: SimTick,
        kind: impl Into<String>,
        subject: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            tick,
            kind: kind.into(),
            subject: subject.into(),
            detail: detail.into(),
        }
    }
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    writer: BufWriter<File>,
    lines: usize,
}

impl JsonlSink {
    /// Create a sink at `path`, creating parent directories if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
            lines: 0,
        })
    }

    /// Append any serializable value as one line.
    pub fn write<T: Serialize>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer(&mut self.writer, value)?;
        self.writer.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }

    /// Lines written so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Flush buffered lines to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl Drop for JsonlSink {
    fn drop(&mut self) {
        if let Err(err) = self.writer.flush() {
            tracing::warn!(%err, "failed to flush event log");
        }
    }
}

/// In-memory event collector for assertions.
#[derive(Debug, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event.
    pub fn push(&mut self, record: EventRecord) {
        self.records.push(record);
    }

    /// All records in arrival order.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Records of a given kind.
    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a EventRecord> + 'a {
        self.records.iter().filter(move |r| r.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn jsonl_sink_writes_one_line_per_record() {
        let path = std::env::temp_dir().join(format!(
            "vrinteract-events-{}.jsonl",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        {
            let mut sink = JsonlSink::create(&path).expect("sink create");
            sink.write(&SessionHeader::now(30.0, "unit"))
                .expect("header write");
            sink.write(&EventRecord::new(SimTick(3), "state", "next", "hovered"))
                .expect("record write");
            assert_eq!(sink.lines(), 2);
        }
        let contents = fs::read_to_string(&path).expect("file readable");
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("started_at"));
        assert!(lines[1].contains("\"subject\":\"next\""));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn event_log_filters_by_kind() {
        let mut log = EventLog::new();
        log.push(EventRecord::new(SimTick(1), "state", "next", "idle"));
        log.push(EventRecord::new(SimTick(2), "selected", "next", ""));
        assert_eq!(log.of_kind("selected").count(), 1);
        assert_eq!(log.records().len(), 2);
    }
}
