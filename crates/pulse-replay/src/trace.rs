//! JSON-lines input traces.
//!
//! One record per line:
//!
//! ```text
//! {"at": 100, "event": {"type": "scroll", "position": 180.0}}
//! {"at": 150, "event": {"type": "wheel", "delta_y": 120.0}}
//! {"at": 1600, "set_mode": "cozy"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Record times must not
//! decrease.

use std::fs;
use std::path::Path;

use pulse_friction::{InputEvent, Mode};
use serde::{Deserialize, Serialize};

use crate::error::ReplayError;

/// A single trace line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Time the record applies at (ms)
    pub at: u64,
    #[serde(flatten)]
    pub action: TraceAction,
}

/// What happens at a record's time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceAction {
    /// Deliver an input event.
    Event(InputEvent),
    /// The UI changed mode on its own (e.g. a manual toggle).
    SetMode(Mode),
}

#[cfg(test)]
impl TraceRecord {
    pub fn event(at: u64, event: InputEvent) -> Self {
        Self {
            at,
            action: TraceAction::Event(event),
        }
    }

    pub fn set_mode(at: u64, mode: Mode) -> Self {
        Self {
            at,
            action: TraceAction::SetMode(mode),
        }
    }
}

/// Parse a trace from its text.
pub fn parse_trace(text: &str) -> Result<Vec<TraceRecord>, ReplayError> {
    let mut records = Vec::new();
    let mut previous: Option<u64> = None;

    for (index, raw) in text.lines().enumerate() {
        let line = index.saturating_add(1);
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let record: TraceRecord = serde_json::from_str(trimmed)
            .map_err(|source| ReplayError::Parse { line, source })?;

        if let Some(previous) = previous
            && record.at < previous
        {
            return Err(ReplayError::OutOfOrder {
                line,
                at: record.at,
                previous,
            });
        }
        previous = Some(record.at);
        records.push(record);
    }

    Ok(records)
}

/// Read and parse a trace file.
pub fn read_trace_file(path: &Path) -> Result<Vec<TraceRecord>, ReplayError> {
    let text = fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_trace(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_friction::TouchTarget;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_mixed_records() -> TestResult {
        let text = r#"
# recorded on a phone
{"at": 100, "event": {"type": "scroll", "position": 180.0}}
{"at": 120, "event": {"type": "touch_start", "touches": 1, "y": 400.0, "target": "link"}}

{"at": 1600, "set_mode": "cozy"}
"#;
        let records = parse_trace(text)?;
        assert_eq!(records.len(), 3);
        assert_eq!(
            records.first(),
            Some(&TraceRecord::event(100, InputEvent::Scroll { position: 180.0 }))
        );
        assert_eq!(
            records.get(1).map(|r| &r.action),
            Some(&TraceAction::Event(InputEvent::TouchStart {
                touches: 1,
                y: 400.0,
                target: TouchTarget::Link,
            }))
        );
        assert_eq!(records.get(2), Some(&TraceRecord::set_mode(1_600, Mode::Cozy)));
        Ok(())
    }

    #[test]
    fn parse_reports_line_numbers() {
        let text = "{\"at\": 1, \"event\": {\"type\": \"touch_end\"}}\n{\"at\": 2, \"event\": {\"type\": \"bogus\"}}\n";
        assert!(matches!(
            parse_trace(text),
            Err(ReplayError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn parse_rejects_time_going_backwards() {
        let text = "{\"at\": 500, \"event\": {\"type\": \"touch_end\"}}\n{\"at\": 400, \"event\": {\"type\": \"touch_end\"}}\n";
        assert!(matches!(
            parse_trace(text),
            Err(ReplayError::OutOfOrder {
                line: 2,
                at: 400,
                previous: 500
            })
        ));
    }

    #[test]
    fn record_round_trips_through_json() -> TestResult {
        let record = TraceRecord::event(250, InputEvent::Wheel { delta_y: 40.0 });
        let json = serde_json::to_string(&record)?;
        assert_eq!(serde_json::from_str::<TraceRecord>(&json)?, record);
        Ok(())
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let result = read_trace_file(Path::new("/definitely/not/here.jsonl"));
        assert!(matches!(result, Err(ReplayError::Io { .. })));
    }
}
