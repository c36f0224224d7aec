//! Line-oriented aggregation of structured preflight output.

use std::collections::BTreeMap;
use std::io::BufRead;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::entry::{ErrorRecord, LogEntry, LogLevel, ResourceResult};
use crate::error::LogResult;
use crate::patterns::{clean_message, match_preflight_error_count, match_resource_outcome};
use crate::summary::Summary;

const UTF8_BOM: char = '\u{feff}';

/// Non-empty string value of `key`, if present.
fn string_field(record: &mut Map<String, Value>, key: &str) -> Option<String> {
    match record.remove(key)? {
        Value::String(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

/// Build an entry from one decoded record. Extra keys are ignored and a
/// repeated key keeps its last value.
fn entry_from_record(mut record: Map<String, Value>) -> Option<LogEntry> {
    let level = string_field(&mut record, "level")?;
    let message = string_field(&mut record, "msg")?;
    let timestamp = string_field(&mut record, "time")?;
    Some(LogEntry::new(level, message, timestamp))
}

/// Stateful aggregator over newline-delimited JSON log records.
///
/// Lines that are not valid records are skipped, so one bad line never stops
/// processing of the ones after it. State accumulates across calls until
/// [`LogAggregator::reset`].
#[derive(Debug, Default, Clone)]
pub struct LogAggregator {
    entries: Vec<LogEntry>,
    errors: Vec<ErrorRecord>,
    resource_results: Vec<ResourceResult>,
}

impl LogAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a single line. Returns `true` if it was a complete record.
    pub fn parse_line(&mut self, line: &str) -> bool {
        match Self::decode(line) {
            Some(entry) => {
                self.record(entry);
                true
            }
            None => false,
        }
    }

    /// Parse every line of `output`, returning the entries recognized by this call.
    pub fn parse_output(&mut self, output: &str) -> Vec<LogEntry> {
        let mut parsed = Vec::new();
        for line in output.split('\n') {
            if let Some(entry) = Self::decode(line) {
                parsed.push(entry.clone());
                self.record(entry);
            }
        }
        debug!("Parsed {} entries from output chunk", parsed.len());
        parsed
    }

    /// Read lines from `reader` until EOF, returning how many were recognized.
    ///
    /// Lines that are not valid UTF-8 are skipped like any other noise.
    pub fn ingest_reader<R: BufRead>(&mut self, reader: R) -> LogResult<usize> {
        let mut recognized = 0;
        for line in reader.split(b'\n') {
            let line = line?;
            match std::str::from_utf8(&line) {
                Ok(text) if self.parse_line(text) => recognized += 1,
                Ok(_) => {}
                Err(_) => trace!("Skipping non UTF-8 line"),
            }
        }
        Ok(recognized)
    }

    /// Current summary. Pure view, no side effects.
    pub fn summary(&self) -> Summary {
        Summary::from_parts(self.errors.clone(), self.resource_results.clone())
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.clone()
    }

    pub fn errors(&self) -> Vec<ErrorRecord> {
        self.errors.clone()
    }

    pub fn resource_results(&self) -> Vec<ResourceResult> {
        self.resource_results.clone()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of recognized entries per level.
    pub fn level_counts(&self) -> BTreeMap<LogLevel, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.level.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Clear all state so the aggregator can be reused for another run.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.errors.clear();
        self.resource_results.clear();
    }

    fn decode(line: &str) -> Option<LogEntry> {
        let line = line.trim().trim_start_matches(UTF8_BOM);
        if !line.starts_with('{') {
            return None;
        }
        match serde_json::from_str::<Map<String, Value>>(line) {
            Ok(record) => entry_from_record(record),
            Err(e) => {
                trace!("Skipping unparseable line: {}", e);
                None
            }
        }
    }

    fn record(&mut self, entry: LogEntry) {
        self.classify(&entry);
        self.entries.push(entry);
    }

    fn classify(&mut self, entry: &LogEntry) {
        if entry.level.is_error() {
            self.errors.push(ErrorRecord::from_entry(entry));
            return;
        }

        let cleaned = clean_message(&entry.message);

        if let Some((resource, status)) = match_resource_outcome(&cleaned) {
            debug!("Resource {}: {}", resource, status);
            self.resource_results.push(ResourceResult::new(resource, status));
            return;
        }

        // Informational only; the error collection is the source of truth.
        if let Some(count) = match_preflight_error_count(&cleaned) {
            debug!("Tool reported {} preflight errors", count);
        }
    }
}
