use crate::domain::Status;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, NaiveDateTime, Utc};
use core::str::FromStr;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;

const LOG_TARGET: &str = "   history";

/// Number of most recent measurements kept when reading a history file.
pub const DEFAULT_RECENT_HISTORY: usize = 250;

/// Past measurements of the metrics in a report.
pub trait History: core::fmt::Debug {
    /// When the metric first got the status it currently has.
    ///
    /// Returns `now` when the last recorded status differs from `status` or was not recorded.
    fn status_start_date(&self, stable_id: &str, status: Status, now: DateTime<Utc>) -> DateTime<Utc>;

    /// The most recent values of the metric, oldest first.
    ///
    /// Records are looked up by stable id, falling back to the id as shown in the report.
    fn recent_history(&self, stable_id: &str, id_string: &str) -> Vec<f64>;
}

/// The history of a project without recorded measurements.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl History for NoHistory {
    fn status_start_date(&self, _stable_id: &str, _status: Status, _now: DateTime<Utc>) -> DateTime<Utc> {
        DateTime::<Utc>::MIN_UTC
    }

    fn recent_history(&self, _stable_id: &str, _id_string: &str) -> Vec<f64> {
        Vec::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    value: f64,
    status: Option<(String, DateTime<Utc>)>,
}

type Record = HashMap<String, Entry>;

/// A history read from a file with one JSON object per line.
///
/// Each line maps metric ids to either a bare value or a `[value, status, "YYYY-MM-DD HH:MM:SS"]`
/// triple, where the timestamp is the moment the metric first got that status. Lines that cannot
/// be parsed are skipped.
#[derive(Debug, Clone)]
pub struct FileHistory {
    path: Utf8PathBuf,
    records: Vec<Record>,
}

impl FileHistory {
    /// Read the most recent `recent` records from the file.
    ///
    /// A file that cannot be read yields an empty history.
    #[must_use]
    pub fn load(path: impl AsRef<Utf8Path>, recent: usize) -> Self {
        let path = path.as_ref();
        let text = fs::read_to_string(path).unwrap_or_else(|e| {
            log::warn!(target: LOG_TARGET, "Could not open history file '{path}': {e}");
            String::new()
        });

        let mut records: Vec<Record> = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(index, line)| match parse_record(line) {
                Some(record) => Some(record),
                None => {
                    log::warn!(target: LOG_TARGET, "Skipping malformed line {} in '{path}'", index + 1);
                    None
                }
            })
            .collect();

        let skip = records.len().saturating_sub(recent);
        let _ = records.drain(..skip);

        log::info!(target: LOG_TARGET, "Read {} records from '{path}'", records.len());

        Self {
            path: path.to_owned(),
            records,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn entry<'a>(record: &'a Record, stable_id: &str, id_string: &str) -> Option<&'a Entry> {
        record.get(stable_id).or_else(|| record.get(id_string))
    }
}

impl History for FileHistory {
    fn status_start_date(&self, stable_id: &str, status: Status, now: DateTime<Utc>) -> DateTime<Utc> {
        let last_status = self
            .records
            .last()
            .and_then(|record| record.get(stable_id))
            .and_then(|entry| entry.status.as_ref());

        match last_status {
            Some((last_status, since)) if *last_status == status.to_string() => *since,
            _ => now,
        }
    }

    fn recent_history(&self, stable_id: &str, id_string: &str) -> Vec<f64> {
        self.records
            .iter()
            .filter_map(|record| Self::entry(record, stable_id, id_string))
            .map(|entry| entry.value)
            .collect()
    }
}

fn parse_record(line: &str) -> Option<Record> {
    let object: serde_json::Map<String, Value> = serde_json::from_str(line).ok()?;
    Some(
        object
            .into_iter()
            .filter_map(|(id, value)| parse_entry(&value).map(|entry| (id, entry)))
            .collect(),
    )
}

fn parse_entry(value: &Value) -> Option<Entry> {
    match value {
        Value::Number(number) => Some(Entry {
            value: number.as_f64()?,
            status: None,
        }),
        Value::Array(items) => {
            let value = items.first()?.as_f64()?;
            let status = match (items.get(1).and_then(Value::as_str), items.get(2).and_then(Value::as_str)) {
                (Some(status), Some(timestamp)) => Some((status.to_string(), parse_timestamp(timestamp)?)),
                _ => None,
            };
            Some(Entry { value, status })
        }
        _ => None,
    }
}

fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    let format = if timestamp.contains('.') {
        "%Y-%m-%d %H:%M:%S%.f"
    } else {
        "%Y-%m-%d %H:%M:%S"
    };

    NaiveDateTime::parse_from_str(timestamp, format)
        .ok()
        .map(|naive| naive.and_utc())
}

impl FromStr for FileHistory {
    type Err = core::convert::Infallible;

    /// Build a history from the text of a history file, keeping every record.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            path: Utf8PathBuf::new(),
            records: text.lines().filter_map(parse_record).collect(),
        })
    }
}
