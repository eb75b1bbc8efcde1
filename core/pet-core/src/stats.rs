//! Daily usage statistics derived from the `events.jsonl` log.
//!
//! Lines that do not decode, or carry no timestamp, are skipped.

use chrono::{Local, NaiveDate, TimeZone};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PetError, Result};
use crate::event::ActivityEvent;

const SECS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStats {
    pub total_tool_calls: usize,
    pub bash_count: usize,
    pub edit_count: usize,
    pub read_count: usize,
    pub active_duration_minutes: u64,
    pub error_count: usize,
    /// `yyyy-MM-dd`
    pub date: String,
}

/// Computes statistics for `day` (a calendar day in `tz`) from event-log content.
pub fn compute_day_stats<Tz: TimeZone>(content: &str, day: NaiveDate, tz: &Tz) -> DayStats {
    let mut stats = DayStats {
        date: day.format("%Y-%m-%d").to_string(),
        ..DayStats::default()
    };

    let Some(start) = day
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| tz.from_local_datetime(&midnight).earliest())
        .map(|midnight| midnight.timestamp() as f64)
    else {
        return stats;
    };
    let end = start + SECS_PER_DAY;

    let mut first: Option<f64> = None;
    let mut last: Option<f64> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Ok(event) = serde_json::from_str::<ActivityEvent>(line) else {
            continue;
        };
        let Some(timestamp) = event.timestamp else {
            continue;
        };
        if timestamp < start || timestamp >= end {
            continue;
        }

        stats.total_tool_calls += 1;
        first = Some(first.map_or(timestamp, |value| value.min(timestamp)));
        last = Some(last.map_or(timestamp, |value| value.max(timestamp)));

        let tool = event.tool.as_deref().unwrap_or_default().to_lowercase();
        if tool.contains("bash") {
            stats.bash_count += 1;
        }
        if tool.contains("edit") || tool.contains("write") {
            stats.edit_count += 1;
        }
        if tool.contains("read") {
            stats.read_count += 1;
        }
        if event.kind.to_lowercase().contains("error") {
            stats.error_count += 1;
        }
    }

    if let (Some(first), Some(last)) = (first, last) {
        if last > first {
            stats.active_duration_minutes = ((last - first) / 60.0) as u64;
        }
    }

    stats
}

/// Statistics for today (local time). A missing log yields zeroed stats.
pub fn today_stats(event_log: &Path) -> Result<DayStats> {
    let content = match fs::read_to_string(event_log) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(err) => return Err(PetError::io("reading event log", err)),
    };
    Ok(compute_day_stats(&content, Local::now().date_naive(), &Local))
}
