//! Per-day timeline cell classification.

use super::format::{format_duration, format_percent};
use super::models::DailyRecord;

use serde::Serialize;

/// Tooltip text for a day without probe data.
pub const NO_DATA_TEXT: &str = "No Data";

/// Visual state of one timeline cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellStatus {
    Normal,
    Error,
    #[serde(rename = "none")]
    NoData,
}

/// Tooltip payload for a timeline cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedDay {
    pub cell_status: CellStatus,
    pub tooltip: Tooltip,
}

/// Classify a daily record into a timeline cell.
///
/// Rules apply in order: a full day up is `Normal`, a day with no uptime and
/// no failures has no data, anything else is an `Error` day.
pub fn classify(record: &DailyRecord) -> ClassifiedDay {
    let (cell_status, text) = if record.uptime >= 100.0 {
        (
            CellStatus::Normal,
            format!("Uptime {}", format_percent(record.uptime)),
        )
    } else if record.is_no_data() {
        (CellStatus::NoData, NO_DATA_TEXT.to_string())
    } else {
        (
            CellStatus::Error,
            format!(
                "Failures {}, Total {}, Uptime {}",
                record.down.times,
                format_duration(record.down.duration),
                format_percent(record.uptime)
            ),
        )
    };

    ClassifiedDay {
        cell_status,
        tooltip: Tooltip {
            date: record.date.format("%Y-%m-%d").to_string(),
            text,
        },
    }
}
