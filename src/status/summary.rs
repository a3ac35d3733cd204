//! Per-site aggregate statistics and detail-view narrative.

use super::format::{format_duration, format_percent};
use super::models::{DownStats, Site, SiteStatus};

use serde::Serialize;

/// Average uptime at or above which a failing site is treated as a
/// transient issue rather than a sustained one.
pub const DEFAULT_WARNING_THRESHOLD: f64 = 70.0;

/// Aggregate statistics over a site's daily history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SiteSummary {
    /// Mean of the daily uptime values, unrounded.
    pub average: f64,
    pub total: DownStats,
    /// The current probe outcome, independent of history.
    pub status: SiteStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeLevel {
    Success,
    Warning,
    Error,
}

/// Detail-view message describing the site's condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Narrative {
    pub level: NarrativeLevel,
    pub message: &'static str,
}

/// Compute average uptime and downtime totals for a site.
///
/// No-data days count as zero uptime. An empty history yields an average of 0.
pub fn summarize(site: &Site) -> SiteSummary {
    let total = site
        .daily
        .iter()
        .fold(DownStats::default(), |acc, record| DownStats {
            times: acc.times.saturating_add(record.down.times),
            duration: acc.duration.saturating_add(record.down.duration),
        });

    let average = if site.daily.is_empty() {
        0.0
    } else {
        site.daily.iter().map(|r| r.uptime).sum::<f64>() / site.daily.len() as f64
    };

    SiteSummary {
        average,
        total,
        status: site.status,
    }
}

impl SiteSummary {
    /// Pick the detail-view message for this site.
    pub fn narrative(&self, warning_threshold: f64) -> Narrative {
        match self.status {
            SiteStatus::Ok => Narrative {
                level: NarrativeLevel::Success,
                message: "The site is running normally, keep up the good work!",
            },
            SiteStatus::Down | SiteStatus::Unknown if self.average >= warning_threshold => {
                Narrative {
                    level: NarrativeLevel::Warning,
                    message: "The site is currently experiencing issues, please check the site status",
                }
            }
            SiteStatus::Down | SiteStatus::Unknown => Narrative {
                level: NarrativeLevel::Error,
                message: "The site is experiencing sustained issues, please check immediately or remove it from monitoring",
            },
        }
    }

    /// One-line summary under the timeline.
    pub fn note(&self, days: usize) -> String {
        if self.total.times > 0 {
            format!(
                "In the last {} days, there were {} failures totaling {}. Average uptime {}",
                days,
                self.total.times,
                format_duration(self.total.duration),
                format_percent(self.average)
            )
        } else {
            format!(
                "In the last {} days, uptime was {}",
                days,
                format_percent(self.average)
            )
        }
    }
}
