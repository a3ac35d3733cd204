//! Site and daily record types for the inbound dataset.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Inbound data that violates the record invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("site {site}: daily history is empty")]
    EmptyDaily { site: SiteId },
    #[error("site {site}: uptime {uptime} on {date} is outside 0..=100")]
    UptimeOutOfRange {
        site: SiteId,
        date: NaiveDate,
        uptime: f64,
    },
    #[error("site {site}: record for {date} does not follow {previous}")]
    OutOfOrder {
        site: SiteId,
        date: NaiveDate,
        previous: NaiveDate,
    },
    #[error("duplicate site id {0}")]
    DuplicateId(SiteId),
}

/// Site identifier. Upstream feeds send either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SiteId(pub String);

impl<'de> Deserialize<'de> for SiteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => SiteId(n.to_string()),
            Raw::Text(s) => SiteId(s),
        })
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SiteId {
    fn from(s: &str) -> Self {
        SiteId(s.to_string())
    }
}

/// Outcome of the most recent probe of a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    Ok,
    Down,
    Unknown,
}

impl SiteStatus {
    /// Label shown next to the site name.
    pub fn label(&self) -> &'static str {
        match self {
            SiteStatus::Ok => "Normal Access",
            SiteStatus::Unknown => "Unknown Status",
            SiteStatus::Down => "Cannot Access",
        }
    }

    /// Class of the site's cell: anything short of `ok` is an error.
    pub fn cell_class(&self) -> SiteClass {
        match self {
            SiteStatus::Ok => SiteClass::Normal,
            SiteStatus::Down | SiteStatus::Unknown => SiteClass::Error,
        }
    }

    /// Indicator shown beside the status label.
    pub fn indicator(&self) -> Indicator {
        match self {
            SiteStatus::Ok => Indicator::Normal,
            SiteStatus::Unknown => Indicator::Unknown,
            SiteStatus::Down => Indicator::Error,
        }
    }
}

/// Styling class for a whole site row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteClass {
    Normal,
    Error,
}

/// Status indicator next to a site's label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Normal,
    Unknown,
    Error,
}

/// Downtime events within a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownStats {
    pub times: u32,
    /// Total downtime in seconds.
    pub duration: u64,
}

/// Aggregated probe outcomes for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    /// Percentage of the day the site was reachable.
    pub uptime: f64,
    pub down: DownStats,
}

impl DailyRecord {
    /// A day with no uptime and no recorded failures carries no probe data.
    pub fn is_no_data(&self) -> bool {
        self.uptime <= 0.0 && self.down.times == 0
    }
}

/// A monitored web property and its daily history, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    pub url: String,
    pub status: SiteStatus,
    pub daily: Vec<DailyRecord>,
}

impl Site {
    /// Check the record invariants for a single site.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.daily.is_empty() {
            return Err(ValidationError::EmptyDaily {
                site: self.id.clone(),
            });
        }

        let mut previous: Option<NaiveDate> = None;
        for record in &self.daily {
            if !(0.0..=100.0).contains(&record.uptime) {
                return Err(ValidationError::UptimeOutOfRange {
                    site: self.id.clone(),
                    date: record.date,
                    uptime: record.uptime,
                });
            }
            if let Some(prev) = previous {
                if record.date <= prev {
                    return Err(ValidationError::OutOfOrder {
                        site: self.id.clone(),
                        date: record.date,
                        previous: prev,
                    });
                }
            }
            previous = Some(record.date);
        }

        Ok(())
    }

    /// Keep only the most recent `days` records.
    pub fn retain_recent(&mut self, days: usize) {
        if self.daily.len() > days {
            let excess = self.daily.len() - days;
            self.daily.drain(..excess);
        }
    }
}

/// Validate every site and reject duplicate ids.
pub fn validate_sites(sites: &[Site]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(sites.len());
    for site in sites {
        site.validate()?;
        if !seen.insert(&site.id) {
            return Err(ValidationError::DuplicateId(site.id.clone()));
        }
    }
    Ok(())
}
