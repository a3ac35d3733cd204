//! Process-wide counts and overall classification.

use super::models::SiteStatus;

use serde::Serialize;

/// Site counts by current status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub count: usize,
    pub ok_count: usize,
    pub down_count: usize,
    pub unknown_count: usize,
}

/// Headline state of the whole board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OverallState {
    /// No dataset yet, or a refresh is in flight.
    Loading,
    /// Every site is up.
    Normal,
    /// Some sites are down or unknown.
    Error,
    /// No site is up.
    AllError,
    /// The last fetch failed.
    Wrong,
}

impl OverallState {
    pub fn headline(&self) -> &'static str {
        match self {
            OverallState::Loading => "Loading site status",
            OverallState::Normal => "All systems operational",
            OverallState::Error => "Partial outage",
            OverallState::AllError => "Major outage",
            OverallState::Wrong => "Data request failed",
        }
    }

    /// Secondary line under the headline, if the state has one.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            OverallState::Loading => Some("Data is loading..."),
            OverallState::Wrong => {
                Some("This may be a temporary issue, please refresh and try again")
            }
            OverallState::Normal | OverallState::Error | OverallState::AllError => None,
        }
    }
}

impl Overview {
    /// Count statuses.
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = SiteStatus>,
    {
        statuses
            .into_iter()
            .fold(Overview::default(), |mut acc, status| {
                acc.count += 1;
                match status {
                    SiteStatus::Ok => acc.ok_count += 1,
                    SiteStatus::Down => acc.down_count += 1,
                    SiteStatus::Unknown => acc.unknown_count += 1,
                }
                acc
            })
    }

    /// Classify a successfully loaded dataset.
    pub fn state(&self) -> OverallState {
        if self.count == 0 {
            // Nothing to fail.
            return OverallState::Normal;
        }
        if self.down_count == 0 && self.unknown_count == 0 {
            OverallState::Normal
        } else if self.ok_count == 0 {
            OverallState::AllError
        } else {
            OverallState::Error
        }
    }
}

/// Count sites by status and derive the overall state.
pub fn aggregate<I>(statuses: I) -> (Overview, OverallState)
where
    I: IntoIterator<Item = SiteStatus>,
{
    let overview = Overview::from_statuses(statuses);
    (overview, overview.state())
}
