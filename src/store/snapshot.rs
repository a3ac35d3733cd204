//! Immutable views published to readers.

use crate::config::StatusConfig;
use crate::status::{
    classify, summarize, ClassifiedDay, DownStats, Indicator, Narrative, OverallState, Overview,
    Site, SiteClass, SiteId, SiteStatus,
};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// A site with every value the renderer needs precomputed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteView {
    #[serde(flatten)]
    pub site: Site,
    pub status_label: &'static str,
    pub cell_class: SiteClass,
    pub indicator: Indicator,
    pub average: f64,
    pub total: DownStats,
    pub daily_classified: Vec<ClassifiedDay>,
    pub note: String,
    pub narrative: Narrative,
    /// Date of the most recent record.
    pub last_date: Option<NaiveDate>,
}

impl SiteView {
    pub fn build(site: Site, config: &StatusConfig) -> Self {
        let summary = summarize(&site);
        let daily_classified = site.daily.iter().map(classify).collect();

        Self {
            status_label: site.status.label(),
            cell_class: site.status.cell_class(),
            indicator: site.status.indicator(),
            average: summary.average,
            total: summary.total,
            daily_classified,
            note: summary.note(config.days),
            narrative: summary.narrative(config.warning_threshold),
            last_date: site.daily.last().map(|r| r.date),
            site,
        }
    }

    pub fn status(&self) -> SiteStatus {
        self.site.status
    }
}

/// Everything the renderer reads, published as one value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub overall_state: OverallState,
    pub headline: &'static str,
    pub hint: Option<&'static str>,
    /// Present only for a successfully loaded dataset.
    pub overview: Option<Overview>,
    pub sites: Vec<SiteView>,
    pub updated_at: Option<DateTime<Utc>>,
    pub days: usize,
}

impl Snapshot {
    fn empty(state: OverallState, updated_at: Option<DateTime<Utc>>, days: usize) -> Self {
        Self {
            overall_state: state,
            headline: state.headline(),
            hint: state.hint(),
            overview: None,
            sites: Vec::new(),
            updated_at,
            days,
        }
    }

    pub fn loading(days: usize) -> Self {
        Self::empty(OverallState::Loading, None, days)
    }

    pub fn failed(at: DateTime<Utc>, days: usize) -> Self {
        Self::empty(OverallState::Wrong, Some(at), days)
    }

    pub fn loaded(
        state: OverallState,
        overview: Overview,
        sites: Vec<SiteView>,
        at: DateTime<Utc>,
        days: usize,
    ) -> Self {
        Self {
            overview: Some(overview),
            sites,
            ..Self::empty(state, Some(at), days)
        }
    }

    /// Look up a site by id.
    pub fn site(&self, id: &SiteId) -> Option<&SiteView> {
        self.sites.iter().find(|view| &view.site.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::fixtures::{day, site};
    use crate::status::{CellStatus, NarrativeLevel};

    #[test]
    fn test_site_view_derives_everything() {
        let config = StatusConfig {
            warning_threshold: 70.0,
            days: 3,
        };
        let view = SiteView::build(
            site(
                "a",
                SiteStatus::Down,
                vec![
                    day("2024-03-01", 100.0, 0, 0),
                    day("2024-03-02", 45.0, 3, 5400),
                    day("2024-03-03", 0.0, 0, 0),
                ],
            ),
            &config,
        );

        assert!((view.average - 48.333333).abs() < 1e-4);
        assert_eq!(view.total.times, 3);
        assert_eq!(view.status_label, "Cannot Access");
        assert_eq!(view.narrative.level, NarrativeLevel::Error);
        assert_eq!(
            view.daily_classified
                .iter()
                .map(|d| d.cell_status)
                .collect::<Vec<_>>(),
            vec![CellStatus::Normal, CellStatus::Error, CellStatus::NoData]
        );
        assert_eq!(view.last_date, Some("2024-03-03".parse().unwrap()));
        assert!(view.note.starts_with("In the last 3 days, there were 3 failures"));
    }

    #[test]
    fn test_site_view_serializes_flat() {
        let view = SiteView::build(
            site("a", SiteStatus::Ok, vec![day("2024-03-01", 100.0, 0, 0)]),
            &StatusConfig::default(),
        );
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["id"], "a");
        assert_eq!(json["status"], "ok");
        assert_eq!(json["average"], 100.0);
        assert_eq!(json["total"]["times"], 0);
        assert_eq!(json["dailyClassified"][0]["cellStatus"], "normal");
        assert_eq!(json["daily"][0]["date"], "2024-03-01");
    }

    #[test]
    fn test_site_view_class_and_indicator() {
        let cases = [
            (SiteStatus::Ok, "normal", "normal"),
            (SiteStatus::Down, "error", "error"),
            (SiteStatus::Unknown, "error", "unknown"),
        ];

        for (status, cell_class, indicator) in cases {
            let view = SiteView::build(
                site("a", status, vec![day("2024-03-01", 100.0, 0, 0)]),
                &StatusConfig::default(),
            );
            let json = serde_json::to_value(&view).unwrap();

            assert_eq!(json["cellClass"], cell_class, "{:?}", status);
            assert_eq!(json["indicator"], indicator, "{:?}", status);
        }
    }

    #[test]
    fn test_loading_snapshot() {
        let snap = Snapshot::loading(60);
        assert_eq!(snap.overall_state, OverallState::Loading);
        assert_eq!(snap.headline, "Loading site status");
        assert!(snap.overview.is_none());
        assert!(snap.sites.is_empty());
    }
}
