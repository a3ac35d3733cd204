//! Status store: owns the current dataset and publishes snapshots.
//!
//! There is exactly one writer. Readers subscribe to a watch channel and
//! always see a whole snapshot, never a partially updated one.

mod snapshot;

pub use snapshot::*;

use crate::config::StatusConfig;
use crate::scheduler::Clock;
use crate::status::{aggregate, Site};

use std::sync::Arc;
use tokio::sync::watch;

/// Result of a completed fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(Vec<Site>),
    Failure,
}

/// Sequence number of a fetch request. Only the latest one may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Single-writer holder of the current dataset and overall state.
pub struct StatusStore {
    config: StatusConfig,
    clock: Arc<dyn Clock>,
    latest: RequestToken,
    tx: watch::Sender<Arc<Snapshot>>,
}

impl StatusStore {
    pub fn new(config: StatusConfig, clock: Arc<dyn Clock>) -> Self {
        let (tx, _) = watch::channel(Arc::new(Snapshot::loading(config.days)));
        Self {
            config,
            clock,
            latest: RequestToken(0),
            tx,
        }
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.tx.subscribe()
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.tx.borrow().clone()
    }

    /// Replace the dataset.
    ///
    /// `None` resets to loading and drops the current sites so nothing stale
    /// is shown while a refetch is in flight. A failure also drops them.
    /// Sites are expected to have passed `validate_sites`.
    pub fn replace(&mut self, outcome: Option<FetchOutcome>) {
        let days = self.config.days;
        let snapshot = match outcome {
            None => Snapshot::loading(days),
            Some(FetchOutcome::Failure) => Snapshot::failed(self.clock.wall(), days),
            Some(FetchOutcome::Success(sites)) => {
                let views: Vec<SiteView> = sites
                    .into_iter()
                    .map(|mut site| {
                        site.retain_recent(days);
                        SiteView::build(site, &self.config)
                    })
                    .collect();
                let (overview, state) = aggregate(views.iter().map(SiteView::status));
                Snapshot::loaded(state, overview, views, self.clock.wall(), days)
            }
        };

        tracing::debug!("Publishing snapshot in state {:?}", snapshot.overall_state);
        self.tx.send_replace(Arc::new(snapshot));
    }

    /// Reset to loading ahead of a refetch.
    pub fn reset(&mut self) {
        self.replace(None);
    }

    /// Issue a token for a new fetch, superseding any in flight.
    pub fn begin_request(&mut self) -> RequestToken {
        self.latest = RequestToken(self.latest.0 + 1);
        self.latest
    }

    /// Apply a fetch result if it belongs to the latest request.
    ///
    /// Returns `false` and leaves the store untouched for a stale token.
    pub fn complete(&mut self, token: RequestToken, outcome: FetchOutcome) -> bool {
        if token != self.latest {
            return false;
        }
        self.replace(Some(outcome));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualClock;
    use crate::status::fixtures::{day, healthy, site};
    use crate::status::{OverallState, SiteStatus};
    use std::time::Duration;

    fn store() -> (StatusStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        (StatusStore::new(StatusConfig::default(), clock.clone()), clock)
    }

    fn mixed_sites() -> Vec<Site> {
        vec![
            healthy("a", SiteStatus::Ok),
            healthy("b", SiteStatus::Down),
            healthy("c", SiteStatus::Unknown),
        ]
    }

    #[test]
    fn test_starts_loading() {
        let (store, _) = store();
        let snap = store.snapshot();
        assert_eq!(snap.overall_state, OverallState::Loading);
        assert!(snap.updated_at.is_none());
    }

    #[test]
    fn test_success_publishes_overview() {
        let (mut store, clock) = store();
        store.replace(Some(FetchOutcome::Success(mixed_sites())));

        let snap = store.snapshot();
        assert_eq!(snap.overall_state, OverallState::Error);
        let overview = snap.overview.unwrap();
        assert_eq!(overview.count, 3);
        assert_eq!(overview.ok_count, 1);
        assert_eq!(overview.down_count, 1);
        assert_eq!(overview.unknown_count, 1);
        assert_eq!(snap.updated_at, Some(clock.wall()));
        assert_eq!(snap.sites.len(), 3);
    }

    #[test]
    fn test_empty_dataset_is_normal() {
        let (mut store, _) = store();
        store.replace(Some(FetchOutcome::Success(vec![])));

        let snap = store.snapshot();
        assert_eq!(snap.overall_state, OverallState::Normal);
        assert_eq!(snap.overview.unwrap().count, 0);
    }

    #[test]
    fn test_failure_discards_dataset() {
        let (mut store, _) = store();
        store.replace(Some(FetchOutcome::Success(mixed_sites())));
        store.replace(Some(FetchOutcome::Failure));

        let snap = store.snapshot();
        assert_eq!(snap.overall_state, OverallState::Wrong);
        assert!(snap.sites.is_empty());
        assert!(snap.overview.is_none());
    }

    #[test]
    fn test_reset_shows_loading() {
        let (mut store, _) = store();
        store.replace(Some(FetchOutcome::Success(mixed_sites())));
        store.reset();

        let snap = store.snapshot();
        assert_eq!(snap.overall_state, OverallState::Loading);
        assert!(snap.sites.is_empty());
    }

    #[test]
    fn test_replace_is_idempotent() {
        let (mut store, clock) = store();
        store.replace(Some(FetchOutcome::Success(mixed_sites())));
        let first = store.snapshot();

        clock.advance(Duration::from_secs(5));
        store.replace(Some(FetchOutcome::Success(mixed_sites())));
        let second = store.snapshot();

        assert_eq!(first.overview, second.overview);
        assert_eq!(first.overall_state, second.overall_state);
        assert_eq!(first.sites, second.sites);
        assert_ne!(first.updated_at, second.updated_at);
    }

    #[test]
    fn test_history_window_applied() {
        let clock = Arc::new(ManualClock::new());
        let config = StatusConfig {
            days: 2,
            ..StatusConfig::default()
        };
        let mut store = StatusStore::new(config, clock);
        store.replace(Some(FetchOutcome::Success(vec![site(
            "a",
            SiteStatus::Ok,
            vec![
                day("2024-03-01", 0.0, 4, 86400),
                day("2024-03-02", 100.0, 0, 0),
                day("2024-03-03", 100.0, 0, 0),
            ],
        )])));

        let snap = store.snapshot();
        let view = &snap.sites[0];
        assert_eq!(view.site.daily.len(), 2);
        assert_eq!(view.average, 100.0);
        assert_eq!(view.total.times, 0);
    }

    #[test]
    fn test_stale_completion_ignored() {
        let (mut store, _) = store();
        let stale = store.begin_request();
        let fresh = store.begin_request();
        assert!(fresh > stale);

        assert!(store.complete(fresh, FetchOutcome::Success(mixed_sites())));
        assert!(!store.complete(stale, FetchOutcome::Failure));
        assert_eq!(store.snapshot().overall_state, OverallState::Error);
    }

    #[tokio::test]
    async fn test_subscribers_notified() {
        let (mut store, _) = store();
        let mut rx = store.subscribe();

        store.replace(Some(FetchOutcome::Success(vec![healthy("a", SiteStatus::Ok)])));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().overall_state, OverallState::Normal);
    }
}
