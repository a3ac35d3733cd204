//! Scheduler module for periodic and user-triggered refreshes.
//!
//! The refresher task owns the store. Timer ticks, refresh commands and
//! fetch completions are all handled on that one task.

mod clock;
mod gate;

pub use clock::*;
pub use gate::*;

use crate::config::RefreshConfig;
use crate::source::{FetchError, Source};
use crate::status::Site;
use crate::store::{FetchOutcome, RequestToken, StatusStore};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Commands accepted by the refresher.
#[derive(Debug)]
pub enum RefreshCommand {
    /// A user asked for fresh data.
    Refresh {
        reply: oneshot::Sender<Result<(), RefreshError>>,
    },
}

/// Cloneable handle for sending commands to the refresher.
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    tx: mpsc::Sender<RefreshCommand>,
}

impl RefreshHandle {
    pub(crate) fn new(tx: mpsc::Sender<RefreshCommand>) -> Self {
        Self { tx }
    }

    /// Request a user-initiated refresh.
    ///
    /// Resolves once the cooldown decision is made, not when the fetch ends.
    pub async fn request_refresh(&self) -> Result<(), RefreshError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(RefreshCommand::Refresh { reply })
            .await
            .map_err(|_| RefreshError::Closed)?;
        rx.await.map_err(|_| RefreshError::Closed)?
    }
}

struct Completion {
    token: RequestToken,
    result: Result<Vec<Site>, FetchError>,
}

/// Drives the store from timer ticks, user commands and fetch results.
pub struct Refresher {
    store: StatusStore,
    source: Arc<Source>,
    gate: RefreshGate,
    clock: Arc<dyn Clock>,
    interval: Duration,
    commands: mpsc::Receiver<RefreshCommand>,
    completion_tx: mpsc::Sender<Completion>,
    completion_rx: mpsc::Receiver<Completion>,
}

impl Refresher {
    pub fn new(
        store: StatusStore,
        source: Source,
        config: &RefreshConfig,
        clock: Arc<dyn Clock>,
    ) -> (Self, RefreshHandle) {
        let (tx, commands) = mpsc::channel(16);
        let (completion_tx, completion_rx) = mpsc::channel(16);

        let refresher = Self {
            store,
            source: Arc::new(source),
            gate: RefreshGate::from_config(config),
            clock,
            interval: config.interval,
            commands,
            completion_tx,
            completion_rx,
        };

        (refresher, RefreshHandle::new(tx))
    }

    /// Spawn the refresher loop. The first tick fires immediately.
    pub fn start(self) -> JoinHandle<()> {
        tracing::info!(
            "Refreshing from {} every {:?}",
            self.source.describe(),
            self.interval
        );
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let _ = self.trigger(RefreshOrigin::Periodic);
                }
                command = self.commands.recv() => {
                    match command {
                        Some(RefreshCommand::Refresh { reply }) => {
                            let result = self.trigger(RefreshOrigin::User);
                            let _ = reply.send(result);
                        }
                        None => break,
                    }
                }
                Some(done) = self.completion_rx.recv() => {
                    self.finish(done);
                }
            }
        }

        tracing::info!("Refresher stopped");
    }

    fn trigger(&mut self, origin: RefreshOrigin) -> Result<(), RefreshError> {
        if let Err(e) = self.gate.admit(origin, self.clock.now()) {
            tracing::warn!("Refresh denied: {}", e);
            return Err(e);
        }

        if origin == RefreshOrigin::User {
            tracing::info!("User refresh accepted");
            self.store.reset();
        }

        let token = self.store.begin_request();
        let source = self.source.clone();
        let tx = self.completion_tx.clone();

        tokio::spawn(async move {
            let result = source.fetch().await;
            if tx.send(Completion { token, result }).await.is_err() {
                tracing::error!("Failed to deliver fetch result");
            }
        });

        Ok(())
    }

    fn finish(&mut self, done: Completion) {
        let outcome = match done.result {
            Ok(sites) => {
                tracing::info!("Fetched {} sites", sites.len());
                FetchOutcome::Success(sites)
            }
            Err(e) => {
                tracing::error!("Fetch failed: {}", e);
                FetchOutcome::Failure
            }
        };

        if self.store.complete(done.token, outcome) {
            tracing::info!("Overall state: {:?}", self.store.snapshot().overall_state);
        } else {
            tracing::debug!("Discarding stale fetch result {:?}", done.token);
        }
    }
}
