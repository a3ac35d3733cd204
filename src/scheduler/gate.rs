//! Cooldown policy for refresh requests.

use crate::config::RefreshConfig;

use std::time::{Duration, Instant};
use thiserror::Error;

/// Refresh error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    #[error("refresh requested too soon, retry in {retry_in:?}")]
    TooSoon { retry_in: Duration },
    #[error("refresher is not running")]
    Closed,
}

/// What asked for a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOrigin {
    /// An explicit user action.
    User,
    /// The periodic timer.
    Periodic,
}

/// Enforces a minimum interval between accepted refreshes.
#[derive(Debug, Clone)]
pub struct RefreshGate {
    cooldown: Duration,
    gate_periodic: bool,
    last_trigger: Option<Instant>,
}

impl RefreshGate {
    pub fn new(cooldown: Duration, gate_periodic: bool) -> Self {
        Self {
            cooldown,
            gate_periodic,
            last_trigger: None,
        }
    }

    pub fn from_config(config: &RefreshConfig) -> Self {
        Self::new(config.cooldown, config.cooldown_applies_to_periodic)
    }

    /// Decide whether a refresh from `origin` may proceed at `now`.
    ///
    /// The last trigger time only moves on a gated, accepted request. Periodic
    /// requests bypass the gate entirely unless configured otherwise.
    pub fn admit(&mut self, origin: RefreshOrigin, now: Instant) -> Result<(), RefreshError> {
        if origin == RefreshOrigin::Periodic && !self.gate_periodic {
            return Ok(());
        }

        if let Some(last) = self.last_trigger {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.cooldown {
                return Err(RefreshError::TooSoon {
                    retry_in: self.cooldown - elapsed,
                });
            }
        }

        self.last_trigger = Some(now);
        Ok(())
    }
}
