//! HTTP request handlers.

use super::AppState;
use crate::scheduler::RefreshError;
use crate::status::{OverallState, SiteId};
use crate::store::{SiteView, Snapshot};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

/// Shown in place of the site list when the last fetch failed.
pub const FAILURE_MESSAGE: &str =
    "API limit exceeded or request error, please refresh and try again";

/// Shown when a user refresh hits the cooldown.
pub const TRY_AGAIN_LATER: &str = "Please try again later";

// ============================================================================
// API: Status
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo<'a> {
    pub site_name: &'a str,
    pub home_url: Option<&'a str>,
    pub show_links: bool,
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse<'a> {
    #[serde(flatten)]
    pub snapshot: &'a Snapshot,
    pub page: PageInfo<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<&'static str>,
}

pub async fn handle_status(State(state): State<AppState>) -> Response {
    let snapshot = state.snapshots.borrow().clone();
    let config = &state.config;

    let failure_message = match snapshot.overall_state {
        OverallState::Wrong => Some(FAILURE_MESSAGE),
        _ => None,
    };

    Json(StatusResponse {
        snapshot: &snapshot,
        page: PageInfo {
            site_name: &config.page.site_name,
            home_url: config.page.home_url.as_deref(),
            show_links: config.page.show_links,
            refresh_interval_secs: config.refresh.interval.as_secs(),
        },
        failure_message,
    })
    .into_response()
}

// ============================================================================
// API: Refresh
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_in_secs: Option<u64>,
}

pub async fn handle_refresh(State(state): State<AppState>) -> Response {
    match state.refresher.request_refresh().await {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(RefreshResponse {
                message: "Refreshing",
                retry_in_secs: None,
            }),
        )
            .into_response(),
        Err(RefreshError::TooSoon { retry_in }) => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(RefreshResponse {
                message: TRY_AGAIN_LATER,
                // Round up so clients never retry a moment too early.
                retry_in_secs: Some(retry_in.as_secs() + u64::from(retry_in.subsec_nanos() > 0)),
            }),
        )
            .into_response(),
        Err(e @ RefreshError::Closed) => {
            tracing::error!("Refresh unavailable: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response()
        }
    }
}

// ============================================================================
// API: Site detail
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ChartPoint {
    /// Calendar day, `YYYY-MM-DD`.
    pub time: String,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct SiteDetail<'a> {
    #[serde(flatten)]
    pub site: &'a SiteView,
    pub chart: Vec<ChartPoint>,
}

pub async fn handle_site_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let snapshot = state.snapshots.borrow().clone();

    let view = match snapshot.site(&SiteId(id)) {
        Some(v) => v,
        None => return (StatusCode::NOT_FOUND, "Site not found").into_response(),
    };

    let chart = view
        .site
        .daily
        .iter()
        .map(|record| ChartPoint {
            time: record.date.format("%Y-%m-%d").to_string(),
            value: record.uptime,
        })
        .collect();

    Json(SiteDetail { site: view, chart }).into_response()
}

pub async fn handle_health() -> impl IntoResponse {
    "ok"
}
