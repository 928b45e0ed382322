use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::normalize::normalize;
use crate::snapshot::DashboardSnapshot;
use crate::source::ReportSource;

/// Fetch lifecycle as observed by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Loading,
    Success,
    Failure(String),
}

/// Drives the fetch lifecycle: one network call per `load`/`retry`, no
/// automatic retries, no queuing. Each success builds a brand-new snapshot
/// that replaces the previous one.
pub struct Orchestrator<S: ReportSource> {
    source: S,
    phase: FetchPhase,
    snapshot: Option<DashboardSnapshot>,
    last_fetched: Option<DateTime<Utc>>,
}

impl<S: ReportSource> Orchestrator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            phase: FetchPhase::Idle,
            snapshot: None,
            last_fetched: None,
        }
    }

    pub fn phase(&self) -> &FetchPhase {
        &self.phase
    }

    /// Forces a phase so tests can reach the in-flight guard, which `&mut`
    /// exclusivity makes unreachable through the public API.
    #[cfg(test)]
    pub(crate) fn set_phase(&mut self, phase: FetchPhase) {
        self.phase = phase;
    }

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn last_fetched(&self) -> Option<DateTime<Utc>> {
        self.last_fetched
    }

    /// Issues exactly one request. A call while already `Loading` is
    /// dropped, not queued.
    pub async fn load(&mut self) {
        if self.phase == FetchPhase::Loading {
            return;
        }
        self.phase = FetchPhase::Loading;

        match self.source.fetch_report().await {
            Ok(raw) => {
                let snapshot = normalize(&raw);
                info!(
                    users = snapshot.user_activity.len(),
                    threats = snapshot.threat_analytics.total_threat_count,
                    "report loaded"
                );
                self.snapshot = Some(snapshot);
                self.last_fetched = Some(Utc::now());
                self.phase = FetchPhase::Success;
            }
            Err(err) => {
                warn!(error = %err, "report fetch failed");
                self.phase = FetchPhase::Failure(err.to_string());
            }
        }
    }

    /// Re-issues the request after a failure. No-op from any other phase.
    pub async fn retry(&mut self) {
        if !matches!(self.phase, FetchPhase::Failure(_)) {
            return;
        }
        self.load().await;
    }

    /// Drops the current snapshot and returns to `Idle`. Used when the
    /// session starts over with a new report.
    pub fn discard(&mut self) {
        self.snapshot = None;
        self.last_fetched = None;
        self.phase = FetchPhase::Idle;
    }
}
