use chrono::{DateTime, Utc};
use tracing::debug;

use crate::fetch::{FetchPhase, Orchestrator};
use crate::snapshot::{DashboardSnapshot, UserRecord};
use crate::source::ReportSource;

/// Navigation state. Carrying the selected id inside the variant makes
/// "selected if and only if in detail view" hold by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Overview,
    UserDetail { user_id: String },
}

/// Owns the snapshot and the navigation state for one dashboard session.
/// This is the only surface through which either may change.
pub struct Session<S: ReportSource> {
    orchestrator: Orchestrator<S>,
    view: ViewState,
}

impl<S: ReportSource> Session<S> {
    pub fn new(source: S) -> Self {
        Self {
            orchestrator: Orchestrator::new(source),
            view: ViewState::Overview,
        }
    }

    pub fn phase(&self) -> &FetchPhase {
        self.orchestrator.phase()
    }

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.orchestrator.snapshot()
    }

    pub fn last_fetched(&self) -> Option<DateTime<Utc>> {
        self.orchestrator.last_fetched()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// The record behind the current drill-down, if any.
    pub fn selected_user(&self) -> Option<&UserRecord> {
        let ViewState::UserDetail { user_id } = &self.view else {
            return None;
        };
        self.snapshot()?
            .user_activity
            .iter()
            .find(|record| &record.user_id == user_id)
    }

    pub async fn load(&mut self) {
        self.orchestrator.load().await;
    }

    pub async fn retry(&mut self) {
        self.orchestrator.retry().await;
    }

    /// Drills down into a user. Valid from the overview, and only for an id
    /// present in the current snapshot; anything else is a no-op so the
    /// machine can never enter an unrenderable detail view.
    pub fn select_user(&mut self, user_id: &str) {
        if self.view != ViewState::Overview {
            return;
        }
        let known = self
            .snapshot()
            .map(|snapshot| {
                snapshot
                    .user_activity
                    .iter()
                    .any(|record| record.user_id == user_id)
            })
            .unwrap_or(false);
        if !known {
            debug!(user_id, "ignoring selection of unknown user");
            return;
        }
        self.view = ViewState::UserDetail {
            user_id: user_id.to_string(),
        };
    }

    /// Leaves the drill-down. No-op when already on the overview.
    pub fn back_to_overview(&mut self) {
        self.view = ViewState::Overview;
    }

    /// Starts over: clears the selection and discards the snapshot.
    pub fn new_report(&mut self) {
        self.view = ViewState::Overview;
        self.orchestrator.discard();
    }
}
