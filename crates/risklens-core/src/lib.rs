pub mod config;
pub mod fetch;
pub mod normalize;
pub mod projections;
pub mod session;
pub mod snapshot;
pub mod source;

#[cfg(test)]
mod projections_tests;
#[cfg(test)]
mod session_tests;

pub use config::FetchConfig;
pub use fetch::{FetchPhase, Orchestrator};
pub use normalize::normalize;
pub use session::{Session, ViewState};
pub use snapshot::{DashboardSnapshot, ModelPerformance, ThreatAnalytics, UserRecord};
pub use source::{FetchError, HttpReportSource, ReportSource};
