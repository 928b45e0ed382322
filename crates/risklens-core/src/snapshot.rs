use serde::{Deserialize, Serialize};

/// Canonical representation of one fetched analytics report. Every field is
/// always populated; missing or malshaped payload data is defaulted by the
/// normalizer before a snapshot is ever constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub model_performance: ModelPerformance,
    pub threat_analytics: ThreatAnalytics,
    pub user_activity: Vec<UserRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPerformance {
    pub accuracy: String,
    pub status: String,
}

impl Default for ModelPerformance {
    fn default() -> Self {
        Self {
            accuracy: "0.00%".to_string(),
            status: "Offline".to_string(),
        }
    }
}

/// Aggregate threat figures. The pair vectors keep the server's key order:
/// for `top_threat_subclasses` that order is the rank order, and the first
/// entry is the primary threat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatAnalytics {
    pub total_threat_count: u64,
    pub threats_per_day: Vec<(String, u64)>,
    pub top_threat_subclasses: Vec<(String, u64)>,
    pub risk_percentage_by_event: Vec<(String, String)>,
}

/// One high-risk user. `user_id` is non-empty and unique within a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    pub threat_events: u64,
    pub last_active: String,
}
