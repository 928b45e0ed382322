use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::snapshot::{DashboardSnapshot, ModelPerformance, ThreatAnalytics, UserRecord};

/// Converts a raw payload into a fully populated snapshot. Total function:
/// any field that is absent, `null`, or wrong-typed is replaced by its
/// documented default, so downstream consumers never see a hole.
pub fn normalize(raw: &Value) -> DashboardSnapshot {
    DashboardSnapshot {
        model_performance: normalize_model_performance(raw.get("model_performance")),
        threat_analytics: normalize_threat_analytics(raw.get("threat_analytics")),
        user_activity: normalize_user_activity(raw.get("user_activity_monitor")),
    }
}

fn normalize_model_performance(raw: Option<&Value>) -> ModelPerformance {
    let defaults = ModelPerformance::default();
    ModelPerformance {
        accuracy: string_or(raw, "accuracy", &defaults.accuracy),
        status: string_or(raw, "status", &defaults.status),
    }
}

fn normalize_threat_analytics(raw: Option<&Value>) -> ThreatAnalytics {
    ThreatAnalytics {
        total_threat_count: count_or_zero(raw.and_then(|v| v.get("total_threat_count"))),
        threats_per_day: count_pairs(raw.and_then(|v| v.get("threats_per_day"))),
        top_threat_subclasses: count_pairs(raw.and_then(|v| v.get("top_threat_subclasses"))),
        risk_percentage_by_event: string_pairs(raw.and_then(|v| v.get("risk_percentage_by_event"))),
    }
}

fn normalize_user_activity(raw: Option<&Value>) -> Vec<UserRecord> {
    let Some(entries) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for entry in entries {
        let user_id = entry
            .get("user_id")
            .and_then(Value::as_str)
            .unwrap_or_default();

        // A record without an id cannot be selected for drill-down, so it
        // is dropped rather than defaulted.
        if user_id.is_empty() {
            debug!("dropping user activity record without user_id");
            continue;
        }
        if !seen.insert(user_id.to_string()) {
            debug!(user_id, "dropping duplicate user activity record");
            continue;
        }

        records.push(UserRecord {
            user_id: user_id.to_string(),
            threat_events: count_or_zero(entry.get("threat_events")),
            last_active: entry
                .get("last_active")
                .and_then(Value::as_str)
                .unwrap_or("N/A")
                .to_string(),
        });
    }

    records
}

fn string_or(raw: Option<&Value>, key: &str, default: &str) -> String {
    raw.and_then(|v| v.get(key))
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn count_or_zero(raw: Option<&Value>) -> u64 {
    raw.and_then(Value::as_u64).unwrap_or(0)
}

/// Extracts `name -> count` pairs in the object's own key order, skipping
/// entries whose value is not a non-negative integer.
fn count_pairs(raw: Option<&Value>) -> Vec<(String, u64)> {
    let Some(map) = raw.and_then(Value::as_object) else {
        return Vec::new();
    };

    map.iter()
        .filter_map(|(key, value)| value.as_u64().map(|count| (key.clone(), count)))
        .collect()
}

fn string_pairs(raw: Option<&Value>) -> Vec<(String, String)> {
    let Some(map) = raw.and_then(Value::as_object) else {
        return Vec::new();
    };

    map.iter()
        .filter_map(|(key, value)| {
            value
                .as_str()
                .map(|text| (key.clone(), text.to_string()))
        })
        .collect()
}
