//! Display derivations over a snapshot. All functions here are pure: same
//! snapshot, same output, no I/O.

use crate::snapshot::{ModelPerformance, ThreatAnalytics, UserRecord};

/// First-ranked threat subclass, humanized for display ("failed_login" ->
/// "Failed login"), or the sentinel "none" when the server sent no ranking.
pub fn primary_threat(analytics: &ThreatAnalytics) -> String {
    match analytics.top_threat_subclasses.first() {
        Some((name, _)) => humanize(name),
        None => "none".to_string(),
    }
}

/// Number of flagged users shown on the overview.
pub fn active_flag_count(user_activity: &[UserRecord]) -> usize {
    user_activity.len()
}

/// The accuracy string as the server formatted it. The server owns number
/// formatting; this is a pass-through.
pub fn format_accuracy(performance: &ModelPerformance) -> &str {
    &performance.accuracy
}

/// Pluralized event-count label for a user card.
pub fn threat_event_label(count: u64) -> String {
    if count == 1 {
        "1 event".to_string()
    } else {
        format!("{count} events")
    }
}

/// Day with the most threats, first occurrence winning ties. `None` when the
/// per-day series is empty.
pub fn peak_threat_day(analytics: &ThreatAnalytics) -> Option<(&str, u64)> {
    analytics
        .threats_per_day
        .iter()
        .fold(None, |best, (day, count)| match best {
            Some((_, top)) if top >= *count => best,
            _ => Some((day.as_str(), *count)),
        })
}

fn humanize(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => spaced,
    }
}
