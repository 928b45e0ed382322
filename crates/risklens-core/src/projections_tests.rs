use crate::projections::{
    active_flag_count, format_accuracy, peak_threat_day, primary_threat, threat_event_label,
};
use crate::snapshot::{ModelPerformance, ThreatAnalytics, UserRecord};

fn analytics_with_subclasses(pairs: Vec<(&str, u64)>) -> ThreatAnalytics {
    ThreatAnalytics {
        top_threat_subclasses: pairs
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect(),
        ..ThreatAnalytics::default()
    }
}

#[test]
fn primary_threat_humanizes_the_first_ranked_subclass() {
    let analytics = analytics_with_subclasses(vec![("failed_login", 12), ("port_scan", 3)]);

    assert_eq!(primary_threat(&analytics), "Failed login");
}

#[test]
fn primary_threat_replaces_every_underscore() {
    let analytics = analytics_with_subclasses(vec![("remote_code_execution", 1)]);

    assert_eq!(primary_threat(&analytics), "Remote code execution");
}

#[test]
fn primary_threat_on_empty_ranking_is_the_none_sentinel() {
    assert_eq!(primary_threat(&ThreatAnalytics::default()), "none");
}

#[test]
fn active_flag_count_is_the_record_count() {
    let users = vec![
        UserRecord {
            user_id: "u1".to_string(),
            threat_events: 2,
            last_active: "N/A".to_string(),
        },
        UserRecord {
            user_id: "u2".to_string(),
            threat_events: 0,
            last_active: "N/A".to_string(),
        },
    ];

    assert_eq!(active_flag_count(&users), 2);
    assert_eq!(active_flag_count(&[]), 0);
}

#[test]
fn format_accuracy_passes_the_server_string_through() {
    let performance = ModelPerformance {
        accuracy: "97.00%".to_string(),
        status: "Goal Met".to_string(),
    };

    assert_eq!(format_accuracy(&performance), "97.00%");
    assert_eq!(format_accuracy(&ModelPerformance::default()), "0.00%");
}

#[test]
fn threat_event_label_pluralizes() {
    assert_eq!(threat_event_label(0), "0 events");
    assert_eq!(threat_event_label(1), "1 event");
    assert_eq!(threat_event_label(5), "5 events");
}

#[test]
fn peak_threat_day_picks_the_maximum_with_first_tie_winning() {
    let analytics = ThreatAnalytics {
        threats_per_day: vec![
            ("2024-01-01".to_string(), 12),
            ("2024-01-02".to_string(), 40),
            ("2024-01-03".to_string(), 40),
        ],
        ..ThreatAnalytics::default()
    };

    assert_eq!(peak_threat_day(&analytics), Some(("2024-01-02", 40)));
    assert_eq!(peak_threat_day(&ThreatAnalytics::default()), None);
}
