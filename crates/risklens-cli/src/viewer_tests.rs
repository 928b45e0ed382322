use risklens_core::{FetchPhase, UserRecord, ViewState};

use crate::viewer::{header_status, scroll_offset, user_card_lines};

#[test]
fn scroll_offset_keeps_the_cursor_visible() {
    // Everything fits: never scroll
    assert_eq!(scroll_offset(3, 2, 5), 0);

    // Cursor inside the first window
    assert_eq!(scroll_offset(10, 0, 4), 0);
    assert_eq!(scroll_offset(10, 3, 4), 0);

    // Cursor past the window: window slides so the cursor is last
    assert_eq!(scroll_offset(10, 4, 4), 1);
    assert_eq!(scroll_offset(10, 9, 4), 6);
}

#[test]
fn scroll_offset_never_leaves_a_trailing_gap() {
    // First index is clamped so the window stays full
    assert_eq!(scroll_offset(5, 4, 4), 1);
    assert_eq!(scroll_offset(5, 4, 1), 4);
}

#[test]
fn user_card_lines_show_id_events_and_activity() {
    // Arrange
    let user = UserRecord {
        user_id: "u42".to_string(),
        threat_events: 5,
        last_active: "2024-01-01".to_string(),
    };

    // Act
    let lines = user_card_lines(&user);

    // Assert
    assert_eq!(lines[0], "u42");
    assert_eq!(lines[1], "5 EVENTS");
    assert_eq!(lines[2], "last active 2024-01-01");
}

#[test]
fn user_card_lines_singular_event() {
    let user = UserRecord {
        user_id: "u1".to_string(),
        threat_events: 1,
        last_active: "N/A".to_string(),
    };

    assert_eq!(user_card_lines(&user)[1], "1 EVENT");
}

#[test]
fn header_status_names_phase_and_view() {
    assert_eq!(
        header_status(&FetchPhase::Success, &ViewState::Overview),
        "phase=live view=overview"
    );
    assert_eq!(
        header_status(
            &FetchPhase::Failure("server error 500".to_string()),
            &ViewState::UserDetail {
                user_id: "u42".to_string()
            }
        ),
        "phase=failed: server error 500 view=user u42"
    );
}
