use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Terminal;
use risklens_core::projections::{
    active_flag_count, format_accuracy, peak_threat_day, primary_threat, threat_event_label,
};
use risklens_core::{FetchPhase, ReportSource, Session, UserRecord, ViewState};
use tracing::warn;

const CARD_WIDTH: u16 = 28;

/// Viewer-local state: card cursor for the overview strip and the
/// last-resort fault flag. Navigation itself lives in the session.
struct ViewerUi {
    cursor: usize,
    fault: Option<String>,
}

impl ViewerUi {
    fn new() -> Self {
        Self {
            cursor: 0,
            fault: None,
        }
    }

    fn clamp_cursor(&mut self, user_count: usize) {
        if user_count == 0 {
            self.cursor = 0;
        } else if self.cursor >= user_count {
            self.cursor = user_count - 1;
        }
    }
}

pub async fn run_viewer<S: ReportSource>(session: &mut Session<S>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop(session, &mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

async fn event_loop<S: ReportSource>(
    session: &mut Session<S>,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    let mut ui = ViewerUi::new();
    session.load().await;

    loop {
        let user_count = session
            .snapshot()
            .map(|snapshot| snapshot.user_activity.len())
            .unwrap_or(0);
        ui.clamp_cursor(user_count);

        // Last-resort boundary: a panic while drawing flips the viewer into
        // a fallback screen instead of tearing the whole session down.
        let drawn = catch_unwind(AssertUnwindSafe(|| {
            terminal.draw(|frame| {
                if let Some(message) = ui.fault.clone() {
                    draw_fault(frame, &message);
                } else {
                    draw_dashboard(frame, session, &ui);
                }
            })
            .map(|_| ())
        }));
        match drawn {
            Ok(completed) => {
                completed?;
            }
            Err(_) => {
                warn!("render fault, switching to fallback screen");
                ui.fault = Some("unexpected error while rendering".to_string());
            }
        }

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match key.code {
            KeyCode::Char('q') => break,
            KeyCode::Char('r') => {
                ui.fault = None;
                if matches!(session.phase(), FetchPhase::Failure(_)) {
                    session.retry().await;
                } else {
                    session.load().await;
                }
            }
            KeyCode::Char('n') => {
                ui.fault = None;
                session.new_report();
            }
            KeyCode::Left => {
                ui.cursor = ui.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                if user_count > 0 && ui.cursor + 1 < user_count {
                    ui.cursor += 1;
                }
            }
            KeyCode::Enter => {
                let picked = session
                    .snapshot()
                    .and_then(|snapshot| snapshot.user_activity.get(ui.cursor))
                    .map(|record| record.user_id.clone());
                if let Some(user_id) = picked {
                    session.select_user(&user_id);
                }
            }
            KeyCode::Esc | KeyCode::Char('b') => {
                session.back_to_overview();
            }
            _ => {}
        }
    }

    Ok(())
}

fn draw_dashboard<S: ReportSource>(
    frame: &mut ratatui::Frame<'_>,
    session: &Session<S>,
    ui: &ViewerUi,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(frame.size());

    frame.render_widget(render_header(session), rows[0]);

    match session.phase() {
        FetchPhase::Idle => {
            let idle = Paragraph::new("No report loaded. Press 'r' to fetch.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(idle, rows[1]);
        }
        FetchPhase::Loading => {
            let waiting = Paragraph::new("Loading report...")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(waiting, rows[1]);
        }
        FetchPhase::Failure(message) => {
            draw_failure(frame, rows[1], message);
        }
        FetchPhase::Success => match session.view() {
            ViewState::Overview => draw_overview(frame, rows[1], session, ui),
            ViewState::UserDetail { .. } => draw_user_detail(frame, rows[1], session),
        },
    }
}

fn render_header<S: ReportSource>(session: &Session<S>) -> Paragraph<'static> {
    let status = header_status(session.phase(), session.view());
    let fetched = session
        .last_fetched()
        .map(|ts| ts.to_rfc3339())
        .unwrap_or_else(|| "never".to_string());

    Paragraph::new(Line::from(vec![
        Span::styled(
            "RiskLens  ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "{status}  fetched={fetched}  (r reload, n new report, q quit)"
        )),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Status"))
}

fn draw_failure(frame: &mut ratatui::Frame<'_>, area: Rect, message: &str) {
    let lines = vec![
        Line::from(Span::styled(
            format!("Report unavailable: {message}"),
            Style::default().fg(Color::Red),
        )),
        Line::from(""),
        Line::from("Press 'r' to retry."),
    ];
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Error"));
    frame.render_widget(widget, area);
}

fn draw_fault(frame: &mut ratatui::Frame<'_>, message: &str) {
    let lines = vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Press 'r' to reload the dashboard, 'q' to quit."),
    ];
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Fault"));
    frame.render_widget(widget, frame.size());
}

fn draw_overview<S: ReportSource>(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    session: &Session<S>,
    ui: &ViewerUi,
) {
    let Some(snapshot) = session.snapshot() else {
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(area);

    let model = Paragraph::new(vec![
        Line::from(Span::styled(
            format_accuracy(&snapshot.model_performance).to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(snapshot.model_performance.status.clone()),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Model Intelligence"),
    );
    frame.render_widget(model, rows[0]);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(rows[1]);

    let total = Paragraph::new(snapshot.threat_analytics.total_threat_count.to_string())
        .block(Block::default().borders(Borders::ALL).title("Total Threats"));
    frame.render_widget(total, cards[0]);

    let primary = Paragraph::new(primary_threat(&snapshot.threat_analytics)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Primary Risk Vector"),
    );
    frame.render_widget(primary, cards[1]);

    let peak = peak_threat_day(&snapshot.threat_analytics)
        .map(|(day, count)| format!("{day} ({count})"))
        .unwrap_or_else(|| "n/a".to_string());
    frame.render_widget(
        Paragraph::new(peak).block(Block::default().borders(Borders::ALL).title("Peak Day")),
        cards[2],
    );

    draw_user_strip(frame, rows[2], &snapshot.user_activity, ui.cursor);
}

fn draw_user_strip(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    users: &[UserRecord],
    cursor: usize,
) {
    let title = format!(
        "High Risk Users ({} active flags)",
        active_flag_count(users)
    );
    let outer = Block::default().borders(Borders::ALL).title(title);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    if users.is_empty() {
        frame.render_widget(Paragraph::new("No flagged users."), inner);
        return;
    }

    let capacity = (inner.width / CARD_WIDTH).max(1) as usize;
    let first = scroll_offset(users.len(), cursor, capacity);
    let visible = &users[first..(first + capacity).min(users.len())];

    let constraints: Vec<Constraint> = visible
        .iter()
        .map(|_| Constraint::Length(CARD_WIDTH))
        .collect();
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(inner);

    for (slot, (offset, user)) in slots.iter().zip(visible.iter().enumerate()) {
        let selected = first + offset == cursor;
        let style = if selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let lines: Vec<Line> = user_card_lines(user).into_iter().map(Line::from).collect();
        let card = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(style)
                .title(if selected { "▸ select" } else { "" }),
        );
        frame.render_widget(card, *slot);
    }
}

fn draw_user_detail<S: ReportSource>(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    session: &Session<S>,
) {
    let Some(record) = session.selected_user() else {
        frame.render_widget(
            Paragraph::new("Selected user is no longer in the report. Press 'b' to go back.")
                .block(Block::default().borders(Borders::ALL).title("User Detail")),
            area,
        );
        return;
    };

    let lines = vec![
        Line::from(Span::styled(
            format!("Analyzing {}", record.user_id),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "Threat events: {}",
            threat_event_label(record.threat_events)
        )),
        Line::from(format!("Last activity: {}", record.last_active)),
        Line::from(""),
        Line::from("Press 'b' or Esc to return to the overview."),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("User Detail")),
        area,
    );
}

pub(crate) fn header_status(phase: &FetchPhase, view: &ViewState) -> String {
    let phase_label = match phase {
        FetchPhase::Idle => "idle".to_string(),
        FetchPhase::Loading => "loading".to_string(),
        FetchPhase::Success => "live".to_string(),
        FetchPhase::Failure(message) => format!("failed: {message}"),
    };
    let view_label = match view {
        ViewState::Overview => "overview".to_string(),
        ViewState::UserDetail { user_id } => format!("user {user_id}"),
    };
    format!("phase={phase_label} view={view_label}")
}

/// Leftmost visible card index so the cursor stays on screen.
pub(crate) fn scroll_offset(total: usize, cursor: usize, capacity: usize) -> usize {
    if total <= capacity {
        return 0;
    }
    let max_first = total - capacity;
    cursor.saturating_sub(capacity.saturating_sub(1)).min(max_first)
}

pub(crate) fn user_card_lines(user: &UserRecord) -> Vec<String> {
    vec![
        user.user_id.clone(),
        threat_event_label(user.threat_events).to_uppercase(),
        format!("last active {}", user.last_active),
    ]
}
