//! Common UI components shared across the screen.
//!
//! This module contains the header bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, FetchPhase, SendPhase};
use crate::data::ReadingStatus;

/// Render the header bar with patient and verdict overview.
///
/// Displays: verdict indicator, patient id, aggregate status, low-reading
/// count, and a stale marker after a failed refresh.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let verdict_style = app.theme.verdict_style(app.verdict);

    let low_count = app
        .readings
        .iter()
        .filter(|r| app.row_status(r) == ReadingStatus::Low)
        .count();

    let mut spans = vec![
        Span::styled(" ● ", verdict_style),
        Span::styled("OXYWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            format!("Patient {}", app.patient_id()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ Status: "),
        Span::styled(app.verdict.label(), verdict_style),
    ];

    if !app.readings.is_empty() {
        spans.push(Span::raw(format!(
            " │ {} readings, ",
            app.readings.len()
        )));
        if low_count > 0 {
            spans.push(Span::styled(
                format!("{low_count} low"),
                Style::default().fg(app.theme.warning),
            ));
        } else {
            spans.push(Span::styled("0 low", Style::default().add_modifier(Modifier::DIM)));
        }
    }

    if app.stale {
        spans.push(Span::styled(
            " │ STALE",
            Style::default().fg(app.theme.warning).add_modifier(Modifier::BOLD),
        ));
    }

    if app.fetch_phase == FetchPhase::Fetching {
        spans.push(Span::styled(
            " │ fetching…",
            Style::default().add_modifier(Modifier::DIM),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the status bar at the bottom.
///
/// Shows: temporary status messages, the last fetch error, time since the
/// last successful update, and the available controls.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Temporary status message takes priority
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {msg} ")).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(ref err) = app.last_error {
        let paragraph = Paragraph::new(format!(" Error: {err} | r:retry q:quit"))
            .style(Style::default().fg(app.theme.warning));
        frame.render_widget(paragraph, area);
        return;
    }

    let updated = match app.last_updated {
        Some(at) => format!("Updated {:.0}s ago", at.elapsed().as_secs_f64()),
        None => "Never updated".to_string(),
    };

    let controls = if app.advice_active {
        "Type advice | Enter:send Esc:done Ctrl-U:clear"
    } else if app.send_phase == SendPhase::Sending {
        "Sending advice… | q:quit"
    } else if app.can_submit() {
        "a:write advice r:refresh Tab:patient ?:help q:quit"
    } else {
        "r:refresh Tab:patient ?:help q:quit"
    };

    let paragraph = Paragraph::new(format!(" {updated} | {controls}"))
        .style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Monitoring",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r           Refresh readings now"),
        Line::from("  Tab ←/→ h/l Switch patient"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Advice (Warning status only)",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  a / i       Write advice"),
        Line::from("  Enter       Send advice"),
        Line::from("  Esc         Stop typing (draft kept)"),
        Line::from("  Ctrl-U      Clear draft"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ?           Toggle help"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 20u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
