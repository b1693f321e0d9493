//! Advice panel rendering.
//!
//! The panel is gated on the aggregate verdict: the draft is editable only
//! while the patient status is `Warning`. The gateway is never involved in
//! that decision; gating happens entirely on this side of the boundary.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, SendPhase};

/// Render the advice draft panel.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let enabled = app.verdict.allows_advice();

    let title = match app.send_phase {
        SendPhase::Sending => " Send Advice (sending…) ",
        _ if app.advice_active => " Send Advice (typing) ",
        _ if enabled => " Send Advice ",
        _ => " Send Advice (disabled) ",
    };

    let border_style = if app.advice_active {
        Style::default().fg(app.theme.highlight)
    } else if enabled {
        Style::default().fg(app.theme.warning)
    } else {
        Style::default().fg(app.theme.border).add_modifier(Modifier::DIM)
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(border_style);

    let content = if enabled {
        let mut spans = vec![Span::raw(app.advice_text.as_str())];
        if app.advice_active {
            spans.push(Span::styled("█", Style::default().fg(app.theme.highlight)));
        } else if app.advice_text.is_empty() {
            spans.push(Span::styled(
                "press 'a' to write advice for the patient",
                Style::default().add_modifier(Modifier::DIM),
            ));
        }
        Line::from(spans)
    } else {
        Line::from(Span::styled(
            "advice can be sent when status is Warning",
            Style::default().add_modifier(Modifier::DIM),
        ))
    };

    let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
