//! Readings table rendering.
//!
//! Displays one row per reading (time, SpO2, per-reading status) in server
//! response order. Rows are dimmed when the set is stale.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::app::{App, FetchPhase};
use crate::data::Reading;

/// Render the SpO2 readings table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.stale {
        " SpO2 Readings (stale) "
    } else {
        " SpO2 Readings "
    };

    let border_style = if app.stale {
        Style::default().fg(app.theme.warning)
    } else {
        Style::default().fg(app.theme.border)
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(border_style);

    if app.readings.is_empty() {
        let message = match app.fetch_phase {
            FetchPhase::Fetching => "Fetching readings…",
            FetchPhase::Failed => "No data, last fetch failed",
            _ => "No readings available",
        };
        let paragraph = ratatui::widgets::Paragraph::new(message)
            .block(block)
            .style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Time"),
        Cell::from("SpO2 (%)"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let dim = if app.stale {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    };

    let rows: Vec<Row> = app
        .readings
        .iter()
        .map(|reading| {
            let status = app.row_status(reading);
            Row::new(vec![
                Cell::from(format_time(reading)),
                Cell::from(reading.spo2.to_string()),
                Cell::from(status.label()).style(app.theme.reading_style(status)),
            ])
            .style(dim)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}

/// Format a reading timestamp for display (e.g. "10:15, 01 Mar").
fn format_time(reading: &Reading) -> String {
    reading.timestamp.format("%H:%M, %d %b").to_string()
}
