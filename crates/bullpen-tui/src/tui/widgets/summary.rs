// Session summary widget: one graded row per pitcher.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use super::grade_color;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let header = Row::new(vec![
        Cell::from("Pitcher"),
        Cell::from("N"),
        Cell::from("PPP"),
        Cell::from("%Max"),
        Cell::from("Gr"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let selected = state.pitcher_filter();
    let rows: Vec<Row> = state
        .summaries
        .iter()
        .map(|s| {
            let style = if selected == Some(s.pitcher.as_str()) {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(s.pitcher.clone()),
                Cell::from(s.total_pitches.to_string()),
                Cell::from(format!("{:.2}", s.points_per_pitch)),
                Cell::from(format_percent(s.grade_percent)),
                Cell::from(s.grade.as_str()).style(
                    Style::default()
                        .fg(grade_color(s.grade))
                        .add_modifier(Modifier::BOLD),
                ),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(10),
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(2),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Grades ({})", state.summaries.len())),
    );
    frame.render_widget(table, area);
}

/// Whole-number percent, e.g. 0.75 -> "75%".
pub fn format_percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}
