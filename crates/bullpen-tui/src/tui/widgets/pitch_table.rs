// Pitch table widget: every pitch in upload order with its score.
//
// Rows are coloured by visual category. Scrolls with Up/Down and follows
// the pitcher filter.

use bullpen_core::records::PitchRow;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use super::category_color;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let visible = state.visible_pitches();

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Pitcher"),
        Cell::from("Type"),
        Cell::from("Ht\""),
        Cell::from("Side\""),
        Cell::from("FB"),
        Cell::from("Fin"),
        Cell::from("Pts"),
        Cell::from("Category"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .skip(state.scroll_offset)
        .map(|(i, p)| pitch_row(i + 1, p))
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(12),
        Constraint::Length(14),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(12),
    ];

    let title = format!(
        "Pitches: {} ({})",
        state.pitcher_label(),
        visible.len()
    );
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, area);
}

fn pitch_row(number: usize, p: &PitchRow) -> Row<'static> {
    Row::new(vec![
        Cell::from(number.to_string()),
        Cell::from(p.pitcher.clone()),
        Cell::from(p.pitch_type.clone()),
        Cell::from(format_inches(p.height_inches)),
        Cell::from(format_inches(p.side_inches)),
        Cell::from(yes_no(p.is_fastball)),
        Cell::from(yes_no(p.is_finish)),
        Cell::from(p.score.to_string()),
        Cell::from(p.category.as_str()),
    ])
    .style(Style::default().fg(category_color(p.category)))
}

/// One decimal, or "--" when the tracker lost the pitch.
pub fn format_inches(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}", v),
        None => "--".to_string(),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Y"
    } else {
        ""
    }
}
