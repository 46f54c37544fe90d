// Trend chart: a pitcher's points-per-pitch across stored sessions, with
// each session's letter grade listed under the chart.

use bullpen_grading::trend::{build_trend, TrendPoint};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap};
use ratatui::Frame;

use super::grade_color;
use crate::tui::ViewState;

/// Upper bound of the PPP axis; no pitch scores more than 2.
const PPP_AXIS_MAX: f64 = 2.0;

/// Chart coordinates: sessions evenly spaced by index.
pub fn chart_data(points: &[TrendPoint]) -> Vec<(f64, f64)> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.points_per_pitch))
        .collect()
}

/// "MM-DD B" style labels, one per session.
pub fn grade_spans(points: &[TrendPoint]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for p in points {
        spans.push(Span::raw(format!("{} ", p.session_date.format("%m-%d"))));
        spans.push(Span::styled(
            p.grade.as_str(),
            Style::default()
                .fg(grade_color(p.grade))
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" ({:.2})  ", p.points_per_pitch)));
    }
    spans
}

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let title = format!("Trend: {} [{}]", state.pitcher_label(), state.trend_mode.label());
    let block = Block::default().borders(Borders::ALL).title(title);

    let Some(name) = state.pitcher_filter() else {
        let msg = Paragraph::new("Select a pitcher with \u{2190}/\u{2192} to see their trend.").block(block);
        frame.render_widget(msg, area);
        return;
    };
    let history = state.selected_history().unwrap_or(&[]);
    let points = build_trend(history, state.trend_mode);
    if points.is_empty() {
        let msg = Paragraph::new(format!("No stored sessions for {}.", name)).block(block);
        frame.render_widget(msg, area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(inner);

    let data = chart_data(&points);
    let dataset = Dataset::default()
        .name("PPP")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let last = points.len() - 1;
    let x_labels = vec![
        points[0].session_date.to_string(),
        points[last].session_date.to_string(),
    ];
    let x_max = (last as f64).max(1.0);

    let chart = Chart::new(vec![dataset])
        .x_axis(
            Axis::default()
                .title("Session")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("PPP")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, PPP_AXIS_MAX])
                .labels(vec!["0.0", "1.0", "2.0"]),
        );
    frame.render_widget(chart, sections[0]);

    let grades = Paragraph::new(Line::from(grade_spans(&points))).wrap(Wrap { trim: true });
    frame.render_widget(grades, sections[1]);
}
