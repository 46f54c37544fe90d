// Location heatmap: pitch counts binned over the zone plot window.
// Cells whose centre lies inside the strike zone are underlined.

use bullpen_core::records::PitchRow;
use bullpen_grading::zone::StrikeZone;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::zone_plot::{plot_points, plot_window};
use crate::tui::ViewState;

pub const HEAT_COLS: usize = 12;
pub const HEAT_ROWS: usize = 12;

/// Count located pitches per cell. Row 0 is the top (highest) row; pitches
/// outside the window are not counted.
pub fn bin_counts(
    pitches: &[&PitchRow],
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    cols: usize,
    rows: usize,
) -> Vec<Vec<u32>> {
    let mut grid = vec![vec![0u32; cols]; rows];
    if cols == 0 || rows == 0 {
        return grid;
    }
    let cell_w = (x_bounds[1] - x_bounds[0]) / cols as f64;
    let cell_h = (y_bounds[1] - y_bounds[0]) / rows as f64;

    for (x, y, _) in plot_points(pitches) {
        if x < x_bounds[0] || x > x_bounds[1] || y < y_bounds[0] || y > y_bounds[1] {
            continue;
        }
        let col = (((x - x_bounds[0]) / cell_w) as usize).min(cols - 1);
        let from_bottom = (((y - y_bounds[0]) / cell_h) as usize).min(rows - 1);
        grid[rows - 1 - from_bottom][col] += 1;
    }
    grid
}

/// Whether the centre of `(row, col)` sits inside the strike zone.
pub fn cell_in_zone(
    zone: &StrikeZone,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    cols: usize,
    rows: usize,
    row: usize,
    col: usize,
) -> bool {
    let cell_w = (x_bounds[1] - x_bounds[0]) / cols as f64;
    let cell_h = (y_bounds[1] - y_bounds[0]) / rows as f64;
    let cx = x_bounds[0] + (col as f64 + 0.5) * cell_w;
    let cy = y_bounds[1] - (row as f64 + 0.5) * cell_h;
    zone.side_in_zone(cx) && zone.height_in_zone(cy)
}

/// Background colour for a cell, cold to hot.
pub fn heat_color(count: u32, max: u32) -> Color {
    if count == 0 || max == 0 {
        return Color::Reset;
    }
    let ratio = count as f64 / max as f64;
    if ratio > 0.8 {
        Color::Red
    } else if ratio > 0.6 {
        Color::LightRed
    } else if ratio > 0.4 {
        Color::Yellow
    } else if ratio > 0.2 {
        Color::Green
    } else {
        Color::Blue
    }
}

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let (x_bounds, y_bounds) = plot_window(&state.zone);
    let visible = state.visible_pitches();
    let grid = bin_counts(&visible, x_bounds, y_bounds, HEAT_COLS, HEAT_ROWS);
    let max = grid.iter().flatten().copied().max().unwrap_or(0);

    let lines: Vec<Line> = grid
        .iter()
        .enumerate()
        .map(|(r, row)| {
            let spans: Vec<Span> = row
                .iter()
                .enumerate()
                .map(|(c, &count)| {
                    let mut style = Style::default().bg(heat_color(count, max)).fg(Color::White);
                    if cell_in_zone(&state.zone, x_bounds, y_bounds, HEAT_COLS, HEAT_ROWS, r, c) {
                        style = style.add_modifier(Modifier::UNDERLINED);
                    }
                    let text = if count > 0 {
                        format!("{:^4}", count)
                    } else {
                        "    ".to_string()
                    };
                    Span::styled(text, style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let title = format!("Heatmap: {} (max {} per cell)", state.pitcher_label(), max);
    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::{pitch, sample_state};

    const X: [f64; 2] = [-12.0, 12.0];
    const Y: [f64; 2] = [0.0, 48.0];

    #[test]
    fn counts_land_in_expected_cells() {
        let a = pitch("A", 47.0, -11.0, 2, true); // top-left
        let b = pitch("A", 1.0, 11.0, 0, true); // bottom-right
        let c = pitch("A", 1.5, 11.5, 0, true); // bottom-right again
        let rows = vec![&a, &b, &c];
        let grid = bin_counts(&rows, X, Y, 4, 4);
        assert_eq!(grid[0][0], 1);
        assert_eq!(grid[3][3], 2);
        assert_eq!(grid.iter().flatten().sum::<u32>(), 3);
    }

    #[test]
    fn upper_edge_falls_in_last_cell() {
        let top = pitch("A", 48.0, 12.0, 0, true);
        let rows = vec![&top];
        let grid = bin_counts(&rows, X, Y, 4, 4);
        assert_eq!(grid[0][3], 1);
    }

    #[test]
    fn outside_window_and_unlocated_ignored() {
        let far = pitch("A", 60.0, 0.0, 0, true);
        let mut lost = pitch("A", 20.0, 0.0, 0, true);
        lost.height_inches = None;
        let rows = vec![&far, &lost];
        let grid = bin_counts(&rows, X, Y, 4, 4);
        assert_eq!(grid.iter().flatten().sum::<u32>(), 0);
    }

    #[test]
    fn zone_cells_marked() {
        let zone = StrikeZone::default();
        // Centre column pair at mid-height is inside the zone.
        assert!(cell_in_zone(&zone, X, Y, 4, 4, 1, 1));
        // Corners are not.
        assert!(!cell_in_zone(&zone, X, Y, 4, 4, 0, 0));
        assert!(!cell_in_zone(&zone, X, Y, 4, 4, 3, 3));
    }

    #[test]
    fn heat_color_scale() {
        assert_eq!(heat_color(0, 10), Color::Reset);
        assert_eq!(heat_color(1, 10), Color::Blue);
        assert_eq!(heat_color(5, 10), Color::Yellow);
        assert_eq!(heat_color(10, 10), Color::Red);
        assert_eq!(heat_color(3, 0), Color::Reset);
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(60, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = sample_state();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
