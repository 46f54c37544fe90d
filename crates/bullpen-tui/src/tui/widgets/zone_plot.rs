// Strike zone plot: the zone, both buffer bands and every located pitch,
// drawn from the catcher's view. Glyph shows the visual category, colour
// shows the pitch family.

use bullpen_core::records::PitchRow;
use bullpen_grading::zone::StrikeZone;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine, Rectangle};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use super::{category_glyph, family_color};
use crate::tui::ViewState;

/// Horizontal half-width of the plot, in inches.
const PLOT_HALF_WIDTH: f64 = 12.0;
/// Vertical padding beyond the buffer bands, in inches.
const PLOT_MARGIN: f64 = 2.0;

/// Plot window `(x_bounds, y_bounds)` for a zone.
pub fn plot_window(zone: &StrikeZone) -> ([f64; 2], [f64; 2]) {
    (
        [-PLOT_HALF_WIDTH, PLOT_HALF_WIDTH],
        [
            zone.nfb_buffer_bottom - PLOT_MARGIN,
            zone.fb_buffer_top + PLOT_MARGIN,
        ],
    )
}

/// Located pitches as plot points; pitches missing either coordinate are
/// left out.
pub fn plot_points<'a>(pitches: &[&'a PitchRow]) -> Vec<(f64, f64, &'a PitchRow)> {
    pitches
        .iter()
        .filter_map(|p| match (p.side_inches, p.height_inches) {
            (Some(x), Some(y)) => Some((x, y, *p)),
            _ => None,
        })
        .collect()
}

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let zone = state.zone;
    let (x_bounds, y_bounds) = plot_window(&zone);
    let visible = state.visible_pitches();
    let points = plot_points(&visible);
    let unlocated = visible.len() - points.len();

    let mut title = format!("Zone: {} ({} plotted", state.pitcher_label(), points.len());
    if unlocated > 0 {
        title.push_str(&format!(", {} without location", unlocated));
    }
    title.push(')');

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(move |ctx| {
            draw_zone(ctx, &zone);
            ctx.layer();
            for (x, y, p) in &points {
                ctx.print(
                    *x,
                    *y,
                    Span::styled(
                        category_glyph(p.category),
                        Style::default().fg(family_color(p.is_fastball)),
                    ),
                );
            }
        });
    frame.render_widget(canvas, area);
}

fn draw_zone(ctx: &mut Context, zone: &StrikeZone) {
    let width = zone.side_right - zone.side_left;

    // Fastball buffer above, non-fastball buffer below.
    ctx.draw(&Rectangle {
        x: zone.side_left,
        y: zone.top,
        width,
        height: zone.fb_buffer_top - zone.top,
        color: Color::DarkGray,
    });
    ctx.draw(&Rectangle {
        x: zone.side_left,
        y: zone.nfb_buffer_bottom,
        width,
        height: zone.bottom - zone.nfb_buffer_bottom,
        color: Color::DarkGray,
    });

    ctx.draw(&Rectangle {
        x: zone.side_left,
        y: zone.bottom,
        width,
        height: zone.top - zone.bottom,
        color: Color::White,
    });

    let mid = zone.midline();
    ctx.draw(&CanvasLine {
        x1: zone.side_left,
        y1: mid,
        x2: zone.side_right,
        y2: mid,
        color: Color::Gray,
    });
}
