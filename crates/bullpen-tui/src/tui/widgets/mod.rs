// TUI widget modules for each viewer panel, plus the colour and glyph
// conventions they share.

pub mod heatmap;
pub mod pitch_table;
pub mod status_bar;
pub mod summary;
pub mod trend_chart;
pub mod zone_plot;

use bullpen_core::records::{Grade, PitchCategory};
use ratatui::style::Color;

pub fn category_color(category: PitchCategory) -> Color {
    match category {
        PitchCategory::Zero => Color::Red,
        PitchCategory::OnePoint => Color::Yellow,
        PitchCategory::TwoPoint => Color::Green,
        PitchCategory::FinishBonus => Color::Magenta,
    }
}

pub fn category_glyph(category: PitchCategory) -> &'static str {
    match category {
        PitchCategory::Zero => "x",
        PitchCategory::OnePoint => "o",
        PitchCategory::TwoPoint => "●",
        PitchCategory::FinishBonus => "★",
    }
}

pub fn family_color(is_fastball: bool) -> Color {
    if is_fastball {
        Color::Cyan
    } else {
        Color::LightMagenta
    }
}

pub fn grade_color(grade: Grade) -> Color {
    match grade {
        Grade::A => Color::Green,
        Grade::B => Color::LightGreen,
        Grade::C => Color::Yellow,
        Grade::D => Color::LightRed,
        Grade::F => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_are_distinct() {
        let glyphs = [
            category_glyph(PitchCategory::Zero),
            category_glyph(PitchCategory::OnePoint),
            category_glyph(PitchCategory::TwoPoint),
            category_glyph(PitchCategory::FinishBonus),
        ];
        for (i, a) in glyphs.iter().enumerate() {
            for b in &glyphs[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn families_have_different_colours() {
        assert_ne!(family_color(true), family_color(false));
    }
}
