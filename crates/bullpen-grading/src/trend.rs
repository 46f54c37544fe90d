// Historical per-pitcher trend grading.

use bullpen_core::records::SummaryRow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::grade::{grade_for_percent, Grade};

/// How each historical session is turned into a letter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendMode {
    /// Grade the stored fraction-of-maximum. Agrees with the session grade.
    #[default]
    PercentOfMax,
    /// Legacy: apply the percent thresholds straight to points-per-pitch.
    /// PPP ranges over 0..=2 while the thresholds assume 0..=1, so these
    /// letters are not comparable to session grades.
    RawPointsPerPitch,
}

impl TrendMode {
    pub fn toggle(self) -> Self {
        match self {
            TrendMode::PercentOfMax => TrendMode::RawPointsPerPitch,
            TrendMode::RawPointsPerPitch => TrendMode::PercentOfMax,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrendMode::PercentOfMax => "% of max",
            TrendMode::RawPointsPerPitch => "raw PPP (legacy)",
        }
    }
}

/// One session on a pitcher's trend line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub session_date: NaiveDate,
    pub points_per_pitch: f64,
    pub grade_percent: f64,
    pub grade: Grade,
}

/// Grade each session independently and order the points by date.
/// Rows are expected to belong to a single pitcher; the pitcher field is
/// not inspected.
pub fn build_trend(history: &[SummaryRow], mode: TrendMode) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = history
        .iter()
        .map(|row| {
            let basis = match mode {
                TrendMode::PercentOfMax => row.grade_percent,
                TrendMode::RawPointsPerPitch => row.points_per_pitch,
            };
            TrendPoint {
                session_date: row.session_date,
                points_per_pitch: row.points_per_pitch,
                grade_percent: row.grade_percent,
                grade: grade_for_percent(basis),
            }
        })
        .collect();
    points.sort_by_key(|p| p.session_date);
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: (i32, u32, u32), ppp: f64, pct: f64) -> SummaryRow {
        SummaryRow {
            pitcher: "Smith".into(),
            session_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            total_pitches: 10,
            finish_pitches: 0,
            avg_score: ppp,
            points_per_pitch: ppp,
            max_possible: 12,
            grade_percent: pct,
            grade: grade_for_percent(pct),
        }
    }

    #[test]
    fn points_sorted_by_date() {
        let history = vec![
            row((2025, 5, 1), 1.0, 0.5),
            row((2025, 4, 1), 1.2, 0.6),
            row((2025, 4, 15), 1.5, 0.75),
        ];
        let trend = build_trend(&history, TrendMode::PercentOfMax);
        let dates: Vec<String> = trend.iter().map(|p| p.session_date.to_string()).collect();
        assert_eq!(dates, vec!["2025-04-01", "2025-04-15", "2025-05-01"]);
    }

    #[test]
    fn percent_mode_matches_session_grade() {
        let history = vec![row((2025, 4, 1), 1.5, 0.75)];
        let trend = build_trend(&history, TrendMode::PercentOfMax);
        assert_eq!(trend[0].grade, Grade::B);
        assert_eq!(trend[0].grade, history[0].grade);
    }

    #[test]
    fn raw_mode_grades_ppp_directly() {
        // 1.5 PPP is "above 0.80" under the legacy reading.
        let history = vec![row((2025, 4, 1), 1.5, 0.75), row((2025, 4, 2), 0.3, 0.15)];
        let trend = build_trend(&history, TrendMode::RawPointsPerPitch);
        assert_eq!(trend[0].grade, Grade::A);
        assert_eq!(trend[1].grade, Grade::F);
        assert!((trend[0].points_per_pitch - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn toggle_round_trips() {
        assert_eq!(TrendMode::default().toggle(), TrendMode::RawPointsPerPitch);
        assert_eq!(TrendMode::RawPointsPerPitch.toggle(), TrendMode::PercentOfMax);
    }

    #[test]
    fn empty_history_is_empty_trend() {
        assert!(build_trend(&[], TrendMode::PercentOfMax).is_empty());
    }
}
