// Per-pitcher session aggregation and grading.

use std::collections::BTreeMap;

use bullpen_core::records::SummaryRow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::grade::{grade_for_percent, Grade};
use crate::pitch::ScoredPitch;

/// One pitcher's graded session. Always computed from that pitcher's full
/// pitch set; recompute rather than patch when the set changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitcherSummary {
    pub pitcher: String,
    pub total_pitches: u32,
    pub total_score: u32,
    pub avg_score: f64,
    /// Same value as `avg_score`; persisted under its own name.
    pub points_per_pitch: f64,
    pub finish_pitches: u32,
    /// Pitches whose height put them in their family's buffer band.
    pub buffer_eligible: u32,
    /// One point per pitch plus one per buffer-eligible pitch.
    pub max_possible: u32,
    /// `total_score / max_possible`; not capped at 1.0.
    pub grade_percent: f64,
    pub grade: Grade,
}

impl PitcherSummary {
    pub fn to_row(&self, session_date: NaiveDate) -> SummaryRow {
        SummaryRow {
            pitcher: self.pitcher.clone(),
            session_date,
            total_pitches: self.total_pitches,
            finish_pitches: self.finish_pitches,
            avg_score: self.avg_score,
            points_per_pitch: self.points_per_pitch,
            max_possible: self.max_possible,
            grade_percent: self.grade_percent,
            grade: self.grade,
        }
    }
}

#[derive(Default)]
struct Tally {
    pitches: u32,
    score: u32,
    finish: u32,
    eligible: u32,
}

/// Group scored pitches by exact pitcher string and grade each group.
///
/// Output is alphabetical by pitcher. A pitcher only appears if they threw
/// at least one pitch, so `max_possible` is never zero.
pub fn aggregate(pitches: &[ScoredPitch]) -> Vec<PitcherSummary> {
    let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();

    for pitch in pitches {
        let tally = tallies.entry(pitch.record.pitcher.as_str()).or_default();
        tally.pitches += 1;
        tally.score += u32::from(pitch.score);
        tally.finish += u32::from(pitch.record.is_finish);
        tally.eligible += u32::from(pitch.buffer_eligible);
    }

    tallies
        .into_iter()
        .map(|(pitcher, t)| summarize(pitcher, &t))
        .collect()
}

fn summarize(pitcher: &str, t: &Tally) -> PitcherSummary {
    let avg = t.score as f64 / t.pitches as f64;
    let max_possible = t.pitches + t.eligible;
    let grade_percent = t.score as f64 / max_possible as f64;

    PitcherSummary {
        pitcher: pitcher.to_string(),
        total_pitches: t.pitches,
        total_score: t.score,
        avg_score: avg,
        points_per_pitch: avg,
        finish_pitches: t.finish,
        buffer_eligible: t.eligible,
        max_possible,
        grade_percent,
        grade: grade_for_percent(grade_percent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::PitchRecord;
    use crate::score::Scorer;

    fn scored(pitcher: &str, pitch_type: &str, height: f64, side: f64, finish: bool) -> ScoredPitch {
        let rec = PitchRecord::new(pitcher, pitch_type, Some(height), Some(side), finish).unwrap();
        Scorer::default().score_pitch(&rec)
    }

    #[test]
    fn three_pitch_example_grades_b() {
        // Scores [2, 1, 0]; the 1-pointer sits in the fastball buffer.
        let pitches = vec![
            scored("A", "Fastball", 35.0, 0.0, false),
            scored("A", "Fastball", 39.5, 0.0, false),
            scored("A", "Fastball", 45.0, 0.0, false),
        ];
        assert_eq!(
            pitches.iter().map(|p| p.score).collect::<Vec<_>>(),
            vec![2, 1, 0]
        );

        let summaries = aggregate(&pitches);
        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.pitcher, "A");
        assert_eq!(s.total_pitches, 3);
        assert_eq!(s.total_score, 3);
        assert!((s.avg_score - 1.0).abs() < f64::EPSILON);
        assert!((s.points_per_pitch - 1.0).abs() < f64::EPSILON);
        assert_eq!(s.buffer_eligible, 1);
        assert_eq!(s.max_possible, 4);
        assert!((s.grade_percent - 0.75).abs() < f64::EPSILON);
        assert_eq!(s.grade, Grade::B);
    }

    #[test]
    fn grouping_is_exact_and_sorted() {
        let pitches = vec![
            scored("smith", "Fastball", 35.0, 0.0, false),
            scored("Smith", "Fastball", 35.0, 0.0, false),
            scored("Smith ", "Fastball", 35.0, 0.0, false),
            scored("Jones", "Slider", 22.0, 0.0, false),
        ];
        let names: Vec<String> = aggregate(&pitches).into_iter().map(|s| s.pitcher).collect();
        assert_eq!(names, vec!["Jones", "Smith", "Smith ", "smith"]);
    }

    #[test]
    fn order_of_input_does_not_change_values() {
        let a = vec![
            scored("A", "Fastball", 35.0, 0.0, false),
            scored("B", "Curveball", 18.0, 0.0, true),
            scored("A", "Sinker", 22.0, 0.0, false),
        ];
        let mut b = a.clone();
        b.reverse();
        assert_eq!(aggregate(&a), aggregate(&b));
    }

    #[test]
    fn max_possible_never_below_pitch_count() {
        let pitches = vec![
            scored("A", "Fastball", 39.0, 0.0, true),
            scored("A", "Slider", 18.0, 0.0, false),
            scored("A", "Slider", 30.0, 20.0, false),
        ];
        let s = &aggregate(&pitches)[0];
        assert_eq!(s.max_possible, 5);
        assert!(s.max_possible >= s.total_pitches);
        // 2 (buffer + finish) + 1 (buffer) + 0 (wide) = 3 of 5.
        assert_eq!(s.total_score, 3);
        assert!((s.grade_percent - 0.6).abs() < 1e-12);
        assert_eq!(s.grade, Grade::C);
    }

    #[test]
    fn finish_pitches_counted_whether_or_not_rewarded() {
        let pitches = vec![
            scored("A", "Fastball", 39.0, 0.0, true),
            scored("A", "Fastball", 30.0, 0.0, true),
            scored("A", "Fastball", 30.0, 0.0, false),
        ];
        assert_eq!(aggregate(&pitches)[0].finish_pitches, 2);
    }

    #[test]
    fn all_zero_session_grades_f() {
        let pitches = vec![
            scored("A", "Fastball", 30.0, 12.0, false),
            scored("A", "Fastball", 10.0, 0.0, false),
        ];
        let s = &aggregate(&pitches)[0];
        assert_eq!(s.total_score, 0);
        assert_eq!(s.max_possible, 2);
        assert!(s.grade_percent.abs() < f64::EPSILON);
        assert_eq!(s.grade, Grade::F);
    }

    #[test]
    fn empty_input_yields_no_summaries() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn to_row_carries_fields() {
        let pitches = vec![scored("A", "Fastball", 35.0, 0.0, true)];
        let date = NaiveDate::from_ymd_opt(2025, 4, 12).unwrap();
        let row = aggregate(&pitches)[0].to_row(date);
        assert_eq!(row.pitcher, "A");
        assert_eq!(row.session_date, date);
        assert_eq!(row.total_pitches, 1);
        assert_eq!(row.finish_pitches, 1);
        assert_eq!(row.max_possible, 1);
        assert_eq!(row.grade, Grade::A);
    }
}
