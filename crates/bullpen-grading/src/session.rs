// Session assembly: date resolution, scoring, aggregation and export rows.

use bullpen_core::records::{PitchRow, SummaryRow};
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::aggregate::{aggregate, PitcherSummary};
use crate::error::GradingError;
use crate::pitch::{PitchRecord, ScoredPitch};
use crate::score::Scorer;

/// Find the first `YYYY-MM-DD` in a file name that is a real calendar date.
pub fn session_date_from_filename(name: &str) -> Option<NaiveDate> {
    let bytes = name.as_bytes();
    if bytes.len() < 10 {
        return None;
    }
    (0..=bytes.len() - 10).find_map(|start| {
        let window = &bytes[start..start + 10];
        let shaped = window.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
        if !shaped {
            return None;
        }
        // The window is pure ASCII, so slicing the str here is on char bounds.
        NaiveDate::parse_from_str(&name[start..start + 10], "%Y-%m-%d").ok()
    })
}

/// Date from the file name, falling back to `today`.
pub fn resolve_session_date(name: &str, today: NaiveDate) -> NaiveDate {
    session_date_from_filename(name).unwrap_or(today)
}

/// A fully graded session, ready to display or persist.
#[derive(Debug, Clone)]
pub struct ScoredSession {
    pub session_date: NaiveDate,
    /// Where the pitches came from (usually the file name).
    pub source: String,
    /// In input order.
    pub pitches: Vec<ScoredPitch>,
    /// Alphabetical by pitcher.
    pub summaries: Vec<PitcherSummary>,
    /// Pitches that scored 0 because a coordinate was missing.
    pub zeroed_rows: usize,
}

impl ScoredSession {
    pub fn pitch_count(&self) -> usize {
        self.pitches.len()
    }

    pub fn summary_for(&self, pitcher: &str) -> Option<&PitcherSummary> {
        self.summaries.iter().find(|s| s.pitcher == pitcher)
    }

    /// Rows in the shape the store expects.
    pub fn to_records(&self) -> (Vec<PitchRow>, Vec<SummaryRow>) {
        let pitches = self
            .pitches
            .iter()
            .map(|p| p.to_row(self.session_date))
            .collect();
        let summaries = self
            .summaries
            .iter()
            .map(|s| s.to_row(self.session_date))
            .collect();
        (pitches, summaries)
    }
}

/// Score every pitch and grade every pitcher in one pass.
pub fn grade_session(
    records: &[PitchRecord],
    session_date: NaiveDate,
    source: impl Into<String>,
    scorer: &Scorer,
) -> Result<ScoredSession, GradingError> {
    if records.is_empty() {
        return Err(GradingError::EmptySession);
    }

    let source = source.into();
    let pitches = scorer.score_all(records);
    let zeroed_rows = pitches.iter().filter(|p| !p.record.has_location()).count();
    let summaries = aggregate(&pitches);

    for s in &summaries {
        debug!(
            "{}: {}/{} points over {} pitches, grade {}",
            s.pitcher, s.total_score, s.max_possible, s.total_pitches, s.grade
        );
    }
    info!(
        "graded {} ({}): {} pitches, {} pitchers, {} without location",
        source,
        session_date,
        pitches.len(),
        summaries.len(),
        zeroed_rows
    );

    Ok(ScoredSession {
        session_date,
        source,
        pitches,
        summaries,
        zeroed_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grade::Grade;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rec(pitcher: &str, pitch_type: &str, h: Option<f64>, s: Option<f64>, finish: bool) -> PitchRecord {
        PitchRecord::new(pitcher, pitch_type, h, s, finish).unwrap()
    }

    #[test]
    fn date_found_anywhere_in_name() {
        assert_eq!(session_date_from_filename("bullpen_2025-04-12.csv"), Some(date(2025, 4, 12)));
        assert_eq!(session_date_from_filename("2024-10-01"), Some(date(2024, 10, 1)));
        assert_eq!(
            session_date_from_filename("/data/pens/team-2025-03-30-am.csv"),
            Some(date(2025, 3, 30))
        );
    }

    #[test]
    fn invalid_calendar_dates_are_skipped() {
        assert_eq!(session_date_from_filename("pen_2025-13-40.csv"), None);
        assert_eq!(
            session_date_from_filename("pen_2025-02-30_2025-03-01.csv"),
            Some(date(2025, 3, 1))
        );
    }

    #[test]
    fn names_without_dates() {
        assert_eq!(session_date_from_filename("bullpen.csv"), None);
        assert_eq!(session_date_from_filename("short"), None);
        assert_eq!(session_date_from_filename(""), None);
        assert_eq!(session_date_from_filename("20250412.csv"), None);
    }

    #[test]
    fn non_ascii_names_do_not_panic() {
        assert_eq!(
            session_date_from_filename("séance_2025-04-12_é.csv"),
            Some(date(2025, 4, 12))
        );
        assert_eq!(session_date_from_filename("ééééééééééé"), None);
    }

    #[test]
    fn resolve_falls_back_to_today() {
        let today = date(2026, 1, 2);
        assert_eq!(resolve_session_date("pen.csv", today), today);
        assert_eq!(resolve_session_date("pen_2025-04-12.csv", today), date(2025, 4, 12));
    }

    #[test]
    fn empty_session_is_rejected() {
        let err = grade_session(&[], date(2025, 4, 12), "x.csv", &Scorer::default()).unwrap_err();
        assert_eq!(err, GradingError::EmptySession);
    }

    #[test]
    fn grades_and_counts_zeroed_rows() {
        let records = vec![
            rec("Smith", "Fastball", Some(35.0), Some(0.0), false),
            rec("Smith", "Fastball", Some(39.5), Some(0.0), false),
            rec("Smith", "Fastball", Some(45.0), Some(0.0), false),
            rec("Jones", "Slider", None, Some(0.0), true),
        ];
        let session =
            grade_session(&records, date(2025, 4, 12), "pen.csv", &Scorer::default()).unwrap();

        assert_eq!(session.pitch_count(), 4);
        assert_eq!(session.zeroed_rows, 1);
        assert_eq!(session.summaries.len(), 2);
        assert_eq!(session.summaries[0].pitcher, "Jones");
        assert_eq!(session.summary_for("Jones").unwrap().grade, Grade::F);
        assert_eq!(session.summary_for("Smith").unwrap().grade, Grade::B);
        assert!(session.summary_for("Nobody").is_none());
        // Scored output keeps input order.
        assert_eq!(session.pitches[3].record.pitcher, "Jones");
    }

    #[test]
    fn to_records_stamps_session_date() {
        let records = vec![
            rec("Smith", "Fastball", Some(35.0), Some(0.0), true),
            rec("Jones", "Curveball", Some(18.0), Some(1.0), true),
        ];
        let d = date(2025, 4, 12);
        let session = grade_session(&records, d, "pen.csv", &Scorer::default()).unwrap();
        let (pitch_rows, summary_rows) = session.to_records();

        assert_eq!(pitch_rows.len(), 2);
        assert!(pitch_rows.iter().all(|r| r.session_date == d));
        assert!(pitch_rows[0].is_fastball);
        assert!(!pitch_rows[1].is_fastball);
        assert_eq!(pitch_rows[1].score, 2);

        assert_eq!(summary_rows.len(), 2);
        assert!(summary_rows.iter().all(|r| r.session_date == d));
        assert_eq!(summary_rows[0].pitcher, "Jones");
    }
}
