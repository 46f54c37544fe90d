// Plain record shapes handed from the grading engine to storage and rendering.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Letter grade for a pitcher's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            "F" => Ok(Grade::F),
            other => Err(format!("unknown grade '{other}'")),
        }
    }
}

/// Mutually exclusive visual bucket for a scored pitch, so a renderer can
/// pick a glyph without re-deriving the scoring rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchCategory {
    Zero,
    OnePoint,
    TwoPoint,
    /// Buffer-zone pitch that also earned the finish bonus.
    FinishBonus,
}

impl PitchCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PitchCategory::Zero => "zero",
            PitchCategory::OnePoint => "one-point",
            PitchCategory::TwoPoint => "two-point",
            PitchCategory::FinishBonus => "finish-bonus",
        }
    }
}

impl fmt::Display for PitchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PitchCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero" => Ok(PitchCategory::Zero),
            "one-point" => Ok(PitchCategory::OnePoint),
            "two-point" => Ok(PitchCategory::TwoPoint),
            "finish-bonus" => Ok(PitchCategory::FinishBonus),
            other => Err(format!("unknown pitch category '{other}'")),
        }
    }
}

/// One scored pitch, ready for insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchRow {
    pub pitcher: String,
    pub pitch_type: String,
    pub height_inches: Option<f64>,
    pub side_inches: Option<f64>,
    pub is_fastball: bool,
    pub is_finish: bool,
    pub score: u8,
    pub category: PitchCategory,
    pub session_date: NaiveDate,
}

/// One pitcher's session summary, ready for insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub pitcher: String,
    pub session_date: NaiveDate,
    pub total_pitches: u32,
    pub finish_pitches: u32,
    pub avg_score: f64,
    pub points_per_pitch: f64,
    pub max_possible: u32,
    pub grade_percent: f64,
    pub grade: Grade,
}

/// Result of handing a session to a store. Pitchers whose
/// `(pitcher, session_date)` pair was already stored are skipped whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreOutcome {
    pub inserted: Vec<String>,
    pub skipped: Vec<String>,
}

/// Storage seam for scored sessions.
pub trait SessionStore {
    fn record_session(
        &self,
        pitches: &[PitchRow],
        summaries: &[SummaryRow],
    ) -> anyhow::Result<StoreOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_display_and_parse_agree() {
        for grade in [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F] {
            assert_eq!(grade.to_string().parse::<Grade>().unwrap(), grade);
        }
        assert_eq!(" b ".parse::<Grade>().unwrap(), Grade::B);
        assert!("E".parse::<Grade>().is_err());
    }

    #[test]
    fn grades_order_best_first() {
        assert!(Grade::A < Grade::B);
        assert!(Grade::D < Grade::F);
    }

    #[test]
    fn category_parse_rejects_unknown() {
        assert_eq!(
            "finish-bonus".parse::<PitchCategory>().unwrap(),
            PitchCategory::FinishBonus
        );
        assert!("three-point".parse::<PitchCategory>().is_err());
    }
}
