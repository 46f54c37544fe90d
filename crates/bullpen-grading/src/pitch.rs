// Pitch records before and after scoring.

use bullpen_core::records::{PitchCategory, PitchRow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::classify::PitchFamily;
use crate::error::GradingError;

pub const INCHES_PER_FOOT: f64 = 12.0;

/// Convert a plate-location measurement from feet to inches.
pub fn feet_to_inches(feet: f64) -> f64 {
    feet * INCHES_PER_FOOT
}

/// One thrown pitch as it arrives from the session file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchRecord {
    pub pitcher: String,
    pub pitch_type: String,
    pub height_inches: Option<f64>,
    pub side_inches: Option<f64>,
    pub is_finish: bool,
}

impl PitchRecord {
    /// Build a record, rejecting a blank pitcher. The pitcher string is kept
    /// exactly as given; grouping is case- and whitespace-sensitive.
    /// Non-finite coordinates are treated as missing.
    pub fn new(
        pitcher: impl Into<String>,
        pitch_type: impl Into<String>,
        height_inches: Option<f64>,
        side_inches: Option<f64>,
        is_finish: bool,
    ) -> Result<Self, GradingError> {
        let pitcher = pitcher.into();
        if pitcher.trim().is_empty() {
            return Err(GradingError::MissingPitcher);
        }
        Ok(PitchRecord {
            pitcher,
            pitch_type: pitch_type.into(),
            height_inches: height_inches.filter(|v| v.is_finite()),
            side_inches: side_inches.filter(|v| v.is_finite()),
            is_finish,
        })
    }

    pub fn has_location(&self) -> bool {
        self.height_inches.is_some() && self.side_inches.is_some()
    }
}

/// A pitch with everything the scorer derived from it. Never mutated after
/// scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPitch {
    pub record: PitchRecord,
    pub family: PitchFamily,
    /// Realizable values are 0, 1 and 2.
    pub score: u8,
    /// Scored through the family's buffer band (inside the plate horizontally).
    pub in_finish_buffer: bool,
    /// Height lies in the family's buffer band, ignoring side. Raises the
    /// pitcher's ceiling by one point whether or not the pitch was flagged.
    pub buffer_eligible: bool,
    pub finish_bonus: bool,
    pub category: PitchCategory,
}

impl ScoredPitch {
    pub fn is_fastball(&self) -> bool {
        self.family.is_fastball()
    }

    pub fn to_row(&self, session_date: NaiveDate) -> PitchRow {
        PitchRow {
            pitcher: self.record.pitcher.clone(),
            pitch_type: self.record.pitch_type.clone(),
            height_inches: self.record.height_inches,
            side_inches: self.record.side_inches,
            is_fastball: self.is_fastball(),
            is_finish: self.record.is_finish,
            score: self.score,
            category: self.category,
            session_date,
        }
    }
}
