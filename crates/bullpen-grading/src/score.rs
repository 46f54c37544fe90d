// Per-pitch quality scoring against the strike zone.
//
// Scoring rules:
// - no location, or outside the plate horizontally: 0
// - in zone: 2 on the family's favoured half, else 1
// - in the family's buffer band: 1, plus 1 more when finish-flagged
// - anywhere else: 0
//
// The in-zone and buffer paths are exclusive, so a pitch scores 0, 1 or 2.

use bullpen_core::config::Config;
use bullpen_core::records::PitchCategory;

use crate::classify::{FamilyClassifier, PitchFamily};
use crate::pitch::{PitchRecord, ScoredPitch};
use crate::zone::{StrikeZone, VerticalBand};

/// Highest score a single pitch can realize.
pub const MAX_PITCH_SCORE: u8 = 2;

/// Stateless pitch scorer. Holds only immutable geometry and the family
/// classifier, so one instance can grade any number of sessions.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    zone: StrikeZone,
    classifier: FamilyClassifier,
}

impl Scorer {
    pub fn new(zone: StrikeZone, classifier: FamilyClassifier) -> Self {
        Scorer { zone, classifier }
    }

    pub fn from_config(config: &Config) -> Self {
        Scorer::new(
            StrikeZone::from(&config.zone),
            FamilyClassifier::from(&config.classifier),
        )
    }

    pub fn zone(&self) -> &StrikeZone {
        &self.zone
    }

    pub fn classify(&self, pitch_type: &str) -> PitchFamily {
        self.classifier.classify(pitch_type)
    }

    /// Quality score for one pitch.
    pub fn score(&self, pitch: &PitchRecord) -> u8 {
        self.score_pitch(pitch).score
    }

    /// Score a pitch and keep everything derived along the way.
    pub fn score_pitch(&self, pitch: &PitchRecord) -> ScoredPitch {
        let family = self.classify(&pitch.pitch_type);

        let buffer_eligible = pitch
            .height_inches
            .is_some_and(|h| self.zone.in_buffer(family, h));

        let band = match (pitch.height_inches, pitch.side_inches) {
            (Some(h), Some(s)) if self.zone.side_in_zone(s) => {
                Some(self.zone.vertical_band(family, h))
            }
            _ => None,
        };

        let (base, in_finish_buffer) = match band {
            Some(VerticalBand::FavoredHalf) => (2, false),
            Some(VerticalBand::OtherHalf) => (1, false),
            Some(VerticalBand::Buffer) => (1, true),
            Some(VerticalBand::Outside) | None => (0, false),
        };

        let finish_bonus = pitch.is_finish && in_finish_buffer;
        let score = base + u8::from(finish_bonus);

        let category = if finish_bonus {
            PitchCategory::FinishBonus
        } else {
            match score {
                0 => PitchCategory::Zero,
                1 => PitchCategory::OnePoint,
                _ => PitchCategory::TwoPoint,
            }
        };

        ScoredPitch {
            record: pitch.clone(),
            family,
            score,
            in_finish_buffer,
            buffer_eligible,
            finish_bonus,
            category,
        }
    }

    /// Score a batch, preserving input order.
    pub fn score_all(&self, pitches: &[PitchRecord]) -> Vec<ScoredPitch> {
        pitches.iter().map(|p| self.score_pitch(p)).collect()
    }
}
