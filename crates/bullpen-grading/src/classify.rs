// Pitch family classification from free-text pitch type tags.

use bullpen_core::config::{ClassifierConfig, FamilyMatchMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchFamily {
    Fastball,
    NonFastball,
}

impl PitchFamily {
    pub fn is_fastball(&self) -> bool {
        matches!(self, PitchFamily::Fastball)
    }
}

/// Decides whether a pitch-type tag belongs to the fastball family.
///
/// Anything that matches none of the patterns, including empty or
/// unrecognised text, is `NonFastball`.
#[derive(Debug, Clone)]
pub struct FamilyClassifier {
    /// Lowercased family names.
    patterns: Vec<String>,
    mode: FamilyMatchMode,
}

impl Default for FamilyClassifier {
    fn default() -> Self {
        FamilyClassifier::from(&ClassifierConfig::default())
    }
}

impl From<&ClassifierConfig> for FamilyClassifier {
    fn from(settings: &ClassifierConfig) -> Self {
        FamilyClassifier::new(&settings.fastball_families, settings.match_mode)
    }
}

impl FamilyClassifier {
    pub fn new<S: AsRef<str>>(patterns: &[S], mode: FamilyMatchMode) -> Self {
        FamilyClassifier {
            patterns: patterns
                .iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
            mode,
        }
    }

    pub fn classify(&self, pitch_type: &str) -> PitchFamily {
        let text = pitch_type.to_lowercase();
        let matched = match self.mode {
            FamilyMatchMode::Substring => self.patterns.iter().any(|p| text.contains(p.as_str())),
            FamilyMatchMode::Token => text
                .split(|c: char| !c.is_alphanumeric())
                .filter(|t| !t.is_empty())
                .any(|token| self.patterns.iter().any(|p| p == token)),
        };
        if matched {
            PitchFamily::Fastball
        } else {
            PitchFamily::NonFastball
        }
    }
}
