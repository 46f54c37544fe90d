// Structural contract violations. Per-row data problems (missing location,
// unknown pitch type) never surface here; they degrade to a zero score.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GradingError {
    #[error("pitch record has no pitcher identifier")]
    MissingPitcher,

    #[error("cannot grade a session with no pitches")]
    EmptySession,
}
