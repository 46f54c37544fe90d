// Pitch scoring and session grading engine.
//
// Raw pitch rows flow one way: ingest -> score -> aggregate -> summaries.
// Nothing here touches storage or the terminal; callers hand the resulting
// records to a `SessionStore` and to whatever renders them.

pub mod aggregate;
pub mod classify;
pub mod error;
pub mod grade;
pub mod ingest;
pub mod pitch;
pub mod score;
pub mod session;
pub mod trend;
pub mod zone;
