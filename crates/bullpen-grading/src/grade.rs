// Letter grade thresholds.

pub use bullpen_core::records::Grade;

/// Lower bounds (exclusive) for each passing grade.
pub const A_THRESHOLD: f64 = 0.80;
pub const B_THRESHOLD: f64 = 0.65;
pub const C_THRESHOLD: f64 = 0.50;
pub const D_THRESHOLD: f64 = 0.35;

/// Map a fraction-of-maximum onto a letter. Each bound is exclusive below
/// and inclusive above, so exactly 0.80 is a B and exactly 0.35 is an F.
/// Values above 1.0 are still an A.
pub fn grade_for_percent(percent: f64) -> Grade {
    if percent > A_THRESHOLD {
        Grade::A
    } else if percent > B_THRESHOLD {
        Grade::B
    } else if percent > C_THRESHOLD {
        Grade::C
    } else if percent > D_THRESHOLD {
        Grade::D
    } else {
        Grade::F
    }
}
