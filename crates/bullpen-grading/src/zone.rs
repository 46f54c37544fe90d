// Strike zone geometry and vertical band classification.

use bullpen_core::config::ZoneConfig;

use crate::classify::PitchFamily;

/// Where a pitch crossed the plate vertically, relative to the zone and the
/// buffer band that belongs to its family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalBand {
    /// In the zone, on the half favoured by the family (upper for fastballs,
    /// lower for everything else).
    FavoredHalf,
    /// In the zone, on the other half.
    OtherHalf,
    /// Just outside the zone on the family's side.
    Buffer,
    Outside,
}

/// Immutable strike zone used by the scorer. Build one per grading call;
/// different geometries (youth vs. adult) are just different values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeZone {
    pub bottom: f64,
    pub top: f64,
    pub fb_buffer_top: f64,
    pub nfb_buffer_bottom: f64,
    pub side_left: f64,
    pub side_right: f64,
}

impl Default for StrikeZone {
    fn default() -> Self {
        StrikeZone::from(&ZoneConfig::default())
    }
}

impl From<&ZoneConfig> for StrikeZone {
    fn from(s: &ZoneConfig) -> Self {
        StrikeZone {
            bottom: s.bottom,
            top: s.top,
            fb_buffer_top: s.fb_buffer_top,
            nfb_buffer_bottom: s.nfb_buffer_bottom,
            side_left: s.side_left,
            side_right: s.side_right,
        }
    }
}

impl StrikeZone {
    pub fn midline(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }

    /// Inclusive on both edges.
    pub fn side_in_zone(&self, side: f64) -> bool {
        self.side_left <= side && side <= self.side_right
    }

    /// Inclusive on both edges.
    pub fn height_in_zone(&self, height: f64) -> bool {
        self.bottom <= height && height <= self.top
    }

    /// Fastball buffer: `(top, fb_buffer_top]`. Non-fastball buffer:
    /// `[nfb_buffer_bottom, bottom)`.
    pub fn in_buffer(&self, family: PitchFamily, height: f64) -> bool {
        match family {
            PitchFamily::Fastball => self.top < height && height <= self.fb_buffer_top,
            PitchFamily::NonFastball => self.nfb_buffer_bottom <= height && height < self.bottom,
        }
    }

    /// Classify a height for the given family. A pitch exactly on the
    /// midline falls in the other half for both families.
    pub fn vertical_band(&self, family: PitchFamily, height: f64) -> VerticalBand {
        if self.height_in_zone(height) {
            let favored = match family {
                PitchFamily::Fastball => height > self.midline(),
                PitchFamily::NonFastball => height < self.midline(),
            };
            if favored {
                VerticalBand::FavoredHalf
            } else {
                VerticalBand::OtherHalf
            }
        } else if self.in_buffer(family, height) {
            VerticalBand::Buffer
        } else {
            VerticalBand::Outside
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_midline() {
        let zone = StrikeZone::default();
        assert!((zone.midline() - 28.95).abs() < 1e-9);
    }

    #[test]
    fn side_edges_are_inclusive() {
        let zone = StrikeZone::default();
        assert!(zone.side_in_zone(-8.5));
        assert!(zone.side_in_zone(8.5));
        assert!(!zone.side_in_zone(8.51));
        assert!(!zone.side_in_zone(-9.0));
    }

    #[test]
    fn fastball_bands() {
        let zone = StrikeZone::default();
        let fb = PitchFamily::Fastball;
        assert_eq!(zone.vertical_band(fb, 38.5), VerticalBand::FavoredHalf);
        assert_eq!(zone.vertical_band(fb, 30.0), VerticalBand::FavoredHalf);
        assert_eq!(zone.vertical_band(fb, zone.midline()), VerticalBand::OtherHalf);
        assert_eq!(zone.vertical_band(fb, 19.4), VerticalBand::OtherHalf);
        assert_eq!(zone.vertical_band(fb, 38.6), VerticalBand::Buffer);
        assert_eq!(zone.vertical_band(fb, 40.5), VerticalBand::Buffer);
        assert_eq!(zone.vertical_band(fb, 40.6), VerticalBand::Outside);
        // Below the zone is never buffer for a fastball.
        assert_eq!(zone.vertical_band(fb, 18.0), VerticalBand::Outside);
    }

    #[test]
    fn non_fastball_bands() {
        let zone = StrikeZone::default();
        let nfb = PitchFamily::NonFastball;
        assert_eq!(zone.vertical_band(nfb, 19.4), VerticalBand::FavoredHalf);
        assert_eq!(zone.vertical_band(nfb, zone.midline()), VerticalBand::OtherHalf);
        assert_eq!(zone.vertical_band(nfb, 38.5), VerticalBand::OtherHalf);
        assert_eq!(zone.vertical_band(nfb, 19.3), VerticalBand::Buffer);
        assert_eq!(zone.vertical_band(nfb, 17.4), VerticalBand::Buffer);
        assert_eq!(zone.vertical_band(nfb, 17.3), VerticalBand::Outside);
        // Above the zone is never buffer for a non-fastball.
        assert_eq!(zone.vertical_band(nfb, 39.5), VerticalBand::Outside);
    }

    #[test]
    fn built_from_settings() {
        let settings = ZoneConfig {
            bottom: 16.0,
            top: 32.0,
            ..ZoneConfig::default()
        };
        let zone = StrikeZone::from(&settings);
        assert!((zone.midline() - 24.0).abs() < f64::EPSILON);
        assert!((zone.side_right - 8.5).abs() < f64::EPSILON);
    }
}
