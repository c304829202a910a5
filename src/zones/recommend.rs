//! Placement recommendation
//!
//! Maps the zone and strip outcome of one analysis to a single placement
//! category for the firmware. Pure function of its inputs; rules are
//! evaluated in order and the first match wins.

use super::types::{AnalysisOptions, Recommendation, StripName, Zone};

/// Classify the analysis outcome into a placement recommendation.
///
/// 1. An adequate top zone decides by its vertical position (image thirds).
/// 2. Otherwise a strip whose score clears the margin decides.
/// 3. Otherwise a light-enough image gets the overlay fallback (text on a
///    background plate).
/// 4. Otherwise the image is too dark for any placement.
pub fn classify(
    zones: &[Zone],
    best_strip: StripName,
    best_strip_score: f32,
    overall_density: f32,
    image_height: u32,
    options: &AnalysisOptions,
) -> Recommendation {
    if let Some(zone) = zones.first() {
        if zone.area > options.adequate_zone_area {
            let upper_band = image_height / 3;
            let lower_band = 2 * image_height / 3;
            return if zone.y < upper_band {
                Recommendation::ZoneTop
            } else if zone.y > lower_band {
                Recommendation::ZoneBottom
            } else {
                Recommendation::ZoneCenter
            };
        }
    }

    if best_strip_score > options.strip_score_margin {
        return match best_strip {
            StripName::Top => Recommendation::StripTop,
            StripName::Middle => Recommendation::StripMiddle,
            StripName::Bottom => Recommendation::StripBottom,
        };
    }

    if overall_density > options.overlay_density {
        return Recommendation::OverlayWithBg;
    }

    Recommendation::DarkImage
}
