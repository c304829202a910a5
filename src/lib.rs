//! livingclock-zones - text placement zone discovery for clock-face artwork
//!
//! Analyzes rendered bitmaps (dithered halftone or clean lineart) headed for
//! a low-resolution display and finds rectangular regions free of dark ink
//! where text can be overlaid without intersecting the artwork. Decoding,
//! resizing, thresholding, and report writing live outside this crate; the
//! engine takes a decoded grayscale buffer and returns a structured result.
//!
//! # Example
//!
//! ```rust,no_run
//! use livingclock_zones::{AnalysisOptions, TextZoneDetector};
//!
//! let image = image::open("0730_dither.png").unwrap().to_luma8();
//! let result = TextZoneDetector::analyze(&image, &AnalysisOptions::default()).unwrap();
//!
//! println!("{} zones, recommendation {:?}", result.zones.len(), result.recommendation);
//! ```

pub mod region_grid;
pub mod zones;

// Re-export the zone engine API at the crate root
pub use zones::{
    analyze_strips, best_strip, classify, contiguous_regions, extract_zones, largest_rectangle,
    AnalysisError, AnalysisOptions, AnalysisOptionsBuilder, AnalysisResult, BarrierMode, CellMask,
    CellRect, ContiguousRegion, DensityGrid, GridShape, OverallStats, Recommendation, StripName,
    StripStats, TextZoneDetector, Zone,
};

// Regional brightness analysis
pub use region_grid::{
    analyze_region_grid, BrightnessStats, RegionGridAnalysis, RegionGridError, RegionGridOptions,
    RegionStats,
};
