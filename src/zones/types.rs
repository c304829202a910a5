//! Zone analysis core types
//!
//! Contains the configuration record, error types, and the result aggregates
//! consumed by external report writers.

use serde::Serialize;
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Default analysis cell size in pixels
pub const DEFAULT_CELL_SIZE: u32 = 8;

/// Default white pixel threshold for dithered artwork (0-255)
pub const DEFAULT_WHITE_THRESHOLD: u8 = 200;

/// Default black pixel threshold for dithered artwork (0-255)
pub const DEFAULT_BLACK_THRESHOLD: u8 = 60;

/// White threshold for clean lineart (only near-pure white is safe)
pub const LINEART_WHITE_THRESHOLD: u8 = 250;

/// Black threshold for clean lineart (anything visibly dark is a line)
pub const LINEART_BLACK_THRESHOLD: u8 = 200;

/// Default cell white ratio required for text placement
pub const DEFAULT_DENSITY_THRESHOLD: f32 = 0.70;

/// Strict density threshold for lineart (near-pure white cells only)
pub const LINEART_DENSITY_THRESHOLD: f32 = 0.98;

/// Default fraction of black pixels tolerated per cell in strict mode
pub const DEFAULT_BLACK_TOLERANCE: f32 = 0.02;

/// Safety margin (in cells) kept clear around barriers in the lineart preset
pub const LINEART_SAFETY_MARGIN: u32 = 2;

/// Default minimum zone width in pixels
pub const DEFAULT_MIN_ZONE_WIDTH: u32 = 120;

/// Default minimum zone height in pixels
pub const DEFAULT_MIN_ZONE_HEIGHT: u32 = 40;

/// Default maximum number of zones extracted per image
pub const DEFAULT_MAX_ZONES: usize = 5;

/// Default pixel area above which a zone alone decides the recommendation
pub const DEFAULT_ADEQUATE_ZONE_AREA: u32 = 10_000;

/// Adequate zone area for the lineart preset
pub const LINEART_ADEQUATE_ZONE_AREA: u32 = 15_000;

/// Default strip score margin for the strip fallback recommendation
pub const DEFAULT_STRIP_SCORE_MARGIN: f32 = 0.3;

/// Default overall density above which overlay-with-background is viable
pub const DEFAULT_OVERLAY_DENSITY: f32 = 0.5;

/// Number of contiguous regions reported per image
pub const REGION_REPORT_LIMIT: usize = 5;

// ============================================================
// Error Types
// ============================================================

/// Zone analysis error types
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid option {0}: {1}")]
    InvalidOption(&'static str, String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

// ============================================================
// Options
// ============================================================

/// Barrier detection policy applied per grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarrierMode {
    /// A cell is a barrier when black pixels dominate it (dithered artwork)
    #[default]
    Tolerant,
    /// A cell is a barrier when black pixels exceed `black_tolerance`;
    /// barrier cells report zero density (clean lineart, text must never
    /// cross a line)
    Strict,
}

/// Zone analysis options
///
/// One record carries every tunable; components never read global state.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Cell size in pixels (grid resolution)
    pub cell_size: u32,
    /// Pixels at or above this value count as white (0-255)
    pub white_threshold: u8,
    /// Pixels at or below this value count as black (0-255)
    pub black_threshold: u8,
    /// Barrier detection policy
    pub barrier_mode: BarrierMode,
    /// Fraction of black pixels tolerated per cell in strict mode (0.0-1.0)
    pub black_tolerance: f32,
    /// Cell white ratio required for text placement (0.0-1.0)
    pub density_threshold: f32,
    /// Barrier dilation radius in cells (Chebyshev distance)
    pub safety_margin: u32,
    /// Minimum zone width in pixels
    pub min_zone_width: u32,
    /// Minimum zone height in pixels
    pub min_zone_height: u32,
    /// Maximum number of zones extracted per image
    pub max_zones: usize,
    /// Pixel area above which the top zone alone decides the recommendation
    pub adequate_zone_area: u32,
    /// Strip score required for a strip fallback recommendation
    pub strip_score_margin: f32,
    /// Overall density above which overlay-with-background is recommended
    pub overlay_density: f32,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            white_threshold: DEFAULT_WHITE_THRESHOLD,
            black_threshold: DEFAULT_BLACK_THRESHOLD,
            barrier_mode: BarrierMode::Tolerant,
            black_tolerance: DEFAULT_BLACK_TOLERANCE,
            density_threshold: DEFAULT_DENSITY_THRESHOLD,
            safety_margin: 0,
            min_zone_width: DEFAULT_MIN_ZONE_WIDTH,
            min_zone_height: DEFAULT_MIN_ZONE_HEIGHT,
            max_zones: DEFAULT_MAX_ZONES,
            adequate_zone_area: DEFAULT_ADEQUATE_ZONE_AREA,
            strip_score_margin: DEFAULT_STRIP_SCORE_MARGIN,
            overlay_density: DEFAULT_OVERLAY_DENSITY,
        }
    }
}

impl AnalysisOptions {
    /// Create a new options builder
    pub fn builder() -> AnalysisOptionsBuilder {
        AnalysisOptionsBuilder::default()
    }

    /// Create options for clean lineart artwork.
    ///
    /// Crisp black lines on pure white: any visibly dark cell becomes a
    /// barrier, and barriers are inflated by a two-cell safety margin so
    /// text keeps clear of line edges.
    pub fn lineart() -> Self {
        Self {
            white_threshold: LINEART_WHITE_THRESHOLD,
            black_threshold: LINEART_BLACK_THRESHOLD,
            barrier_mode: BarrierMode::Strict,
            density_threshold: LINEART_DENSITY_THRESHOLD,
            safety_margin: LINEART_SAFETY_MARGIN,
            adequate_zone_area: LINEART_ADEQUATE_ZONE_AREA,
            ..Default::default()
        }
    }

    /// Create options for dithered halftone artwork (same as `default()`)
    pub fn dither() -> Self {
        Self::default()
    }

    /// Validate the options, failing fast on any out-of-range value.
    ///
    /// Invalid configuration is a contract violation and is rejected with a
    /// descriptive error rather than silently clamped.
    pub fn validate(&self) -> Result<()> {
        if self.cell_size == 0 {
            return Err(AnalysisError::InvalidOption(
                "cell_size",
                "must be at least 1 pixel".to_string(),
            ));
        }
        if self.min_zone_width == 0 {
            return Err(AnalysisError::InvalidOption(
                "min_zone_width",
                "must be at least 1 pixel".to_string(),
            ));
        }
        if self.min_zone_height == 0 {
            return Err(AnalysisError::InvalidOption(
                "min_zone_height",
                "must be at least 1 pixel".to_string(),
            ));
        }
        for (name, value) in [
            ("density_threshold", self.density_threshold),
            ("black_tolerance", self.black_tolerance),
            ("overlay_density", self.overlay_density),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AnalysisError::InvalidOption(
                    name,
                    format!("{} is outside [0.0, 1.0]", value),
                ));
            }
        }
        Ok(())
    }
}

/// Builder for AnalysisOptions
///
/// Setters store values as given; range checking happens in
/// [`AnalysisOptions::validate`] at analysis time.
#[derive(Debug, Default)]
pub struct AnalysisOptionsBuilder {
    options: AnalysisOptions,
}

impl AnalysisOptionsBuilder {
    /// Set cell size in pixels
    #[must_use]
    pub fn cell_size(mut self, size: u32) -> Self {
        self.options.cell_size = size;
        self
    }

    /// Set white pixel threshold (0-255)
    #[must_use]
    pub fn white_threshold(mut self, threshold: u8) -> Self {
        self.options.white_threshold = threshold;
        self
    }

    /// Set black pixel threshold (0-255)
    #[must_use]
    pub fn black_threshold(mut self, threshold: u8) -> Self {
        self.options.black_threshold = threshold;
        self
    }

    /// Set barrier detection policy
    #[must_use]
    pub fn barrier_mode(mut self, mode: BarrierMode) -> Self {
        self.options.barrier_mode = mode;
        self
    }

    /// Set strict-mode black tolerance (0.0-1.0)
    #[must_use]
    pub fn black_tolerance(mut self, tolerance: f32) -> Self {
        self.options.black_tolerance = tolerance;
        self
    }

    /// Set required cell density (0.0-1.0)
    #[must_use]
    pub fn density_threshold(mut self, threshold: f32) -> Self {
        self.options.density_threshold = threshold;
        self
    }

    /// Set barrier dilation radius in cells
    #[must_use]
    pub fn safety_margin(mut self, margin: u32) -> Self {
        self.options.safety_margin = margin;
        self
    }

    /// Set minimum zone width in pixels
    #[must_use]
    pub fn min_zone_width(mut self, width: u32) -> Self {
        self.options.min_zone_width = width;
        self
    }

    /// Set minimum zone height in pixels
    #[must_use]
    pub fn min_zone_height(mut self, height: u32) -> Self {
        self.options.min_zone_height = height;
        self
    }

    /// Set maximum number of zones
    #[must_use]
    pub fn max_zones(mut self, count: usize) -> Self {
        self.options.max_zones = count;
        self
    }

    /// Set the adequate zone pixel area
    #[must_use]
    pub fn adequate_zone_area(mut self, area: u32) -> Self {
        self.options.adequate_zone_area = area;
        self
    }

    /// Set the strip score margin
    #[must_use]
    pub fn strip_score_margin(mut self, margin: f32) -> Self {
        self.options.strip_score_margin = margin;
        self
    }

    /// Set the overlay density threshold (0.0-1.0)
    #[must_use]
    pub fn overlay_density(mut self, density: f32) -> Self {
        self.options.overlay_density = density;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> AnalysisOptions {
        self.options
    }
}

// ============================================================
// Result Aggregates
// ============================================================

/// Grid shape derived from the image dimensions and cell size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
    pub cell_size: u32,
}

/// Candidate rectangular text placement region, in pixel coordinates
/// (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Zone {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Pixel area (`width * height`)
    pub area: u32,
    /// Mean white ratio over the covered cells
    pub avg_density: f32,
}

/// Whole-grid density statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverallStats {
    /// Mean white ratio over all cells
    pub avg_density: f32,
    /// Fraction of cells flagged as barriers
    pub barrier_ratio: f32,
    /// Number of cells at or above the density threshold
    pub high_density_cells: usize,
    /// Total number of grid cells
    pub total_cells: usize,
}

/// Horizontal strip identifier (image thirds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StripName {
    Top,
    Middle,
    Bottom,
}

/// Coarse per-strip statistics used as a fallback placement signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StripStats {
    pub name: StripName,
    /// Mean white ratio over the strip's cells
    pub avg_density: f32,
    /// Fraction of strip cells at or above the density threshold
    pub high_density_ratio: f32,
    /// Fraction of strip cells flagged as barriers
    pub barrier_ratio: f32,
}

impl StripStats {
    /// Strip placement score; higher is better
    pub fn score(&self) -> f32 {
        self.high_density_ratio - self.barrier_ratio
    }
}

/// Connected region of usable cells, in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContiguousRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Number of usable cells in the region
    pub cell_count: usize,
    /// `cell_count` over the bounding box cell area
    pub fill_ratio: f32,
}

/// Text placement recommendation
///
/// Serialized with the report labels the firmware expects
/// (`ZONE_TOP`, `STRIP_MIDDLE`, `OVERLAY_WITH_BG`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    /// Best zone sits in the top third of the image
    ZoneTop,
    /// Best zone sits in the middle third
    ZoneCenter,
    /// Best zone sits in the bottom third
    ZoneBottom,
    /// No adequate zone; the top strip is the best placement
    StripTop,
    /// No adequate zone; the middle strip is the best placement
    StripMiddle,
    /// No adequate zone; the bottom strip is the best placement
    StripBottom,
    /// Image is light enough overall, but text needs a background plate
    OverlayWithBg,
    /// Dark image, no usable placement
    DarkImage,
}

/// Aggregate result of one zone analysis call
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Image dimensions (width, height) in pixels
    pub image_size: (u32, u32),
    /// Derived grid shape
    pub grid: GridShape,
    /// Whole-grid statistics
    pub overall: OverallStats,
    /// Per-strip statistics (top, middle, bottom)
    pub strips: Vec<StripStats>,
    /// Strip with the best placement score
    pub best_strip: StripName,
    /// Score of the best strip
    pub best_strip_score: f32,
    /// Ranked text zones, non-increasing area, pairwise disjoint
    pub zones: Vec<Zone>,
    /// Largest contiguous usable regions (informational)
    pub regions: Vec<ContiguousRegion>,
    /// Placement recommendation
    pub recommendation: Recommendation,
}
