//! Text Zone Discovery module
//!
//! Analyzes a rendered grayscale bitmap (dithered halftone or clean lineart)
//! and finds the best rectangular regions of ink-free pixels where text can
//! be overlaid without intersecting artwork.
//!
//! # Algorithm
//!
//! 1. Reduce the pixel buffer into a coarse cell grid with a white ratio and
//!    a barrier flag per cell
//! 2. Inflate the barrier set by the configured safety margin
//! 3. Derive the boolean usability mask
//! 4. Repeatedly extract the maximal all-usable rectangle (histogram method)
//! 5. Compute strip statistics as an always-available fallback signal
//! 6. Classify the outcome into a placement recommendation
//!
//! # Example
//!
//! ```rust,no_run
//! use livingclock_zones::{AnalysisOptions, TextZoneDetector};
//!
//! let image = image::open("0730_lineart.png").unwrap().to_luma8();
//! let options = AnalysisOptions::lineart();
//!
//! let result = TextZoneDetector::analyze(&image, &options).unwrap();
//! if let Some(zone) = result.zones.first() {
//!     println!("best zone: {}x{} at ({}, {})", zone.width, zone.height, zone.x, zone.y);
//! }
//! println!("recommendation: {:?}", result.recommendation);
//! ```

// Submodules
mod contiguous;
mod grid;
mod max_rect;
mod recommend;
mod strips;
mod types;

// Re-export public API
pub use contiguous::contiguous_regions;
pub use grid::{CellMask, DensityGrid};
pub use max_rect::{extract_zones, largest_rectangle, CellRect};
pub use recommend::classify;
pub use strips::{analyze_strips, best_strip};
pub use types::{
    AnalysisError, AnalysisOptions, AnalysisOptionsBuilder, AnalysisResult, BarrierMode,
    ContiguousRegion, GridShape, OverallStats, Recommendation, Result, StripName, StripStats,
    Zone,
};

use image::GrayImage;
use rayon::prelude::*;
use tracing::debug;

use types::REGION_REPORT_LIMIT;

// ============================================================
// Detector
// ============================================================

/// Text zone detector
///
/// Stateless; every call derives all intermediate grids from the input and
/// discards them on return, so analyses are independent and freely
/// parallelizable.
pub struct TextZoneDetector;

impl TextZoneDetector {
    /// Analyze a single grayscale image.
    ///
    /// Degenerate input (zero dimensions, or a cell size larger than the
    /// image) is a normal outcome: the result carries an empty grid, no
    /// zones, and the dark-image recommendation. Invalid options are
    /// rejected with [`AnalysisError::InvalidOption`].
    pub fn analyze(image: &GrayImage, options: &AnalysisOptions) -> Result<AnalysisResult> {
        options.validate()?;

        let (width, height) = image.dimensions();
        let mut grid = DensityGrid::build(image, options);
        if options.safety_margin > 0 {
            grid.dilate_barriers(options.safety_margin);
        }

        let mask = grid.usability_mask(options.density_threshold);
        let zones = extract_zones(&grid, &mask, options);
        let regions = contiguous_regions(&mask, options.cell_size, REGION_REPORT_LIMIT);
        let strips = analyze_strips(&grid, options.density_threshold);
        let (best_strip_name, best_strip_score) = best_strip(&strips);

        let overall = OverallStats {
            avg_density: grid.mean_density(),
            barrier_ratio: grid.barrier_ratio(),
            high_density_cells: grid.high_density_count(options.density_threshold),
            total_cells: grid.rows() * grid.cols(),
        };

        let recommendation = classify(
            &zones,
            best_strip_name,
            best_strip_score,
            overall.avg_density,
            height,
            options,
        );

        debug!(
            zones = zones.len(),
            regions = regions.len(),
            ?recommendation,
            "zone analysis complete"
        );

        Ok(AnalysisResult {
            image_size: (width, height),
            grid: GridShape {
                rows: grid.rows(),
                cols: grid.cols(),
                cell_size: options.cell_size,
            },
            overall,
            strips,
            best_strip: best_strip_name,
            best_strip_score,
            zones,
            regions,
            recommendation,
        })
    }

    /// Analyze a batch of already-decoded images in parallel.
    ///
    /// Results come back in input order. Options are validated once before
    /// the fan-out; images themselves cannot fail.
    pub fn analyze_batch(
        images: &[GrayImage],
        options: &AnalysisOptions,
    ) -> Result<Vec<AnalysisResult>> {
        options.validate()?;
        images
            .par_iter()
            .map(|image| Self::analyze(image, options))
            .collect()
    }
}
