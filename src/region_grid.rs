//! Coarse regional brightness analysis
//!
//! # Overview
//!
//! Divides the raw pixel buffer into a small M×K region grid and reports
//! per-region white/light ratios and brightness, plus whole-image brightness
//! statistics and a 16-bucket histogram matching the 4-bit depth of the
//! target display. This is a cheap first-pass signal for sorting artwork
//! before the full zone analysis runs.
//!
//! # Example
//!
//! ```ignore
//! use livingclock_zones::region_grid::{analyze_region_grid, RegionGridOptions};
//!
//! let analysis = analyze_region_grid(&gray_image, &RegionGridOptions::default())?;
//! for region in &analysis.best_regions {
//!     println!("({}, {}) light={:.2}", region.row, region.col, region.light_ratio);
//! }
//! ```

use image::GrayImage;
use serde::Serialize;
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Default number of region rows
pub const DEFAULT_REGION_ROWS: u32 = 3;

/// Default number of region columns
pub const DEFAULT_REGION_COLS: u32 = 4;

/// Pixels at or above this value are "white" (0-255)
pub const DEFAULT_WHITE_THRESHOLD: u8 = 200;

/// Pixels at or above this value are "light" (0-255)
pub const DEFAULT_LIGHT_THRESHOLD: u8 = 160;

/// Pixels at or below this value are "dark" (0-255)
pub const DEFAULT_DARK_THRESHOLD: u8 = 80;

/// Light ratio above which a region is flagged suitable for text
pub const DEFAULT_SUITABLE_LIGHT_RATIO: f32 = 0.6;

/// Light ratio floor for the best-region shortlist
const BEST_REGION_LIGHT_FLOOR: f32 = 0.5;

/// Number of regions in the best-region shortlist
const BEST_REGION_LIMIT: usize = 3;

// ============================================================
// Error Types
// ============================================================

/// Regional analysis error types
#[derive(Debug, Error)]
pub enum RegionGridError {
    #[error("Invalid option {0}: {1}")]
    InvalidOption(&'static str, String),
}

pub type Result<T> = std::result::Result<T, RegionGridError>;

// ============================================================
// Options
// ============================================================

/// Options for regional brightness analysis
#[derive(Debug, Clone)]
pub struct RegionGridOptions {
    /// Number of region rows
    pub rows: u32,
    /// Number of region columns
    pub cols: u32,
    /// White pixel threshold (0-255)
    pub white_threshold: u8,
    /// Light pixel threshold (0-255)
    pub light_threshold: u8,
    /// Dark pixel threshold (0-255)
    pub dark_threshold: u8,
    /// Light ratio above which a region is text-suitable (0.0-1.0)
    pub suitable_light_ratio: f32,
}

impl Default for RegionGridOptions {
    fn default() -> Self {
        Self {
            rows: DEFAULT_REGION_ROWS,
            cols: DEFAULT_REGION_COLS,
            white_threshold: DEFAULT_WHITE_THRESHOLD,
            light_threshold: DEFAULT_LIGHT_THRESHOLD,
            dark_threshold: DEFAULT_DARK_THRESHOLD,
            suitable_light_ratio: DEFAULT_SUITABLE_LIGHT_RATIO,
        }
    }
}

impl RegionGridOptions {
    /// Create options with a custom region grid shape
    pub fn with_grid(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.rows == 0 {
            return Err(RegionGridError::InvalidOption(
                "rows",
                "must be at least 1".to_string(),
            ));
        }
        if self.cols == 0 {
            return Err(RegionGridError::InvalidOption(
                "cols",
                "must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.suitable_light_ratio) {
            return Err(RegionGridError::InvalidOption(
                "suitable_light_ratio",
                format!("{} is outside [0.0, 1.0]", self.suitable_light_ratio),
            ));
        }
        Ok(())
    }
}

// ============================================================
// Results
// ============================================================

/// Brightness statistics for one region of the image
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionStats {
    pub row: u32,
    pub col: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Fraction of white pixels
    pub white_ratio: f32,
    /// Fraction of light pixels
    pub light_ratio: f32,
    /// Mean pixel value
    pub mean_brightness: f32,
    /// Whether the region is light enough for text
    pub text_suitable: bool,
}

/// Whole-image brightness statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BrightnessStats {
    pub white_ratio: f32,
    pub light_ratio: f32,
    pub dark_ratio: f32,
    pub mean_brightness: f32,
    pub std_brightness: f32,
}

/// Result of one regional brightness analysis
#[derive(Debug, Clone, Serialize)]
pub struct RegionGridAnalysis {
    /// Image dimensions (width, height) in pixels
    pub image_size: (u32, u32),
    /// Whole-image statistics
    pub overall: BrightnessStats,
    /// Pixel counts per 16-level brightness bucket
    pub histogram: [u32; 16],
    /// Per-region statistics, row-major
    pub regions: Vec<RegionStats>,
    /// Lightest regions, best first
    pub best_regions: Vec<RegionStats>,
}

// ============================================================
// Analysis
// ============================================================

/// Analyze regional brightness of a grayscale image.
///
/// An image too small for the requested grid (region width or height of
/// zero) yields empty region lists; overall statistics are still computed.
pub fn analyze_region_grid(
    image: &GrayImage,
    options: &RegionGridOptions,
) -> Result<RegionGridAnalysis> {
    options.validate()?;

    let (width, height) = image.dimensions();
    let overall = overall_stats(image, options);
    let histogram = histogram16(image);

    let region_height = height / options.rows;
    let region_width = width / options.cols;

    let mut regions = Vec::new();
    if region_width > 0 && region_height > 0 {
        for row in 0..options.rows {
            for col in 0..options.cols {
                regions.push(region_stats(
                    image,
                    options,
                    row,
                    col,
                    region_width,
                    region_height,
                ));
            }
        }
    }

    let mut best_regions: Vec<RegionStats> = regions
        .iter()
        .copied()
        .filter(|r| r.light_ratio > BEST_REGION_LIGHT_FLOOR)
        .collect();
    best_regions.sort_by(|a, b| {
        b.light_ratio
            .partial_cmp(&a.light_ratio)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    best_regions.truncate(BEST_REGION_LIMIT);

    Ok(RegionGridAnalysis {
        image_size: (width, height),
        overall,
        histogram,
        regions,
        best_regions,
    })
}

/// Count pixels per 16-level brightness bucket (4-bit display depth)
pub fn histogram16(image: &GrayImage) -> [u32; 16] {
    let mut buckets = [0u32; 16];
    for pixel in image.pixels() {
        buckets[(pixel.0[0] >> 4) as usize] += 1;
    }
    buckets
}

fn overall_stats(image: &GrayImage, options: &RegionGridOptions) -> BrightnessStats {
    let mut white = 0u64;
    let mut light = 0u64;
    let mut dark = 0u64;

    // Welford's online algorithm for mean and variance
    let mut count = 0u64;
    let mut mean = 0.0f64;
    let mut m2 = 0.0f64;

    for pixel in image.pixels() {
        let value = pixel.0[0];
        if value >= options.white_threshold {
            white += 1;
        }
        if value >= options.light_threshold {
            light += 1;
        }
        if value <= options.dark_threshold {
            dark += 1;
        }

        count += 1;
        let delta = value as f64 - mean;
        mean += delta / count as f64;
        let delta2 = value as f64 - mean;
        m2 += delta * delta2;
    }

    if count == 0 {
        return BrightnessStats {
            white_ratio: 0.0,
            light_ratio: 0.0,
            dark_ratio: 0.0,
            mean_brightness: 0.0,
            std_brightness: 0.0,
        };
    }

    BrightnessStats {
        white_ratio: white as f32 / count as f32,
        light_ratio: light as f32 / count as f32,
        dark_ratio: dark as f32 / count as f32,
        mean_brightness: mean as f32,
        std_brightness: (m2 / count as f64).sqrt() as f32,
    }
}

fn region_stats(
    image: &GrayImage,
    options: &RegionGridOptions,
    row: u32,
    col: u32,
    region_width: u32,
    region_height: u32,
) -> RegionStats {
    let x0 = col * region_width;
    let y0 = row * region_height;

    let mut white = 0u64;
    let mut light = 0u64;
    let mut sum = 0u64;

    for y in y0..y0 + region_height {
        for x in x0..x0 + region_width {
            let value = image.get_pixel(x, y).0[0];
            if value >= options.white_threshold {
                white += 1;
            }
            if value >= options.light_threshold {
                light += 1;
            }
            sum += value as u64;
        }
    }

    let total = (region_width * region_height) as f32;
    let light_ratio = light as f32 / total;

    RegionStats {
        row,
        col,
        x: x0,
        y: y0,
        width: region_width,
        height: region_height,
        white_ratio: white as f32 / total,
        light_ratio,
        mean_brightness: sum as f32 / total,
        text_suitable: light_ratio > options.suitable_light_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma};

    #[test]
    fn test_uniform_white_image() {
        let image: GrayImage = ImageBuffer::from_pixel(120, 90, Luma([255u8]));
        let analysis = analyze_region_grid(&image, &RegionGridOptions::default()).unwrap();

        assert_eq!(analysis.image_size, (120, 90));
        assert_eq!(analysis.overall.white_ratio, 1.0);
        assert_eq!(analysis.overall.light_ratio, 1.0);
        assert_eq!(analysis.overall.dark_ratio, 0.0);
        assert_eq!(analysis.overall.mean_brightness, 255.0);
        assert!(analysis.overall.std_brightness < 1e-3);

        assert_eq!(analysis.regions.len(), 12);
        assert!(analysis.regions.iter().all(|r| r.text_suitable));
        assert_eq!(analysis.best_regions.len(), 3);
    }

    #[test]
    fn test_uniform_dark_image() {
        let image: GrayImage = ImageBuffer::from_pixel(120, 90, Luma([20u8]));
        let analysis = analyze_region_grid(&image, &RegionGridOptions::default()).unwrap();

        assert_eq!(analysis.overall.dark_ratio, 1.0);
        assert_eq!(analysis.overall.light_ratio, 0.0);
        assert!(analysis.regions.iter().all(|r| !r.text_suitable));
        assert!(analysis.best_regions.is_empty());
    }

    #[test]
    fn test_histogram_sums_to_pixel_count() {
        let image: GrayImage =
            ImageBuffer::from_fn(50, 40, |x, y| Luma([((x * 7 + y * 13) % 256) as u8]));
        let histogram = histogram16(&image);

        let total: u32 = histogram.iter().sum();
        assert_eq!(total, 50 * 40);
    }

    #[test]
    fn test_histogram_buckets() {
        let image: GrayImage = ImageBuffer::from_pixel(10, 10, Luma([255u8]));
        let histogram = histogram16(&image);
        assert_eq!(histogram[15], 100);
        assert_eq!(histogram[..15].iter().sum::<u32>(), 0);
    }

    #[test]
    fn test_split_image_regions() {
        // Top half white, bottom half black, 2x2 grid
        let image: GrayImage = ImageBuffer::from_fn(80, 80, |_, y| {
            if y < 40 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        let options = RegionGridOptions::with_grid(2, 2);
        let analysis = analyze_region_grid(&image, &options).unwrap();

        assert_eq!(analysis.regions.len(), 4);
        assert!(analysis.regions[0].text_suitable);
        assert!(analysis.regions[1].text_suitable);
        assert!(!analysis.regions[2].text_suitable);
        assert!(!analysis.regions[3].text_suitable);

        // Only the two light regions make the shortlist
        assert_eq!(analysis.best_regions.len(), 2);
        assert!((analysis.overall.light_ratio - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_region_geometry() {
        let image: GrayImage = ImageBuffer::from_pixel(120, 90, Luma([255u8]));
        let analysis = analyze_region_grid(&image, &RegionGridOptions::default()).unwrap();

        // 3x4 grid over 120x90: regions are 30x30
        let region = analysis.regions[5]; // row 1, col 1
        assert_eq!((region.row, region.col), (1, 1));
        assert_eq!((region.x, region.y), (30, 30));
        assert_eq!((region.width, region.height), (30, 30));
    }

    #[test]
    fn test_image_smaller_than_grid() {
        let image: GrayImage = ImageBuffer::from_pixel(2, 2, Luma([255u8]));
        let analysis = analyze_region_grid(&image, &RegionGridOptions::default()).unwrap();

        assert!(analysis.regions.is_empty());
        assert!(analysis.best_regions.is_empty());
        assert_eq!(analysis.overall.white_ratio, 1.0);
    }

    #[test]
    fn test_empty_image() {
        let image: GrayImage = ImageBuffer::new(0, 0);
        let analysis = analyze_region_grid(&image, &RegionGridOptions::default()).unwrap();

        assert_eq!(analysis.overall.mean_brightness, 0.0);
        assert_eq!(analysis.histogram.iter().sum::<u32>(), 0);
        assert!(analysis.regions.is_empty());
    }

    #[test]
    fn test_invalid_options() {
        let image: GrayImage = ImageBuffer::from_pixel(10, 10, Luma([255u8]));

        let options = RegionGridOptions::with_grid(0, 4);
        assert!(matches!(
            analyze_region_grid(&image, &options),
            Err(RegionGridError::InvalidOption("rows", _))
        ));

        let options = RegionGridOptions {
            suitable_light_ratio: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            analyze_region_grid(&image, &options),
            Err(RegionGridError::InvalidOption("suitable_light_ratio", _))
        ));
    }

    #[test]
    fn test_std_brightness_nonzero_for_mixed_image() {
        let image: GrayImage = ImageBuffer::from_fn(16, 16, |x, _| {
            if x % 2 == 0 {
                Luma([0u8])
            } else {
                Luma([255u8])
            }
        });
        let analysis = analyze_region_grid(&image, &RegionGridOptions::default()).unwrap();

        assert!((analysis.overall.mean_brightness - 127.5).abs() < 0.5);
        assert!(analysis.overall.std_brightness > 100.0);
    }
}
