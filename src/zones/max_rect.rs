//! Maximal rectangle search
//!
//! # Algorithm
//!
//! Histogram method: per column, a running count of consecutive usable cells
//! ending at the current row; per row, the largest rectangle in that
//! histogram via a monotonically increasing stack of `(start_column, height)`
//! pairs with a sentinel column appended to flush the stack. The global best
//! is carried across rows with a strict comparison, so equal-area candidates
//! resolve to the first one found in scan order.
//!
//! Amortized `O(rows * cols)`; the stack is an explicit array bounded by the
//! column count.

use tracing::debug;

use super::grid::{CellMask, DensityGrid};
use super::types::{AnalysisOptions, Zone};

/// Axis-aligned rectangle in grid cell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl CellRect {
    /// Cell area of the rectangle
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// Find the largest all-usable rectangle in the mask.
///
/// Returns a zero-area rectangle when the mask has no usable cells.
pub fn largest_rectangle(mask: &CellMask) -> CellRect {
    let rows = mask.rows();
    let cols = mask.cols();
    let mut best = CellRect::default();
    if rows == 0 || cols == 0 {
        return best;
    }

    let mut heights = vec![0usize; cols];
    let mut stack: Vec<(usize, usize)> = Vec::with_capacity(cols + 1);

    for row in 0..rows {
        for col in 0..cols {
            heights[col] = if mask.get(row, col) {
                heights[col] + 1
            } else {
                0
            };
        }

        stack.clear();
        for col in 0..=cols {
            // Sentinel height-0 column flushes the stack at the row's end
            let height = if col < cols { heights[col] } else { 0 };
            let mut start = col;

            while let Some(&(run_start, run_height)) = stack.last() {
                if run_height <= height {
                    break;
                }
                stack.pop();
                let width = col - run_start;
                let area = run_height * width;
                if area > best.area() {
                    best = CellRect {
                        x: run_start,
                        y: row + 1 - run_height,
                        width,
                        height: run_height,
                    };
                }
                start = run_start;
            }
            stack.push((start, height));
        }
    }

    best
}

/// Extract up to `max_zones` disjoint text zones from the usability mask.
///
/// Repeatedly finds the maximal rectangle on an owned working copy, stops at
/// the first rectangle below the minimum size, and clears every accepted
/// rectangle's footprint before the next search. Zones come out in
/// non-increasing area order and never overlap.
pub fn extract_zones(
    grid: &DensityGrid,
    mask: &CellMask,
    options: &AnalysisOptions,
) -> Vec<Zone> {
    let cell_size = options.cell_size;
    let min_width_cells = ((options.min_zone_width / cell_size).max(1)) as usize;
    let min_height_cells = ((options.min_zone_height / cell_size).max(1)) as usize;

    let mut work = mask.clone();
    let mut zones = Vec::new();

    for _ in 0..options.max_zones {
        let rect = largest_rectangle(&work);
        if rect.area() == 0 || rect.width < min_width_cells || rect.height < min_height_cells {
            break;
        }

        let width = rect.width as u32 * cell_size;
        let height = rect.height as u32 * cell_size;
        let zone = Zone {
            x: rect.x as u32 * cell_size,
            y: rect.y as u32 * cell_size,
            width,
            height,
            area: width * height,
            avg_density: grid.mean_density_in(rect.y, rect.x, rect.height, rect.width),
        };
        debug!(
            x = zone.x,
            y = zone.y,
            width = zone.width,
            height = zone.height,
            "text zone extracted"
        );
        zones.push(zone);
        work.clear_rect(rect.x, rect.y, rect.width, rect.height);
    }

    zones
}
