//! Cell grid construction
//!
//! Reduces a grayscale pixel buffer into a coarse cell grid carrying a white
//! ratio and a barrier flag per cell, applies the safety-margin dilation to
//! the barrier set, and derives the boolean usability mask the rectangle
//! search runs on.

use image::GrayImage;
use tracing::debug;

use super::types::{AnalysisOptions, BarrierMode};

// ============================================================
// Density Grid
// ============================================================

/// R×C grid of per-cell white ratios and barrier flags, row-major
#[derive(Debug, Clone)]
pub struct DensityGrid {
    rows: usize,
    cols: usize,
    cell_size: u32,
    density: Vec<f32>,
    barrier: Vec<bool>,
}

impl DensityGrid {
    /// Build the grid from a grayscale image.
    ///
    /// Every non-overlapping `cell_size x cell_size` block becomes one cell;
    /// trailing partial rows and columns are dropped, never padded. A zero
    /// dimension or a cell size larger than the image yields an empty grid.
    ///
    /// `options.cell_size` must be nonzero; [`AnalysisOptions::validate`]
    /// enforces this at the detector entry points.
    pub fn build(image: &GrayImage, options: &AnalysisOptions) -> Self {
        let cell_size = options.cell_size;
        let rows = (image.height() / cell_size) as usize;
        let cols = (image.width() / cell_size) as usize;
        let cell_area = (cell_size * cell_size) as f32;

        let mut density = vec![0.0f32; rows * cols];
        let mut barrier = vec![false; rows * cols];

        for gy in 0..rows {
            for gx in 0..cols {
                let mut white_count = 0u32;
                let mut black_count = 0u32;

                let y0 = gy as u32 * cell_size;
                let x0 = gx as u32 * cell_size;
                for y in y0..y0 + cell_size {
                    for x in x0..x0 + cell_size {
                        let value = image.get_pixel(x, y).0[0];
                        if value >= options.white_threshold {
                            white_count += 1;
                        }
                        if value <= options.black_threshold {
                            black_count += 1;
                        }
                    }
                }

                let black_ratio = black_count as f32 / cell_area;
                let white_ratio = white_count as f32 / cell_area;
                let idx = gy * cols + gx;

                match options.barrier_mode {
                    BarrierMode::Tolerant => {
                        density[idx] = white_ratio;
                        barrier[idx] = black_ratio > 0.5;
                    }
                    BarrierMode::Strict => {
                        if black_ratio > options.black_tolerance {
                            // A barred cell must never report a usable density
                            density[idx] = 0.0;
                            barrier[idx] = true;
                        } else {
                            density[idx] = white_ratio;
                        }
                    }
                }
            }
        }

        debug!(rows, cols, cell_size, "density grid built");

        Self {
            rows,
            cols,
            cell_size,
            density,
            barrier,
        }
    }

    /// Number of grid rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of grid columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell size in pixels
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// True when the image was too small for even one cell
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// White ratio of the cell at (row, col)
    pub fn density(&self, row: usize, col: usize) -> f32 {
        self.density[row * self.cols + col]
    }

    /// Barrier flag of the cell at (row, col)
    pub fn is_barrier(&self, row: usize, col: usize) -> bool {
        self.barrier[row * self.cols + col]
    }

    /// Inflate the barrier set by `margin` cells of Chebyshev distance.
    ///
    /// Equivalent to dilation with a `(2*margin+1)^2` square structuring
    /// element. The result is a superset of the input set; `margin = 0` is a
    /// no-op. Newly-barred cells have their density zeroed so they can never
    /// pass the usability threshold.
    pub fn dilate_barriers(&mut self, margin: u32) {
        if margin == 0 || self.is_empty() {
            return;
        }

        let margin = margin as usize;
        let mut dilated = self.barrier.clone();

        for row in 0..self.rows {
            for col in 0..self.cols {
                if !self.barrier[row * self.cols + col] {
                    continue;
                }
                let r0 = row.saturating_sub(margin);
                let r1 = (row + margin).min(self.rows - 1);
                let c0 = col.saturating_sub(margin);
                let c1 = (col + margin).min(self.cols - 1);
                for r in r0..=r1 {
                    for c in c0..=c1 {
                        dilated[r * self.cols + c] = true;
                    }
                }
            }
        }

        for idx in 0..dilated.len() {
            if dilated[idx] && !self.barrier[idx] {
                self.density[idx] = 0.0;
            }
        }
        self.barrier = dilated;
    }

    /// Derive the usability mask: a cell is usable iff its white ratio meets
    /// the density threshold and it is not a barrier.
    pub fn usability_mask(&self, density_threshold: f32) -> CellMask {
        let cells = self
            .density
            .iter()
            .zip(&self.barrier)
            .map(|(&d, &b)| d >= density_threshold && !b)
            .collect();
        CellMask {
            rows: self.rows,
            cols: self.cols,
            cells,
        }
    }

    /// Mean white ratio over all cells (0.0 for an empty grid)
    pub fn mean_density(&self) -> f32 {
        if self.density.is_empty() {
            return 0.0;
        }
        self.density.iter().sum::<f32>() / self.density.len() as f32
    }

    /// Fraction of cells flagged as barriers (0.0 for an empty grid)
    pub fn barrier_ratio(&self) -> f32 {
        if self.barrier.is_empty() {
            return 0.0;
        }
        let count = self.barrier.iter().filter(|&&b| b).count();
        count as f32 / self.barrier.len() as f32
    }

    /// Number of cells at or above the density threshold
    pub fn high_density_count(&self, density_threshold: f32) -> usize {
        self.density
            .iter()
            .filter(|&&d| d >= density_threshold)
            .count()
    }

    /// Mean white ratio over a rectangular cell range
    pub fn mean_density_in(
        &self,
        row0: usize,
        col0: usize,
        height: usize,
        width: usize,
    ) -> f32 {
        if height == 0 || width == 0 {
            return 0.0;
        }
        let mut sum = 0.0f32;
        for row in row0..row0 + height {
            for col in col0..col0 + width {
                sum += self.density[row * self.cols + col];
            }
        }
        sum / (height * width) as f32
    }

    #[cfg(test)]
    pub(crate) fn from_parts(
        rows: usize,
        cols: usize,
        cell_size: u32,
        density: Vec<f32>,
        barrier: Vec<bool>,
    ) -> Self {
        assert_eq!(density.len(), rows * cols);
        assert_eq!(barrier.len(), rows * cols);
        Self {
            rows,
            cols,
            cell_size,
            density,
            barrier,
        }
    }
}

// ============================================================
// Usability Mask
// ============================================================

/// Boolean R×C cell matrix; `true` marks a cell usable for text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMask {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl CellMask {
    /// Create an all-unusable mask
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    /// Number of mask rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of mask columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Usability of the cell at (row, col)
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.cols + col]
    }

    /// Set the usability of the cell at (row, col)
    pub fn set(&mut self, row: usize, col: usize, usable: bool) {
        self.cells[row * self.cols + col] = usable;
    }

    /// Mark every cell of the given rectangle unusable
    pub fn clear_rect(&mut self, x: usize, y: usize, width: usize, height: usize) {
        for row in y..(y + height).min(self.rows) {
            for col in x..(x + width).min(self.cols) {
                self.cells[row * self.cols + col] = false;
            }
        }
    }
}
