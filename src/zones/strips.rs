//! Horizontal strip statistics
//!
//! Coarse fallback signal for images where no rectangle qualifies: the grid
//! is split into top, middle, and bottom thirds and each strip is scored by
//! how much high-density, barrier-free area it holds.

use super::grid::DensityGrid;
use super::types::{StripName, StripStats};

/// Compute statistics for the three horizontal thirds of the grid.
///
/// The bottom strip absorbs the remainder rows when the row count is not a
/// multiple of three. Strips with no rows report zeroed statistics.
pub fn analyze_strips(grid: &DensityGrid, density_threshold: f32) -> Vec<StripStats> {
    let rows = grid.rows();
    let third = rows / 3;

    [
        (StripName::Top, 0, third),
        (StripName::Middle, third, 2 * third),
        (StripName::Bottom, 2 * third, rows),
    ]
    .into_iter()
    .map(|(name, row0, row1)| strip_stats(grid, name, row0, row1, density_threshold))
    .collect()
}

fn strip_stats(
    grid: &DensityGrid,
    name: StripName,
    row0: usize,
    row1: usize,
    density_threshold: f32,
) -> StripStats {
    let cols = grid.cols();
    let cell_count = (row1 - row0) * cols;
    if cell_count == 0 {
        return StripStats {
            name,
            avg_density: 0.0,
            high_density_ratio: 0.0,
            barrier_ratio: 0.0,
        };
    }

    let mut density_sum = 0.0f32;
    let mut high_count = 0usize;
    let mut barrier_count = 0usize;

    for row in row0..row1 {
        for col in 0..cols {
            let density = grid.density(row, col);
            density_sum += density;
            if density >= density_threshold {
                high_count += 1;
            }
            if grid.is_barrier(row, col) {
                barrier_count += 1;
            }
        }
    }

    StripStats {
        name,
        avg_density: density_sum / cell_count as f32,
        high_density_ratio: high_count as f32 / cell_count as f32,
        barrier_ratio: barrier_count as f32 / cell_count as f32,
    }
}

/// Select the strip with the best score.
///
/// Ties resolve to the first strip in top-to-bottom order.
pub fn best_strip(strips: &[StripStats]) -> (StripName, f32) {
    let mut best_name = StripName::Top;
    let mut best_score = f32::NEG_INFINITY;

    for strip in strips {
        let score = strip.score();
        if score > best_score {
            best_score = score;
            best_name = strip.name;
        }
    }

    if best_score == f32::NEG_INFINITY {
        (StripName::Top, 0.0)
    } else {
        (best_name, best_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each entry fills one grid row with the given density/barrier pair
    fn grid_from_rows(rows: &[(f32, bool)], cols: usize) -> DensityGrid {
        let mut density = Vec::new();
        let mut barrier = Vec::new();
        for &(d, b) in rows {
            density.extend(std::iter::repeat(d).take(cols));
            barrier.extend(std::iter::repeat(b).take(cols));
        }
        DensityGrid::from_parts(rows.len(), cols, 8, density, barrier)
    }

    #[test]
    fn test_thirds_partition() {
        // 6 rows: top = rows 0-1 (density 1.0), middle = rows 2-3 (0.5),
        // bottom = rows 4-5 (0.0, barriers)
        let grid = grid_from_rows(
            &[
                (1.0, false),
                (1.0, false),
                (0.5, false),
                (0.5, false),
                (0.0, true),
                (0.0, true),
            ],
            4,
        );

        let strips = analyze_strips(&grid, 0.7);
        assert_eq!(strips.len(), 3);

        assert_eq!(strips[0].name, StripName::Top);
        assert!((strips[0].avg_density - 1.0).abs() < 1e-6);
        assert!((strips[0].high_density_ratio - 1.0).abs() < 1e-6);
        assert_eq!(strips[0].barrier_ratio, 0.0);

        assert_eq!(strips[1].name, StripName::Middle);
        assert!((strips[1].avg_density - 0.5).abs() < 1e-6);
        assert_eq!(strips[1].high_density_ratio, 0.0);

        assert_eq!(strips[2].name, StripName::Bottom);
        assert_eq!(strips[2].avg_density, 0.0);
        assert!((strips[2].barrier_ratio - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_bottom_strip_absorbs_remainder() {
        // 7 rows: third = 2, so bottom covers rows 4-6
        let grid = grid_from_rows(
            &[
                (0.0, false),
                (0.0, false),
                (0.0, false),
                (0.0, false),
                (1.0, false),
                (1.0, false),
                (1.0, false),
            ],
            2,
        );

        let strips = analyze_strips(&grid, 0.7);
        assert!((strips[2].avg_density - 1.0).abs() < 1e-6);
        assert!((strips[2].high_density_ratio - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_fewer_rows_than_strips() {
        // 2 rows: third = 0, top and middle are empty, bottom covers all
        let grid = grid_from_rows(&[(0.8, false), (0.8, false)], 3);

        let strips = analyze_strips(&grid, 0.7);
        assert_eq!(strips[0].avg_density, 0.0);
        assert_eq!(strips[1].avg_density, 0.0);
        assert!((strips[2].avg_density - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_empty_grid() {
        let grid = DensityGrid::from_parts(0, 0, 8, vec![], vec![]);
        let strips = analyze_strips(&grid, 0.7);

        assert_eq!(strips.len(), 3);
        for strip in &strips {
            assert_eq!(strip.avg_density, 0.0);
            assert_eq!(strip.high_density_ratio, 0.0);
            assert_eq!(strip.barrier_ratio, 0.0);
        }

        let (name, score) = best_strip(&strips);
        assert_eq!(name, StripName::Top);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_best_strip_selection() {
        let strips = vec![
            StripStats {
                name: StripName::Top,
                avg_density: 0.4,
                high_density_ratio: 0.3,
                barrier_ratio: 0.2,
            },
            StripStats {
                name: StripName::Middle,
                avg_density: 0.9,
                high_density_ratio: 0.8,
                barrier_ratio: 0.1,
            },
            StripStats {
                name: StripName::Bottom,
                avg_density: 0.5,
                high_density_ratio: 0.5,
                barrier_ratio: 0.3,
            },
        ];

        let (name, score) = best_strip(&strips);
        assert_eq!(name, StripName::Middle);
        assert!((score - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_best_strip_tie_goes_to_first() {
        let strips = vec![
            StripStats {
                name: StripName::Top,
                avg_density: 0.5,
                high_density_ratio: 0.5,
                barrier_ratio: 0.0,
            },
            StripStats {
                name: StripName::Middle,
                avg_density: 0.5,
                high_density_ratio: 0.5,
                barrier_ratio: 0.0,
            },
        ];

        let (name, _) = best_strip(&strips);
        assert_eq!(name, StripName::Top);
    }
}
