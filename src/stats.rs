//! Median, mean and standard deviation of a zone.
use ndarray::{s, ArrayView2};
use serde_derive::*;

use crate::{
    calibration::{CalibrationTable, ZoneBounds},
    error::{Error, Result},
};

/// Summary of the pixels inside one zone.
///
/// `std` is the population standard deviation (divides by
/// the pixel count, not by one less).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ZoneStatistics {
    pub median: f64,
    pub mean: f64,
    pub std: f64,
}

impl ZoneStatistics {
    /// Statistics of zone `zone` as calibrated in row
    /// `row` of `calibration`.
    pub fn compute(
        grid: ArrayView2<'_, f64>,
        calibration: &CalibrationTable,
        zone: &str,
        row: usize,
    ) -> Result<Self> {
        let bounds = calibration.bounds(row, zone).ok_or_else(|| {
            Error::Configuration(format!(
                "no bounds for zone `{}` in calibration row {}",
                zone, row
            ))
        })?;
        Self::of_zone(grid, zone, bounds)
    }

    /// Statistics of `grid[row_start..row_end, col_start..col_end]`.
    pub fn of_zone(grid: ArrayView2<'_, f64>, zone: &str, bounds: ZoneBounds) -> Result<Self> {
        let (rows, cols) = grid.dim();
        if !bounds.fits(rows, cols) {
            return Err(Error::ZoneOutOfBounds {
                zone: zone.to_string(),
                row_end: bounds.row_end,
                col_end: bounds.col_end,
                rows,
                cols,
            });
        }

        let roi = grid.slice(s![bounds.rows(), bounds.cols()]);
        Self::of_values(roi).ok_or_else(|| Error::EmptyZone(zone.to_string()))
    }

    /// `None` if `roi` holds no values.
    pub fn of_values(roi: ArrayView2<'_, f64>) -> Option<Self> {
        let mean = roi.mean()?;
        let std = roi.mapv(|v| (v - mean).powi(2)).mean()?.sqrt();

        let mut sorted: Vec<f64> = roi.iter().copied().collect();
        sorted.sort_unstable_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.
        } else {
            sorted[mid]
        };

        Some(ZoneStatistics { median, mean, std })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn constant_grid_two_zones() {
        let src = "\
measurement zone1_row_start zone1_row_end zone1_col_start zone1_col_end zone2_row_start zone2_row_end zone2_col_start zone2_col_end
20170815 0 2 0 2 2 4 2 4
";
        let table = CalibrationTable::from_reader(src.as_bytes(), "positions.csv").unwrap();
        let grid = Array2::from_elem((10, 10), 5.);
        let row = table.row_index("20170815").unwrap();

        for zone in table.zone_names() {
            let stats = ZoneStatistics::compute(grid.view(), &table, zone, row).unwrap();
            assert_eq!(
                stats,
                ZoneStatistics {
                    median: 5.,
                    mean: 5.,
                    std: 0.
                }
            );
        }
    }

    #[test]
    fn matches_direct_computation() {
        let grid = Array2::from_shape_fn((12, 9), |(r, c)| ((r * 31 + c * 17) % 23) as f64 * 0.5);
        let bounds = ZoneBounds::new(3, 8, 2, 7);

        let mut values = vec![];
        for r in 3..8 {
            for c in 2..7 {
                values.push(grid[(r, c)]);
            }
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let median = values[values.len() / 2];

        let stats = ZoneStatistics::of_zone(grid.view(), "z", bounds).unwrap();
        assert!(close(stats.mean, mean));
        assert!(close(stats.std, std));
        assert!(close(stats.median, median));
    }

    #[test]
    fn even_count_median_averages_middle_values() {
        let grid = array![[4., 1.], [3., 10.]];
        let stats = ZoneStatistics::of_values(grid.view()).unwrap();
        assert_eq!(stats.median, 3.5);
        assert_eq!(stats.mean, 4.5);
        assert!(close(stats.std, 11.25f64.sqrt()));
    }

    #[test]
    fn empty_zone_is_error() {
        let grid = Array2::from_elem((4, 4), 1.);
        let bounds = ZoneBounds::new(2, 2, 0, 4);
        assert!(matches!(
            ZoneStatistics::of_zone(grid.view(), "flat", bounds),
            Err(Error::EmptyZone(z)) if z == "flat"
        ));
    }

    #[test]
    fn zone_beyond_grid_is_error() {
        let grid = Array2::from_elem((4, 4), 1.);
        let bounds = ZoneBounds::new(0, 5, 0, 2);
        assert!(matches!(
            ZoneStatistics::of_zone(grid.view(), "tall", bounds),
            Err(Error::ZoneOutOfBounds { rows: 4, cols: 4, .. })
        ));
    }
}
