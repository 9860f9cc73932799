use serde::{Deserialize, Serialize};

use crate::scan::LaserScan;

/// Thresholds for discarding unreliable laser returns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlierFilter {
    /// Returns weaker than this are discarded.
    pub min_intensity: f64,
    /// Closest trusted range in meters (inclusive).
    pub min_range: f64,
    /// Farthest trusted range in meters (inclusive).
    pub max_range: f64,
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self {
            min_intensity: 10.0,
            min_range: 0.2,
            max_range: 5.0,
        }
    }
}

impl OutlierFilter {
    /// Filter a scan in place.
    pub fn apply(&self, scan: &mut LaserScan) {
        self.apply_slices(&mut scan.ranges, &mut scan.intensities);
    }

    /// Filter parallel range/intensity buffers in place.
    ///
    /// The first sweep zeroes samples whose circular neighbours are both empty,
    /// or whose intensity is too weak. It runs left to right over the live
    /// buffer, so a sample sees its predecessor after that one was filtered.
    /// The second sweep zeroes ranges outside `[min_range, max_range]`.
    pub fn apply_slices(&self, ranges: &mut [f64], intensities: &mut [f64]) {
        debug_assert_eq!(ranges.len(), intensities.len(), "range/intensity length mismatch");
        let n = ranges.len().min(intensities.len());
        if n == 0 {
            return;
        }

        for i in 0..n {
            let previous = (i + n - 1) % n;
            let next = (i + 1) % n;
            if (ranges[previous] == 0.0 && ranges[next] == 0.0) || intensities[i] < self.min_intensity {
                ranges[i] = 0.0;
                intensities[i] = 0.0;
            }
        }

        for i in 0..n {
            if ranges[i] < self.min_range || ranges[i] > self.max_range {
                ranges[i] = 0.0;
                intensities[i] = 0.0;
            }
        }
    }
}

/// Filter with the default thresholds.
pub fn filter_outliers(ranges: &mut [f64], intensities: &mut [f64]) {
    OutlierFilter::default().apply_slices(ranges, intensities);
}
