use serde::Serialize;
use tracing::{debug, trace};

use crate::tabular::data_lines;
use crate::types::Command;

/// Number of angle slots in one laser revolution.
pub const SCAN_POINTS: usize = 360;

/// One laser revolution, indexed by whole degrees.
///
/// `ranges` are in meters, `intensities` in the sensor's arbitrary unit. Both
/// always have the same length: one slot per angle up to the highest angle seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LaserScan {
    pub ranges: Vec<f64>,
    pub intensities: Vec<f64>,
}

impl LaserScan {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ranges: Vec::with_capacity(capacity),
            intensities: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Append a sample at the next sequential angle.
    fn push(&mut self, range: f64, intensity: f64) {
        self.ranges.push(range);
        self.intensities.push(intensity);
    }

    /// Store a sample at `angle`, growing the scan with empty slots if needed.
    fn set(&mut self, angle: usize, range: f64, intensity: f64) {
        if angle >= self.ranges.len() {
            self.ranges.resize(angle + 1, 0.0);
            self.intensities.resize(angle + 1, 0.0);
        }
        self.ranges[angle] = range;
        self.intensities[angle] = intensity;
    }
}

/// Parse an `angle,range_mm,intensity[,...]` row.
///
/// Angles outside one revolution count as malformed.
fn parse_sample(line: &str) -> Option<(usize, i64, i64)> {
    let mut columns = line.split(',').map(str::trim);
    let angle = columns.next()?.parse::<usize>().ok()?;
    let range_mm = columns.next()?.parse::<i64>().ok()?;
    let intensity = columns.next()?.parse::<i64>().ok()?;
    (angle < SCAN_POINTS).then_some((angle, range_mm, intensity))
}

/// Decode a `getldsscan` response body.
///
/// Malformed rows become an empty sample at the next sequential slot; rows
/// repeating an angle overwrite the earlier sample. Decoding stops once a
/// full revolution is collected. A rejected command or a response without the
/// `AngleInDegrees` header yields an empty scan.
pub fn decode_scan(body: &str) -> LaserScan {
    let lines = match data_lines(Command::GetLdsScan, body) {
        Ok(lines) => lines,
        Err(e) => {
            debug!(error = %e, "Dropping undecodable scan");
            return LaserScan::default();
        }
    };

    let mut scan = LaserScan::with_capacity(SCAN_POINTS);
    for line in lines {
        match parse_sample(line) {
            Some((angle, range_mm, intensity)) => {
                scan.set(angle, range_mm as f64 / 1000.0, intensity as f64);
            }
            None => {
                trace!(line, slot = scan.len(), "Malformed scan row");
                scan.push(0.0, 0.0);
            }
        }
        if scan.len() >= SCAN_POINTS {
            break;
        }
    }
    scan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_scan_body() -> String {
        let mut body = String::from("getldsscan\r\nAngleInDegrees,DistInMM,Intensity,ErrorCodeHEX\r\n");
        for angle in 0..SCAN_POINTS {
            body.push_str(&format!("{angle},{},{},0\r\n", 1000 + angle, 100 + angle));
        }
        body.push_str("ROTATION_SPEED,5.10\r\n");
        body
    }

    #[test]
    fn test_full_revolution() {
        let scan = decode_scan(&full_scan_body());
        assert_eq!(scan.len(), SCAN_POINTS);
        assert_eq!(scan.intensities.len(), SCAN_POINTS);
        assert_eq!(scan.ranges[0], 1.0);
        assert_eq!(scan.ranges[359], 1.359);
        assert_eq!(scan.intensities[359], 459.0);
    }

    #[test]
    fn test_never_more_than_one_revolution() {
        let mut body = full_scan_body();
        for _ in 0..50 {
            body.push_str("garbage\r\n");
        }
        assert_eq!(decode_scan(&body).len(), SCAN_POINTS);

        let junk: String = std::iter::once("AngleInDegrees\n")
            .chain(std::iter::repeat("x,y,z\n").take(1000))
            .collect();
        assert_eq!(decode_scan(&junk).len(), SCAN_POINTS);
    }

    #[test]
    fn test_duplicate_angle_keeps_later_value() {
        let body = "getldsscan\nAngleInDegrees,DistInMM,Intensity\n9,900,20\n10,1000,20\n10,2500,30\n";
        let scan = decode_scan(body);
        assert_eq!(scan.len(), 11);
        assert_eq!(scan.ranges[10], 2.5);
        assert_eq!(scan.intensities[10], 30.0);
    }

    #[test]
    fn test_gap_grows_with_empty_slots() {
        let body = "getldsscan\nAngleInDegrees\n0,500,40\n4,800,40\n";
        let scan = decode_scan(body);
        assert_eq!(scan.ranges, vec![0.5, 0.0, 0.0, 0.0, 0.8]);
        assert_eq!(scan.intensities, vec![40.0, 0.0, 0.0, 0.0, 40.0]);
    }

    #[test]
    fn test_malformed_row_takes_next_slot() {
        let body = "getldsscan\nAngleInDegrees\n0,500,40\n1,bad,40\n400,1,1\n";
        let scan = decode_scan(body);
        assert_eq!(scan.ranges, vec![0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_degraded_inputs_yield_empty_scan() {
        assert!(decode_scan("").is_empty());
        assert!(decode_scan("getldsscan\r\n0,100,10\r\n").is_empty());
        assert!(decode_scan("Unknown Cmd\r\n").is_empty());
    }
}
