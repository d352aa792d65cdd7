//! Ground control point records and the column-order detection used when
//! ingesting them.
//!
//! Survey point lists are commonly exchanged as plain `ID VALUE1 VALUE2`
//! records, and which of the two values is the easting varies by source.
//! The parser here resolves that with a magnitude heuristic tuned to
//! mid-latitude UTM-style zones, where northings run in the millions of
//! meters and eastings stay in the hundreds of thousands.

use serde::{Deserialize, Serialize};

// UTM-style magnitude bounds used by the column-order heuristic. In the
// supported zones northings fall in 3e6..1e7 m and eastings below 1e6 m.
const NORTHING_MIN_M: f64 = 3_000_000.0;
const EASTING_MAX_M: f64 = 1_000_000.0;

/// A ground control point in a projected plane coordinate system.
///
/// `y` is the easting and `x` the northing, both in meters, following the
/// surveying convention where the y axis points east.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanePoint {
    /// Point identifier, kept verbatim from the source record.
    pub id: String,
    /// Easting in meters.
    pub y: f64,
    /// Northing in meters.
    pub x: f64,
}

impl PlanePoint {
    /// Creates a new point from identifier, easting and northing.
    pub fn new(id: impl Into<String>, y: f64, x: f64) -> Self {
        Self {
            id: id.into(),
            y,
            x,
        }
    }
}

/// Parses a single whitespace-separated `ID VALUE1 VALUE2` record.
///
/// When the first value exceeds 3,000,000 m while the second stays below
/// 1,000,000 m the record is taken as northing-first and the pair is
/// reordered; every other magnitude combination is read as easting-first
/// verbatim. The rule is specific to zones with the magnitude split
/// described in the module docs and misreads records from outside them.
///
/// Returns `None` for records with fewer than three fields or with
/// non-numeric coordinate fields. Fields past the third are ignored.
pub fn parse_point_record(line: &str) -> Option<PlanePoint> {
    let mut parts = line.split_whitespace();
    let id = parts.next()?;
    let v1 = parts.next()?.parse::<f64>().ok()?;
    let v2 = parts.next()?.parse::<f64>().ok()?;

    // northing-first records get swapped back to (easting, northing)
    let (y, x) = if v1 > NORTHING_MIN_M && v2 < EASTING_MAX_M {
        (v2, v1)
    } else {
        (v1, v2)
    };

    Some(PlanePoint {
        id: id.to_string(),
        y,
        x,
    })
}

/// Parses a block of point records, one record per line.
///
/// Blank lines, `#` comment lines and records [`parse_point_record`]
/// rejects are skipped. Surviving points keep their input order.
pub fn parse_point_list(text: &str) -> Vec<PlanePoint> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_point_record)
        .collect()
}
