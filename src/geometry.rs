//! Geometry helpers for view framing and overlay construction.
//!
//! # Overview
//!
//! - [`Bounds`]: bounding box over a coordinate set, used to fit a view
//! - [`phase_sectors`]: contiguous angular sectors for a signal cycle
//! - [`encode_polyline`]: Google Polyline encoding for compact line transfer
//!   (<https://developers.google.com/maps/documentation/utilities/polylinealgorithm>)

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Coord;
use crate::error::BoundsError;

/// Axis-aligned geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Bounds {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Smallest box containing every coordinate.
    ///
    /// A single point yields a zero-area box, which is still valid to fit.
    ///
    /// # Examples
    ///
    /// ```
    /// use city_planner::domain::Coord;
    /// use city_planner::error::BoundsError;
    /// use city_planner::geometry::Bounds;
    ///
    /// let b = Bounds::from_coords(&[Coord::new(30.0, 31.2), Coord::new(29.9, 31.4)]).unwrap();
    /// assert_eq!(b.min_lat, 29.9);
    /// assert_eq!(b.max_lng, 31.4);
    ///
    /// assert_eq!(Bounds::from_coords(&[]), Err(BoundsError::Empty));
    /// assert_eq!(
    ///     Bounds::from_coords(&[Coord::new(f64::NAN, 0.0)]),
    ///     Err(BoundsError::NonFinite)
    /// );
    /// ```
    pub fn from_coords(coords: &[Coord]) -> Result<Self, BoundsError> {
        let first = coords.first().ok_or(BoundsError::Empty)?;
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(BoundsError::NonFinite);
        }

        Ok(coords.iter().skip(1).fold(
            Self {
                min_lat: first.lat,
                min_lng: first.lng,
                max_lat: first.lat,
                max_lng: first.lng,
            },
            |b, c| Self {
                min_lat: b.min_lat.min(c.lat),
                min_lng: b.min_lng.min(c.lng),
                max_lat: b.max_lat.max(c.lat),
                max_lng: b.max_lng.max(c.lng),
            },
        ))
    }
}

/// Splits a signal cycle into contiguous `(start, end)` angles in degrees.
///
/// The first sector starts at 0 and each one spans
/// `360 * green_time / cycle_time`. Negative green times are clamped to 0 so
/// the angles never decrease. Returns an empty list when `cycle_time` is not
/// a positive finite number.
///
/// # Examples
///
/// ```
/// use city_planner::geometry::phase_sectors;
///
/// let sectors = phase_sectors(120.0, &[30.0, 60.0, 30.0]);
/// assert_eq!(sectors, vec![(0.0, 90.0), (90.0, 270.0), (270.0, 360.0)]);
///
/// assert!(phase_sectors(0.0, &[10.0]).is_empty());
/// ```
pub fn phase_sectors(cycle_time: f64, green_times: &[f64]) -> Vec<(f64, f64)> {
    if !cycle_time.is_finite() || cycle_time <= 0.0 {
        return Vec::new();
    }

    let mut start = 0.0;
    green_times
        .iter()
        .map(|&green| {
            let green = if green.is_finite() { green.max(0.0) } else { 0.0 };
            let end = start + 360.0 * green / cycle_time;
            let sector = (start, end);
            start = end;
            sector
        })
        .collect()
}

// ============================================================================
// Polyline encoding
// ============================================================================

/// Encodes a sequence of coordinates using the Google Polyline Algorithm.
///
/// Each point is stored as the delta from the previous one with 5 decimal
/// places of precision.
///
/// # Examples
///
/// ```
/// use city_planner::domain::Coord;
/// use city_planner::geometry::encode_polyline;
///
/// let path = [Coord::new(38.5, -120.2), Coord::new(40.7, -120.95), Coord::new(43.252, -126.453)];
/// assert_eq!(encode_polyline(&path), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
/// assert!(encode_polyline(&[]).is_empty());
/// ```
pub fn encode_polyline(coords: &[Coord]) -> String {
    let mut result = String::new();
    let mut prev_lat = 0i64;
    let mut prev_lng = 0i64;

    for c in coords {
        let lat_e5 = (c.lat * 1e5).round() as i64;
        let lng_e5 = (c.lng * 1e5).round() as i64;

        encode_value(lat_e5 - prev_lat, &mut result);
        encode_value(lng_e5 - prev_lng, &mut result);

        prev_lat = lat_e5;
        prev_lng = lng_e5;
    }

    result
}

fn encode_value(value: i64, output: &mut String) {
    // Left-shift and invert if negative
    let mut encoded = if value < 0 { !(value << 1) } else { value << 1 };

    // 5-bit chunks, 0x20 set while more follow
    while encoded >= 0x20 {
        output.push((((encoded & 0x1f) | 0x20) as u8 + 63) as char);
        encoded >>= 5;
    }
    output.push((encoded as u8 + 63) as char);
}
