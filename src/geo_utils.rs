//! # Geographic Utilities
//!
//! Bounding box operations shared by track construction and clustering.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`bounds_overlap`] | Inclusive overlap test between two bounding boxes |
//! | [`merged_bounds`] | Bounding box over several coordinate sequences |
//!
//! [`Bounds`] also converts to and from [`geo::Rect`] (x = longitude, y = latitude), which
//! is the shape map and tile libraries expect for a panel extent.
//!
//! ## Example
//!
//! ```rust
//! use track_clusters::{geo_utils, GpsPoint};
//!
//! let ride_a = vec![GpsPoint::new(51.50, -0.13), GpsPoint::new(51.51, -0.12)];
//! let ride_b = vec![GpsPoint::new(51.52, -0.11), GpsPoint::new(51.53, -0.10)];
//!
//! let panel = geo_utils::merged_bounds([ride_a.as_slice(), ride_b.as_slice()], 0.01).unwrap();
//! println!("Panel: {:.3}N to {:.3}N", panel.min_lat, panel.max_lat);
//! ```
//!
//! ## Coordinate System
//!
//! All functions expect WGS84 coordinates in degrees. Boxes never wrap across the
//! antimeridian.

use geo::{Coord, Rect};

use crate::{Bounds, ClusterError, GpsPoint, Result};

// =============================================================================
// Overlap
// =============================================================================

/// Check if two bounding boxes overlap.
///
/// Returns `false` only when the boxes are strictly separated on at least one axis. Boxes
/// touching along an edge or at a corner count as overlapping, and degenerate single-point
/// boxes take part like any other. The test is symmetric.
///
/// A box with a NaN bound overlaps nothing, itself included.
///
/// # Example
///
/// ```rust
/// use track_clusters::{geo_utils, Bounds};
///
/// let a = Bounds { min_lat: 0.0, max_lat: 1.0, min_lng: 0.0, max_lng: 1.0 };
/// let far = Bounds { min_lat: 5.0, max_lat: 6.0, min_lng: 5.0, max_lng: 6.0 };
///
/// assert!(geo_utils::bounds_overlap(&a, &a));
/// assert!(!geo_utils::bounds_overlap(&a, &far));
/// ```
#[inline]
pub fn bounds_overlap(a: &Bounds, b: &Bounds) -> bool {
    a.min_lng <= b.max_lng
        && b.min_lng <= a.max_lng
        && a.min_lat <= b.max_lat
        && b.min_lat <= a.max_lat
}

// =============================================================================
// Aggregate Bounds
// =============================================================================

/// Compute one bounding box over several coordinate sequences, grown by `margin`.
///
/// This is the per-panel extent: the box over the union of a cluster's coordinates.
/// Empty sequences are skipped; if every sequence is empty the result is
/// [`ClusterError::EmptyCoordinates`].
pub fn merged_bounds<'a, I>(tracks: I, margin: f64) -> Result<Bounds>
where
    I: IntoIterator<Item = &'a [GpsPoint]>,
{
    let mut merged: Option<Bounds> = None;

    for points in tracks {
        if points.is_empty() {
            continue;
        }
        let bounds = Bounds::from_points(points, 0.0)?;
        merged = Some(match merged {
            Some(acc) => acc.union(&bounds),
            None => bounds,
        });
    }

    let merged = merged.ok_or(ClusterError::EmptyCoordinates)?;

    crate::check_margin(margin)?;
    Ok(merged.expand(margin))
}

// =============================================================================
// geo interop
// =============================================================================

impl From<Rect<f64>> for Bounds {
    fn from(rect: Rect<f64>) -> Self {
        let min = rect.min();
        let max = rect.max();
        Self {
            min_lat: min.y,
            max_lat: max.y,
            min_lng: min.x,
            max_lng: max.x,
        }
    }
}

impl From<Bounds> for Rect<f64> {
    fn from(bounds: Bounds) -> Self {
        Rect::new(
            Coord { x: bounds.min_lng, y: bounds.min_lat },
            Coord { x: bounds.max_lng, y: bounds.max_lat },
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(min_lng: f64, max_lng: f64, min_lat: f64, max_lat: f64) -> Bounds {
        Bounds { min_lat, max_lat, min_lng, max_lng }
    }

    #[test]
    fn test_bounds_overlap_yes() {
        let a = unit(-0.13, -0.11, 51.50, 51.52);
        let b = unit(-0.12, -0.10, 51.51, 51.53);
        assert!(bounds_overlap(&a, &b));
    }

    #[test]
    fn test_bounds_overlap_no() {
        let a = unit(0.0, 1.0, 0.0, 1.0);
        let b = unit(5.0, 6.0, 5.0, 6.0);
        assert!(!bounds_overlap(&a, &b));
    }

    #[test]
    fn test_boundary_touch_counts() {
        // Shared line x = 1
        let a = unit(0.0, 1.0, 0.0, 1.0);
        let b = unit(1.0, 2.0, 0.0, 1.0);
        assert!(bounds_overlap(&a, &b));

        // Shared corner only
        let c = unit(1.0, 2.0, 1.0, 2.0);
        assert!(bounds_overlap(&a, &c));
    }

    #[test]
    fn test_separated_on_one_axis_only() {
        // Same longitude span, disjoint latitude span
        let a = unit(0.0, 1.0, 0.0, 1.0);
        let b = unit(0.0, 1.0, 1.5, 2.0);
        assert!(!bounds_overlap(&a, &b));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = unit(0.0, 10.0, 0.0, 10.0);
        let inner = unit(2.0, 3.0, 2.0, 3.0);
        assert!(bounds_overlap(&outer, &inner));
        assert!(bounds_overlap(&inner, &outer));
    }

    #[test]
    fn test_degenerate_boxes() {
        let point = unit(1.0, 1.0, 1.0, 1.0);
        let same = unit(1.0, 1.0, 1.0, 1.0);
        let edge = unit(0.0, 1.0, 0.0, 2.0);
        let away = unit(1.5, 1.5, 1.0, 1.0);
        assert!(bounds_overlap(&point, &same));
        assert!(bounds_overlap(&point, &edge));
        assert!(!bounds_overlap(&point, &away));
    }

    #[test]
    fn test_nan_bounds_overlap_nothing() {
        let a = unit(0.0, 1.0, 0.0, 1.0);
        let everywhere = unit(-180.0, 180.0, -90.0, 90.0);
        let nan = unit(f64::NAN, f64::NAN, f64::NAN, f64::NAN);
        let half_nan = unit(0.0, 1.0, f64::NAN, 1.0);

        for b in [&a, &everywhere, &nan, &half_nan] {
            assert!(!bounds_overlap(&nan, b));
            assert!(!bounds_overlap(b, &nan));
            assert!(!bounds_overlap(&half_nan, b));
        }
        assert!(bounds_overlap(&a, &everywhere));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let boxes = [
            unit(0.0, 1.0, 0.0, 1.0),
            unit(1.0, 2.0, 0.0, 1.0),
            unit(5.0, 6.0, 5.0, 6.0),
            unit(0.5, 0.5, 0.5, 0.5),
            unit(-3.0, 0.0, -3.0, 0.0),
            unit(0.9, 5.1, 0.9, 5.1),
        ];
        for a in &boxes {
            for b in &boxes {
                assert_eq!(bounds_overlap(a, b), bounds_overlap(b, a));
            }
        }
    }

    #[test]
    fn test_merged_bounds() {
        let a = vec![GpsPoint::new(0.0, 0.0), GpsPoint::new(1.0, 1.0)];
        let b = vec![GpsPoint::new(3.0, -2.0)];
        let merged = merged_bounds([a.as_slice(), b.as_slice()], 0.5).unwrap();
        assert_eq!(merged, unit(-2.5, 1.5, -0.5, 3.5));
    }

    #[test]
    fn test_merged_bounds_skips_empty_and_rejects_all_empty() {
        let a: Vec<GpsPoint> = vec![];
        let b = vec![GpsPoint::new(2.0, 2.0)];
        let merged = merged_bounds([a.as_slice(), b.as_slice()], 0.0).unwrap();
        assert_eq!(merged, unit(2.0, 2.0, 2.0, 2.0));

        let err = merged_bounds([a.as_slice()], 0.0).unwrap_err();
        assert_eq!(err, ClusterError::EmptyCoordinates);

        let err = merged_bounds([b.as_slice()], -1.0).unwrap_err();
        assert_eq!(err, ClusterError::InvalidMargin(-1.0));
    }

    #[test]
    fn test_rect_conversion() {
        let bounds = unit(-0.13, -0.12, 51.50, 51.51);
        let rect: Rect<f64> = bounds.into();
        assert_eq!(rect.min(), Coord { x: -0.13, y: 51.50 });
        assert_eq!(rect.max(), Coord { x: -0.12, y: 51.51 });
        assert_eq!(Bounds::from(rect), bounds);
    }
}
