//! # Track Clusters
//!
//! Spatial clustering of GPS activity tracks for multi-panel map rendering.
//!
//! Each track gets an axis-aligned bounding box (optionally grown by a margin). Two tracks
//! land in the same cluster if and only if a chain of pairwise-overlapping boxes connects
//! them, so every cluster can be drawn on its own satellite panel without cutting a track.
//!
//! This library provides:
//! - Bounding box derivation with margin expansion
//! - Inclusive (boundary-touching) overlap testing
//! - Connected-component clustering using Union-Find
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel overlap scanning with rayon
//! - **`serde`** - Enable serde derives for points, bounds and configuration
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use track_clusters::{cluster_tracks, GpsPoint, Track};
//!
//! let margin = 0.01;
//! let morning = vec![GpsPoint::new(51.50, -0.13), GpsPoint::new(51.51, -0.12)];
//! let evening = vec![GpsPoint::new(51.51, -0.12), GpsPoint::new(51.52, -0.11)];
//! let holiday = vec![GpsPoint::new(48.85, 2.35), GpsPoint::new(48.86, 2.36)];
//!
//! let tracks = vec![
//!     Track::new("morning", morning, margin)?,
//!     Track::new("evening", evening, margin)?,
//!     Track::new("holiday", holiday, margin)?,
//! ];
//!
//! let clusters = cluster_tracks(&tracks);
//! assert_eq!(clusters.len(), 2);
//! # Ok::<(), track_clusters::ClusterError>(())
//! ```

use geo::{BoundingRect, Coord, LineString};

pub mod geo_utils;

pub mod union_find;
pub use union_find::UnionFind;

// Connected-component clustering over the implicit overlap graph
pub mod clustering;
pub use clustering::{
    cluster_bounds, cluster_tracks, group_adjacent, group_tracks, overlap_pairs, Cluster,
};

#[cfg(feature = "parallel")]
pub use clustering::{cluster_bounds_parallel, cluster_tracks_parallel};

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while building tracks and bounding boxes.
///
/// Overlap testing and clustering themselves never fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClusterError {
    #[error("track {track_id:?} has no coordinates")]
    EmptyTrack { track_id: String },

    #[error("cannot bound an empty coordinate sequence")]
    EmptyCoordinates,

    #[error("invalid margin {0}: must be finite and non-negative")]
    InvalidMargin(f64),
}

pub type Result<T> = std::result::Result<T, ClusterError>;

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use track_clusters::GpsPoint;
/// let point = GpsPoint::new(51.5074, -0.1278); // London
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

impl From<[f64; 2]> for GpsPoint {
    /// Build from a `[lat, lng]` pair, the layout decoded polylines use.
    fn from(latlng: [f64; 2]) -> Self {
        Self::new(latlng[0], latlng[1])
    }
}

/// Axis-aligned bounding box in degrees.
///
/// The x axis is longitude and the y axis is latitude. For finite coordinates `max >= min`
/// holds on both axes; a box built from a single point with no margin is degenerate (zero
/// width and height).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Create bounds covering all points, grown by `margin` degrees on every side.
    ///
    /// Returns [`ClusterError::EmptyCoordinates`] for an empty slice and
    /// [`ClusterError::InvalidMargin`] for a negative or non-finite margin.
    ///
    /// # Example
    /// ```
    /// use track_clusters::{Bounds, GpsPoint};
    ///
    /// let points = [GpsPoint::new(1.0, 10.0), GpsPoint::new(2.0, 12.0)];
    /// let bounds = Bounds::from_points(&points, 0.5).unwrap();
    /// assert_eq!(bounds.min_lng, 9.5);
    /// assert_eq!(bounds.max_lat, 2.5);
    /// ```
    pub fn from_points(points: &[GpsPoint], margin: f64) -> Result<Self> {
        check_margin(margin)?;

        let line: LineString<f64> = points
            .iter()
            .map(|p| Coord { x: p.longitude, y: p.latitude })
            .collect();
        let rect = line.bounding_rect().ok_or(ClusterError::EmptyCoordinates)?;

        Ok(Self::from(rect).expand(margin))
    }

    /// Grow the box by `margin` degrees on all four sides.
    #[must_use]
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            min_lat: self.min_lat - margin,
            max_lat: self.max_lat + margin,
            min_lng: self.min_lng - margin,
            max_lng: self.max_lng + margin,
        }
    }

    /// Inclusive overlap test. Boxes that only share an edge or a corner overlap.
    ///
    /// # Example
    /// ```
    /// use track_clusters::Bounds;
    ///
    /// let a = Bounds { min_lat: 0.0, max_lat: 1.0, min_lng: 0.0, max_lng: 1.0 };
    /// let b = Bounds { min_lat: 0.0, max_lat: 1.0, min_lng: 1.0, max_lng: 2.0 };
    /// assert!(a.overlaps(&b));
    /// ```
    #[inline]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        geo_utils::bounds_overlap(self, other)
    }

    /// Smallest box containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Bounds) -> Self {
        Self {
            min_lat: self.min_lat.min(other.min_lat),
            max_lat: self.max_lat.max(other.max_lat),
            min_lng: self.min_lng.min(other.min_lng),
            max_lng: self.max_lng.max(other.max_lng),
        }
    }

    /// Longitude extent in degrees.
    pub fn width(&self) -> f64 {
        self.max_lng - self.min_lng
    }

    /// Latitude extent in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> GpsPoint {
        GpsPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

/// A single recorded activity: an identifier plus its coordinates.
///
/// The bounding box is derived once at construction (with the margin given there) and the
/// track is read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    id: String,
    points: Vec<GpsPoint>,
    bounds: Bounds,
}

impl Track {
    /// Create a track and derive its margin-expanded bounding box.
    ///
    /// # Example
    /// ```
    /// use track_clusters::{ClusterError, GpsPoint, Track};
    ///
    /// let track = Track::new("ride-1", vec![GpsPoint::new(51.5, -0.1)], 0.0).unwrap();
    /// assert_eq!(track.bounds().width(), 0.0);
    ///
    /// let err = Track::new("ride-2", vec![], 0.0).unwrap_err();
    /// assert!(matches!(err, ClusterError::EmptyTrack { .. }));
    /// ```
    pub fn new(id: impl Into<String>, points: Vec<GpsPoint>, margin: f64) -> Result<Self> {
        let id = id.into();
        let bounds = Bounds::from_points(&points, margin).map_err(|e| match e {
            ClusterError::EmptyCoordinates => ClusterError::EmptyTrack { track_id: id.clone() },
            other => other,
        })?;

        Ok(Self { id, points, bounds })
    }

    /// Create a track from `[lat, lng]` pairs.
    pub fn from_latlngs(id: impl Into<String>, latlngs: &[[f64; 2]], margin: f64) -> Result<Self> {
        let points = latlngs.iter().copied().map(GpsPoint::from).collect();
        Self::new(id, points, margin)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn points(&self) -> &[GpsPoint] {
        &self.points
    }

    /// Margin-expanded bounding box used for overlap tests.
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for track clustering.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClusterConfig {
    /// Margin by which every track's bounding box is extended, in degrees.
    /// Default: 0.2
    pub margin: f64,

    /// Split tracks into overlap clusters. When false, all tracks share one cluster.
    /// Default: true
    pub clustered: bool,

    /// Keep only the first cluster (the one containing the first track).
    /// Default: false
    pub first_cluster_only: bool,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            margin: 0.2,
            clustered: true,
            first_cluster_only: false,
        }
    }
}

impl ClusterConfig {
    /// Check that the margin is usable for bounding box construction.
    pub fn validate(&self) -> Result<()> {
        check_margin(self.margin)
    }

    /// Build a track using this configuration's margin.
    pub fn track(&self, id: impl Into<String>, points: Vec<GpsPoint>) -> Result<Track> {
        Track::new(id, points, self.margin)
    }
}

pub(crate) fn check_margin(margin: f64) -> Result<()> {
    if margin.is_finite() && margin >= 0.0 {
        Ok(())
    } else {
        Err(ClusterError::InvalidMargin(margin))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_route() -> Vec<GpsPoint> {
        vec![
            GpsPoint::new(51.5074, -0.1278),
            GpsPoint::new(51.5080, -0.1290),
            GpsPoint::new(51.5090, -0.1300),
            GpsPoint::new(51.5100, -0.1310),
            GpsPoint::new(51.5110, -0.1320),
        ]
    }

    #[test]
    fn test_gps_point_validation() {
        assert!(GpsPoint::new(51.5074, -0.1278).is_valid());
        assert!(!GpsPoint::new(91.0, 0.0).is_valid());
        assert!(!GpsPoint::new(0.0, 181.0).is_valid());
        assert!(!GpsPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_bounds_from_points() {
        let bounds = Bounds::from_points(&sample_route(), 0.0).unwrap();
        assert_eq!(bounds.min_lat, 51.5074);
        assert_eq!(bounds.max_lat, 51.5110);
        assert_eq!(bounds.min_lng, -0.1320);
        assert_eq!(bounds.max_lng, -0.1278);
    }

    #[test]
    fn test_bounds_margin_expands_every_side() {
        let points = [GpsPoint::new(1.0, 10.0), GpsPoint::new(3.0, 14.0)];
        let bounds = Bounds::from_points(&points, 0.25).unwrap();
        assert_eq!(bounds.min_lat, 0.75);
        assert_eq!(bounds.max_lat, 3.25);
        assert_eq!(bounds.min_lng, 9.75);
        assert_eq!(bounds.max_lng, 14.25);
    }

    #[test]
    fn test_width_is_longitude_and_height_is_latitude() {
        let points = [GpsPoint::new(0.0, 0.0), GpsPoint::new(1.0, 4.0)];
        let bounds = Bounds::from_points(&points, 0.0).unwrap();
        assert_eq!(bounds.width(), 4.0);
        assert_eq!(bounds.height(), 1.0);
    }

    #[test]
    fn test_single_point_is_degenerate() {
        let bounds = Bounds::from_points(&[GpsPoint::new(5.0, 6.0)], 0.0).unwrap();
        assert_eq!(bounds.width(), 0.0);
        assert_eq!(bounds.height(), 0.0);
        assert_eq!(bounds.center(), GpsPoint::new(5.0, 6.0));
    }

    #[test]
    fn test_empty_points_rejected() {
        let err = Bounds::from_points(&[], 0.1).unwrap_err();
        assert_eq!(err, ClusterError::EmptyCoordinates);
        assert_eq!(err.to_string(), "cannot bound an empty coordinate sequence");
    }

    #[test]
    fn test_invalid_margin_rejected() {
        let points = sample_route();
        assert_eq!(
            Bounds::from_points(&points, -0.1).unwrap_err(),
            ClusterError::InvalidMargin(-0.1)
        );
        assert!(Bounds::from_points(&points, f64::NAN).is_err());
        assert!(Bounds::from_points(&points, f64::INFINITY).is_err());
    }

    #[test]
    fn test_empty_track_error_names_track() {
        let err = Track::new("activity-42", vec![], 0.2).unwrap_err();
        assert_eq!(
            err,
            ClusterError::EmptyTrack { track_id: "activity-42".to_string() }
        );
        assert!(err.to_string().contains("activity-42"));
    }

    #[test]
    fn test_track_from_latlngs() {
        let track = Track::from_latlngs("a", &[[51.0, -1.0], [52.0, 0.0]], 0.0).unwrap();
        assert_eq!(track.id(), "a");
        assert_eq!(track.points().len(), 2);
        assert_eq!(track.points()[0], GpsPoint::new(51.0, -1.0));
        assert_eq!(track.bounds().max_lat, 52.0);
    }

    #[test]
    fn test_bounds_union() {
        let a = Bounds { min_lat: 0.0, max_lat: 1.0, min_lng: 0.0, max_lng: 1.0 };
        let b = Bounds { min_lat: -1.0, max_lat: 0.5, min_lng: 2.0, max_lng: 3.0 };
        let u = a.union(&b);
        assert_eq!(u, Bounds { min_lat: -1.0, max_lat: 1.0, min_lng: 0.0, max_lng: 3.0 });
    }

    #[test]
    fn test_config_default_and_validate() {
        let config = ClusterConfig::default();
        assert_eq!(config.margin, 0.2);
        assert!(config.clustered);
        assert!(!config.first_cluster_only);
        assert!(config.validate().is_ok());

        let bad = ClusterConfig { margin: -1.0, ..ClusterConfig::default() };
        assert_eq!(bad.validate(), Err(ClusterError::InvalidMargin(-1.0)));
    }

    #[test]
    fn test_config_track_uses_margin() {
        let config = ClusterConfig { margin: 1.0, ..ClusterConfig::default() };
        let track = config.track("x", vec![GpsPoint::new(0.0, 0.0)]).unwrap();
        assert_eq!(track.bounds().width(), 2.0);
        assert_eq!(track.bounds().height(), 2.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_deserialize_with_defaults() {
        let config: ClusterConfig = serde_json::from_str(r#"{"margin": 0.05}"#).unwrap();
        assert_eq!(config.margin, 0.05);
        assert!(config.clustered);
        assert!(!config.first_cluster_only);

        let json = serde_json::to_string(&ClusterConfig::default()).unwrap();
        assert!(json.contains("\"first_cluster_only\":false"));
    }
}
