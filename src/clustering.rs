//! # Overlap Clustering
//!
//! Partitions tracks into the connected components of their bounding-box overlap graph.
//!
//! ## Algorithm
//! 1. Test every unordered pair of boxes with the inclusive overlap test (O(N²), the
//!    dominant cost; intended for a few hundred tracks)
//! 2. Feed each overlapping pair to a Union-Find (path compression, union by size)
//! 3. Read the sets back and attach the original tracks
//!
//! Tracks with no overlaps become singleton clusters, so the output is always a partition
//! of the input: every track appears in exactly one cluster.
//!
//! The order of clusters, and of tracks within a cluster, is not part of the contract.
//! This implementation emits members ascending and clusters by their smallest member.

use std::time::Instant;

use log::{debug, warn};

use crate::{geo_utils, Bounds, ClusterConfig, Result, Track, UnionFind};

/// One connected component of the overlap graph: the tracks that share a map panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster<'a> {
    indices: Vec<usize>,
    tracks: Vec<&'a Track>,
}

impl<'a> Cluster<'a> {
    fn from_indices(indices: Vec<usize>, all: &'a [Track]) -> Self {
        let tracks = indices.iter().map(|&i| &all[i]).collect();
        Self { indices, tracks }
    }

    /// Positions of the member tracks in the input slice, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn tracks(&self) -> &[&'a Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    pub fn track_ids(&self) -> Vec<&'a str> {
        self.tracks.iter().map(|t| t.id()).collect()
    }

    /// Panel extent: the box over every member coordinate, grown by `margin`.
    ///
    /// Computed from the raw coordinates, not from the already-expanded track boxes.
    pub fn bounds(&self, margin: f64) -> Result<Bounds> {
        geo_utils::merged_bounds(self.tracks.iter().map(|t| t.points()), margin)
    }
}

// ============================================================================
// Graph construction
// ============================================================================

/// All index pairs `(i, j)` with `i < j` whose boxes overlap.
///
/// These are the edges of the overlap graph.
///
/// # Example
/// ```
/// use track_clusters::{overlap_pairs, Bounds};
///
/// let b = |x: f64| Bounds { min_lat: 0.0, max_lat: 1.0, min_lng: x, max_lng: x + 1.0 };
/// assert_eq!(overlap_pairs(&[b(0.0), b(1.0), b(5.0)]), vec![(0, 1)]);
/// ```
pub fn overlap_pairs(bounds: &[Bounds]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, a) in bounds.iter().enumerate() {
        for (offset, b) in bounds[i + 1..].iter().enumerate() {
            if a.overlaps(b) {
                pairs.push((i, i + 1 + offset));
            }
        }
    }
    pairs
}

#[cfg(feature = "parallel")]
fn overlap_pairs_parallel(bounds: &[Bounds]) -> Vec<(usize, usize)> {
    use rayon::prelude::*;

    // Each outer index scans its own tail; per-worker edge lists are concatenated
    (0..bounds.len())
        .into_par_iter()
        .flat_map(|i| {
            let a = &bounds[i];
            bounds[i + 1..]
                .iter()
                .enumerate()
                .filter(|(_, b)| a.overlaps(b))
                .map(|(offset, _)| (i, i + 1 + offset))
                .collect::<Vec<_>>()
        })
        .collect()
}

// ============================================================================
// Component computation
// ============================================================================

fn components(len: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
    let mut uf = UnionFind::new(len);
    for &(i, j) in edges {
        uf.union(i, j);
    }
    uf.groups()
}

/// Cluster bounding boxes, returning the member indices of each cluster.
///
/// # Example
/// ```
/// use track_clusters::{cluster_bounds, Bounds};
///
/// let b = |x: f64| Bounds { min_lat: 0.0, max_lat: 1.0, min_lng: x, max_lng: x + 1.0 };
/// let clusters = cluster_bounds(&[b(0.0), b(10.0), b(1.0)]);
/// assert_eq!(clusters, vec![vec![0, 2], vec![1]]);
/// ```
pub fn cluster_bounds(bounds: &[Bounds]) -> Vec<Vec<usize>> {
    if bounds.is_empty() {
        return vec![];
    }

    let start = Instant::now();
    let edges = overlap_pairs(bounds);
    let groups = components(bounds.len(), &edges);

    debug!(
        "[TrackClusters] {} boxes, {} overlapping pairs -> {} clusters in {:?}",
        bounds.len(),
        edges.len(),
        groups.len(),
        start.elapsed()
    );

    groups
}

/// Cluster bounding boxes using parallel pair scanning.
///
/// Same partition as [`cluster_bounds`]; only the O(N²) scan runs on the rayon pool.
#[cfg(feature = "parallel")]
pub fn cluster_bounds_parallel(bounds: &[Bounds]) -> Vec<Vec<usize>> {
    if bounds.is_empty() {
        return vec![];
    }

    let start = Instant::now();
    let edges = overlap_pairs_parallel(bounds);
    // Union-Find (sequential - fast enough)
    let groups = components(bounds.len(), &edges);

    debug!(
        "[TrackClusters] {} boxes, {} overlapping pairs -> {} clusters in {:?} (parallel)",
        bounds.len(),
        edges.len(),
        groups.len(),
        start.elapsed()
    );

    groups
}

/// Connected components from explicit adjacency lists.
///
/// `adjacency[i]` lists the neighbours of vertex `i`. Edges need not be listed in both
/// directions. Neighbour indices outside `0..adjacency.len()` are ignored.
///
/// # Example
/// ```
/// use track_clusters::group_adjacent;
///
/// let adjacency = vec![vec![], vec![2], vec![1], vec![4], vec![3, 5], vec![4, 6], vec![5]];
/// assert_eq!(
///     group_adjacent(&adjacency),
///     vec![vec![0], vec![1, 2], vec![3, 4, 5, 6]]
/// );
/// ```
pub fn group_adjacent(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let len = adjacency.len();
    let mut uf = UnionFind::new(len);

    for (i, neighbours) in adjacency.iter().enumerate() {
        for &j in neighbours {
            if j >= len {
                warn!(
                    "[TrackClusters] ignoring neighbour {} of vertex {}: only {} vertices",
                    j, i, len
                );
                continue;
            }
            uf.union(i, j);
        }
    }

    uf.groups()
}

// ============================================================================
// Track clustering
// ============================================================================

/// Group tracks whose bounding boxes are connected by a chain of overlaps.
///
/// Returns a partition of `tracks`: empty input gives no clusters, and tracks that overlap
/// nothing each get their own cluster.
///
/// # Example
/// ```
/// use track_clusters::{cluster_tracks, GpsPoint, Track};
///
/// let a = Track::new("a", vec![GpsPoint::new(0.0, 0.0), GpsPoint::new(1.0, 1.0)], 0.0)?;
/// let b = Track::new("b", vec![GpsPoint::new(1.0, 1.0), GpsPoint::new(2.0, 2.0)], 0.0)?;
/// let c = Track::new("c", vec![GpsPoint::new(9.0, 9.0)], 0.0)?;
///
/// let tracks = [a, b, c];
/// let clusters = cluster_tracks(&tracks);
/// assert_eq!(clusters.len(), 2);
/// assert_eq!(clusters[0].track_ids(), vec!["a", "b"]);
/// # Ok::<(), track_clusters::ClusterError>(())
/// ```
pub fn cluster_tracks(tracks: &[Track]) -> Vec<Cluster<'_>> {
    let bounds: Vec<Bounds> = tracks.iter().map(|t| *t.bounds()).collect();
    materialize(cluster_bounds(&bounds), tracks)
}

/// Group tracks using parallel pair scanning.
///
/// This is the same as [`cluster_tracks`] but the overlap scan runs on rayon.
/// Recommended for large batches (several hundred tracks or more).
#[cfg(feature = "parallel")]
pub fn cluster_tracks_parallel(tracks: &[Track]) -> Vec<Cluster<'_>> {
    let bounds: Vec<Bounds> = tracks.iter().map(|t| *t.bounds()).collect();
    materialize(cluster_bounds_parallel(&bounds), tracks)
}

/// Group tracks honouring every setting in `config`.
///
/// Boxes are derived from each track's raw points with `config.margin`, so the margin the
/// tracks were built with does not matter here.
///
/// - `clustered == false`: all tracks go into a single cluster
/// - `first_cluster_only == true`: only the cluster holding the first track is kept
///
/// Returns [`crate::ClusterError::InvalidMargin`] if the configured margin is unusable.
///
/// # Example
/// ```
/// use track_clusters::{group_tracks, ClusterConfig, GpsPoint, Track};
///
/// let a = Track::new("a", vec![GpsPoint::new(0.0, 0.0), GpsPoint::new(1.0, 1.0)], 0.0)?;
/// let b = Track::new("b", vec![GpsPoint::new(0.0, 1.3), GpsPoint::new(1.0, 2.3)], 0.0)?;
/// let tracks = [a, b];
///
/// let config = ClusterConfig { margin: 0.2, ..ClusterConfig::default() };
/// assert_eq!(group_tracks(&tracks, &config)?.len(), 1);
/// # Ok::<(), track_clusters::ClusterError>(())
/// ```
pub fn group_tracks<'a>(tracks: &'a [Track], config: &ClusterConfig) -> Result<Vec<Cluster<'a>>> {
    config.validate()?;

    if tracks.is_empty() {
        return Ok(vec![]);
    }

    let mut clusters = if config.clustered {
        let bounds = tracks
            .iter()
            .map(|t| Bounds::from_points(t.points(), config.margin))
            .collect::<Result<Vec<Bounds>>>()?;
        materialize(cluster_bounds(&bounds), tracks)
    } else {
        vec![Cluster::from_indices((0..tracks.len()).collect(), tracks)]
    };

    if config.first_cluster_only {
        clusters.truncate(1);
    }

    debug!(
        "[TrackClusters] grouped {} tracks into {} panels \
         (margin: {}, clustered: {}, first only: {})",
        tracks.len(),
        clusters.len(),
        config.margin,
        config.clustered,
        config.first_cluster_only
    );

    Ok(clusters)
}

fn materialize(groups: Vec<Vec<usize>>, tracks: &[Track]) -> Vec<Cluster<'_>> {
    groups
        .into_iter()
        .map(|indices| Cluster::from_indices(indices, tracks))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
