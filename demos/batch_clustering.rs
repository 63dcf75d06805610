//! Example of clustering a large batch of tracks in parallel.
//!
//! Run with: cargo run --example batch_clustering --features parallel

use std::time::Instant;
use track_clusters::{cluster_tracks, cluster_tracks_parallel, GpsPoint, Track};

fn main() {
    println!("Batch Track Clustering Example\n");

    // Base locations: rides scatter around each one
    let bases = [
        ("london", 51.5074, -0.1278),
        ("paris", 48.8566, 2.3522),
        ("nyc", 40.7128, -74.0060),
        ("tokyo", 35.6762, 139.6503),
    ];

    let margin = 0.05;
    let mut tracks = Vec::new();

    for (name, lat, lng) in bases {
        for i in 0..150 {
            let route = synthetic_ride(lat, lng, i);
            match Track::new(format!("{}-{}", name, i), route, margin) {
                Ok(track) => tracks.push(track),
                Err(e) => eprintln!("skipping {}-{}: {}", name, i, e),
            }
        }
    }

    println!("Created {} tracks\n", tracks.len());

    let start = Instant::now();
    let sequential = cluster_tracks(&tracks);
    let sequential_elapsed = start.elapsed();

    let start = Instant::now();
    let parallel = cluster_tracks_parallel(&tracks);
    let parallel_elapsed = start.elapsed();

    println!("Sequential: {} clusters in {:?}", sequential.len(), sequential_elapsed);
    println!("Parallel:   {} clusters in {:?}\n", parallel.len(), parallel_elapsed);

    for cluster in &parallel {
        let ids = cluster.track_ids();
        println!("  Cluster of {} tracks, first: {}", cluster.len(), ids[0]);
    }

    // Stats
    let total_tracks: usize = parallel.iter().map(|c| c.len()).sum();
    let largest = parallel.iter().map(|c| c.len()).max().unwrap_or(0);
    let singletons = parallel.iter().filter(|c| c.len() == 1).count();

    println!("\nStats:");
    println!("  Total tracks: {}", total_tracks);
    println!("  Number of clusters: {}", parallel.len());
    println!("  Largest cluster: {} tracks", largest);
    println!("  Singleton clusters: {}", singletons);
}

/// Short out-and-back ride offset deterministically from a base location
fn synthetic_ride(lat: f64, lng: f64, seed: usize) -> Vec<GpsPoint> {
    let angle = seed as f64 * 0.7;
    let reach = 0.02 + (seed % 7) as f64 * 0.01;
    let offset = (seed % 5) as f64 * 0.03;

    (0..10)
        .map(|step| {
            let t = step as f64 / 9.0;
            GpsPoint::new(
                lat + offset + angle.sin() * reach * t,
                lng + offset + angle.cos() * reach * t,
            )
        })
        .collect()
}
