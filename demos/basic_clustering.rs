//! Basic example of clustering GPS tracks into map panels.
//!
//! Run with: cargo run --example basic_clustering

use track_clusters::{group_tracks, ClusterConfig, ClusterError, GpsPoint, Track};

fn main() -> Result<(), ClusterError> {
    let config = ClusterConfig {
        margin: 0.01,
        ..ClusterConfig::default()
    };
    config.validate()?;

    // Two commutes in London that touch, one ride that bridges to a third loop,
    // and a holiday ride in Paris
    let commute_am = vec![
        GpsPoint::new(51.5074, -0.1278), // Start
        GpsPoint::new(51.5090, -0.1300),
        GpsPoint::new(51.5110, -0.1320), // End
    ];
    let commute_pm = vec![
        GpsPoint::new(51.5110, -0.1320),
        GpsPoint::new(51.5074, -0.1278),
    ];
    let richmond_loop = vec![
        GpsPoint::new(51.4400, -0.2900),
        GpsPoint::new(51.4500, -0.3100),
        GpsPoint::new(51.4600, -0.2950),
    ];
    let bridge_ride = vec![
        GpsPoint::new(51.4600, -0.2950),
        GpsPoint::new(51.4900, -0.2000),
        GpsPoint::new(51.5070, -0.1400),
    ];
    let paris = vec![
        GpsPoint::new(48.8566, 2.3522),
        GpsPoint::new(48.8606, 2.3562),
    ];

    // group_tracks applies the configured margin itself
    let tracks = vec![
        Track::new("commute-am", commute_am, 0.0)?,
        Track::new("commute-pm", commute_pm, 0.0)?,
        Track::new("richmond-loop", richmond_loop, 0.0)?,
        Track::new("bridge-ride", bridge_ride, 0.0)?,
        Track::new("paris", paris, 0.0)?,
    ];

    println!("Track Clustering Example\n");
    println!(
        "Config: margin={}deg, clustered={}, first_cluster_only={}\n",
        config.margin, config.clustered, config.first_cluster_only
    );

    let clusters = group_tracks(&tracks, &config)?;

    println!("Found {} panels:\n", clusters.len());
    for (i, cluster) in clusters.iter().enumerate() {
        let panel = cluster.bounds(config.margin)?;
        println!("  Panel {}: {:?}", i + 1, cluster.track_ids());
        println!(
            "    extent: {:.4}..{:.4}E, {:.4}..{:.4}N ({:.3} x {:.3} deg)",
            panel.min_lng,
            panel.max_lng,
            panel.min_lat,
            panel.max_lat,
            panel.width(),
            panel.height()
        );
    }

    // Everything on one panel
    let single = ClusterConfig {
        clustered: false,
        ..config
    };
    println!(
        "\nUnclustered: {} panel(s)",
        group_tracks(&tracks, &single)?.len()
    );

    Ok(())
}
