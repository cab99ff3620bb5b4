//! End-to-end localization scenarios.

use marga_nav::localization::{FilterConfig, ParticleFilter};
use marga_nav::{LaserScan, Point2D, Segment, VectorMap};
use std::f32::consts::PI;

const NUM_RANGES: usize = 100;
const RANGE_MIN: f32 = 0.02;
const RANGE_MAX: f32 = 20.0;
const SENSOR_OFFSET: f32 = 0.2;

fn square_room(half: f32) -> VectorMap {
    VectorMap::from_segments(vec![
        Segment::from_coords(-half, -half, half, -half),
        Segment::from_coords(half, -half, half, half),
        Segment::from_coords(half, half, -half, half),
        Segment::from_coords(-half, half, -half, -half),
    ])
}

/// Scan a perfectly calibrated sensor would report from the given pose,
/// derived from the filter's own ray casts so kept beams match exactly.
fn scan_from_pose(filter: &ParticleFilter, loc: Point2D, angle: f32) -> LaserScan {
    let cloud =
        filter.predicted_point_cloud(loc, angle, NUM_RANGES, RANGE_MIN, RANGE_MAX, -PI, PI);
    let sensor = loc + Point2D::new(angle.cos(), angle.sin()) * SENSOR_OFFSET;
    let subsample = NUM_RANGES / cloud.len();

    let mut ranges = vec![RANGE_MAX; NUM_RANGES];
    for (i, p) in cloud.iter().enumerate() {
        ranges[subsample * i] = p.distance(&sensor);
    }
    LaserScan::new(-PI, PI, RANGE_MIN, RANGE_MAX, ranges)
}

#[test]
fn filter_converges_on_matching_scans() {
    let mut filter = ParticleFilter::new(FilterConfig {
        seed: 11,
        ..Default::default()
    });
    filter.initialize_with_map(square_room(5.0), Point2D::ZERO, 0.0);
    filter.observe_odometry(Point2D::ZERO, 0.0);

    // The robot patrols ±0.15 m along x; every leg opens the update gate
    // and the scan always matches the true pose exactly.
    for step in 1..=10 {
        let x = 0.15 * (step % 2) as f32;
        let true_loc = Point2D::new(x, 0.0);
        filter.observe_odometry(true_loc, 0.0);
        filter.observe_laser(&scan_from_pose(&filter, true_loc, 0.0));
        assert_eq!(filter.particles().len(), 50);
    }

    // Ten gated updates with one resample (period 6) keep the estimate
    // locked to the true pose, which ends back at the origin.
    let (loc, angle) = filter.location();
    assert!(
        loc.distance(&Point2D::ZERO) < 0.25,
        "estimate drifted to ({:.3}, {:.3})",
        loc.x,
        loc.y
    );
    assert!(angle.abs() < 0.1, "heading drifted to {:.3}", angle);
}

#[test]
fn estimate_follows_odometry_between_scans() {
    let mut filter = ParticleFilter::new(FilterConfig {
        seed: 3,
        ..Default::default()
    });
    filter.initialize_with_map(square_room(5.0), Point2D::new(1.0, 1.0), 0.0);
    filter.observe_odometry(Point2D::new(1.0, 1.0), 0.0);

    filter.observe_odometry(Point2D::new(1.5, 1.0), 0.0);

    let (loc, _) = filter.location();
    assert!(loc.distance(&Point2D::new(1.5, 1.0)) < 0.3);
}

#[test]
fn initialize_from_map_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "-5, -5, 5, -5").unwrap();
    writeln!(file, "5, -5, 5, 5").unwrap();
    writeln!(file, "5, 5, -5, 5").unwrap();
    writeln!(file, "-5, 5, -5, -5").unwrap();

    let mut filter = ParticleFilter::new(FilterConfig {
        seed: 5,
        ..Default::default()
    });
    filter
        .initialize(file.path(), Point2D::ZERO, 0.0)
        .unwrap();

    assert_eq!(filter.map().len(), 4);
    assert_eq!(filter.particles().len(), 50);
}
