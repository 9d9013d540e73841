mod common;

use common::mirror;
use nalgebra as na;
use std::f64::consts::{FRAC_PI_2, PI};
use traffic_mirror_map_detector::landmark::{Landmark, LandmarkError, LandmarkSet};

#[test]
fn test_reference_points() {
    let m = mirror(1, [10.0, 2.0, 1.0], [10.0, 0.0, 0.5], 1.5);
    assert_eq!(m.top_left(), na::Point3::new(10.0, 2.0, 2.5));
    assert_eq!(m.bottom_right(), na::Point3::new(10.0, 0.0, 0.5));
    assert_eq!(m.center(), na::Point3::new(10.0, 1.0, 1.5));
}

#[test]
fn test_yaw_faces_viewer() {
    // first point on the left of a viewer looking along +x
    let facing = mirror(1, [10.0, 2.0, 0.0], [10.0, 0.0, 0.0], 1.0);
    assert!(facing.yaw().abs() < 1e-12);

    let reversed = mirror(2, [10.0, 0.0, 0.0], [10.0, 2.0, 0.0], 1.0);
    assert!((reversed.yaw() - PI).abs() < 1e-12);

    let along_x = mirror(3, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 1.0);
    assert!((along_x.yaw() - FRAC_PI_2).abs() < 1e-12);
}

#[test]
fn test_actionable_subtypes() {
    let p0 = na::Point3::new(0.0, 0.0, 0.0);
    let p1 = na::Point3::new(1.0, 0.0, 0.0);
    let solid = Landmark::new(1, p0, p1, 1.0, Some("solid".to_string())).unwrap();
    let missing = Landmark::new(2, p0, p1, 1.0, None).unwrap();
    let convex = Landmark::new(3, p0, p1, 1.0, Some("convex".to_string())).unwrap();
    assert!(!solid.is_actionable());
    assert!(!missing.is_actionable());
    assert!(convex.is_actionable());
}

#[test]
fn test_invalid_geometry_rejected() {
    let p = na::Point3::new(1.0, 2.0, 3.0);
    assert_eq!(
        Landmark::new(7, p, p, 1.0, None),
        Err(LandmarkError::DegenerateSegment { id: 7 })
    );
    let nan = na::Point3::new(f64::NAN, 0.0, 0.0);
    assert_eq!(
        Landmark::new(8, nan, p, 1.0, None),
        Err(LandmarkError::NonFinite { id: 8 })
    );
    assert_eq!(
        Landmark::new(9, na::Point3::origin(), p, f64::INFINITY, None),
        Err(LandmarkError::NonFinite { id: 9 })
    );
}

#[test]
fn test_set_orders_by_id_and_replaces() {
    let set: LandmarkSet = [
        mirror(30, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 1.0),
        mirror(10, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 1.0),
        mirror(20, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 1.0),
        mirror(10, [5.0, 0.0, 0.0], [6.0, 0.0, 0.0], 2.0),
    ]
    .into_iter()
    .collect();

    let ids: Vec<i64> = set.iter().map(|l| l.id()).collect();
    assert_eq!(ids, vec![10, 20, 30]);
    assert_eq!(set.len(), 3);
    assert_eq!(set.get(10).unwrap().height(), 2.0);
    assert!(set.get(99).is_none());
}
