use nalgebra as na;
use std::collections::BTreeMap;
use std::f64::consts::FRAC_PI_2;
use traffic_mirror_map_detector::map::{
    MapLanelet, MapLineString, MapRegulatoryElement, Route, RouteSegment, VectorMap,
};
use traffic_mirror_map_detector::{
    CameraPose, DetectorConfig, FrameHeader, LandmarkStore, MapBasedDetector, PinholeCamera,
    TrajectoryPoseSource,
};

const FRAME_ID: &str = "camera";

/// A straight road along +x with a mirror on a pole every 30 m, alternating sides.
fn synthetic_map() -> VectorMap {
    let mut map = VectorMap::default();
    for i in 0..6i64 {
        let x = 30.0 * (i + 1) as f64;
        let y = if i % 2 == 0 { 4.0 } else { -4.0 };
        let line_string_id = 1000 + i;
        map.line_strings.push(MapLineString {
            id: line_string_id,
            points: vec![[x, y + 0.4, 2.0], [x, y - 0.4, 2.0]],
            attributes: BTreeMap::from([
                ("subtype".to_string(), "convex".to_string()),
                ("height".to_string(), "0.8".to_string()),
            ]),
        });
        map.regulatory_elements.push(MapRegulatoryElement {
            id: 100 + i,
            subtype: "traffic_mirror".to_string(),
            refers: vec![line_string_id],
        });
        map.lanelets.push(MapLanelet {
            id: i,
            regulatory_elements: vec![100 + i],
        });
    }
    map
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let camera = PinholeCamera::from_horizontal_fov(1280, 720, FRAC_PI_2);
    let store = LandmarkStore::new();
    store.on_map(synthetic_map());
    let route = Route {
        segments: vec![RouteSegment {
            primitives: vec![0, 1, 2, 3],
        }],
    };
    store.on_route(&route).unwrap();

    // 10 m/s for 12 s, pose samples every 50 ms
    let mut source = TrajectoryPoseSource::new();
    source.insert_frame(
        FRAME_ID,
        (0..=240).map(|i| {
            let t = i as f64 * 0.05;
            CameraPose::optical_from_yaw(
                (t * 1e9) as i64,
                na::Point3::new(10.0 * t, 0.1 * (t * 2.0).sin(), 1.5),
                0.01 * (t * 3.0).sin(),
            )
        }),
    );

    let detector = MapBasedDetector::new(DetectorConfig {
        max_vibration_pitch: 0.01,
        max_vibration_yaw: 0.01,
        max_vibration_height: 0.1,
        max_vibration_width: 0.1,
        max_vibration_depth: 0.5,
        min_timestamp_offset: -0.05,
        max_timestamp_offset: 0.05,
        ..Default::default()
    });

    // one frame per second at 10 Hz stamps
    for second in 1..12i64 {
        let header = FrameHeader::new(second * 1_000_000_000, FRAME_ID);
        let snapshot = store.snapshot();
        let Some(output) = detector.process_frame(&header, &camera, &source, &snapshot) else {
            continue;
        };
        println!("t = {} s: {} mirrors", second, output.rough.rois.len());
        for (rough, expected) in output.rough.rois.iter().zip(&output.expected.rois) {
            let (cx, cy) = expected.center();
            println!(
                "  mirror {:>5}: rough {}x{} at ({}, {}), expected centre ({:.1}, {:.1})",
                rough.landmark_id, rough.width, rough.height, rough.x_offset, rough.y_offset, cx, cy
            );
        }
    }
}
