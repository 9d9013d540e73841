use clap::Parser;
use std::time::Instant;
use traffic_mirror_map_detector::camera_model::CameraConfig;
use traffic_mirror_map_detector::io::{DetectionReport, object_from_json, object_to_json};
use traffic_mirror_map_detector::map::{Route, VectorMap};
use traffic_mirror_map_detector::pose_source::{Trajectory, TrajectoryPoseSource};
use traffic_mirror_map_detector::{DetectorConfig, FrameHeader, LandmarkStore, MapBasedDetector};

#[derive(Parser)]
#[command(version, about, author)]
struct TmmdCli {
    /// vector map JSON (lanelets, regulatory elements, line strings)
    #[arg(long)]
    map: String,

    /// camera JSON: {"type": "pinhole", ...} or {"type": "generic", "model": "opencv5", ...}
    #[arg(long)]
    camera: String,

    /// camera pose history JSON: {"frame_id": ..., "poses": [...]}
    #[arg(long)]
    trajectory: String,

    /// frame headers JSON: [{"stamp_ns": ..., "frame_id": ...}, ...]
    #[arg(long)]
    frames: String,

    /// route JSON restricting detection to the lanelets along it
    #[arg(long)]
    route: Option<String>,

    /// detector parameters JSON; missing keys take their defaults
    #[arg(long)]
    config: Option<String>,

    /// where to write the detection report
    #[arg(long, default_value = "rois.json")]
    output: String,

    /// save a rerun recording of ROIs and beams to this .rrd file
    #[cfg(feature = "visualization")]
    #[arg(long)]
    rerun: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = TmmdCli::parse();

    let config: DetectorConfig = match &cli.config {
        Some(path) => object_from_json(path)?,
        None => DetectorConfig::default(),
    };
    let detector = MapBasedDetector::new(config);

    let camera_config: CameraConfig = object_from_json(&cli.camera)?;
    let camera = camera_config.build()?;
    let trajectory: Trajectory = object_from_json(&cli.trajectory)?;
    let pose_source = TrajectoryPoseSource::from_trajectory(&trajectory);
    let frames: Vec<FrameHeader> = object_from_json(&cli.frames)?;

    let store = LandmarkStore::new();
    store.on_map(object_from_json::<VectorMap>(&cli.map)?);
    if let Some(route_path) = &cli.route {
        let route: Route = object_from_json(route_path)?;
        if let Err(e) = store.on_route(&route) {
            log::error!("{}", e);
        }
    }

    #[cfg(feature = "visualization")]
    let recording = match &cli.rerun {
        Some(path) => Some(rerun::RecordingStreamBuilder::new("traffic_mirror_detector").save(path)?),
        None => None,
    };

    let now = Instant::now();
    let mut outputs = Vec::new();
    for header in &frames {
        let snapshot = store.snapshot();
        let Some(output) = detector.process_frame(header, &camera, &pose_source, &snapshot) else {
            continue;
        };
        log::debug!(
            "frame {}: {} mirrors in view",
            header.stamp_ns,
            output.rough.rois.len()
        );
        #[cfg(feature = "visualization")]
        if let Some(recording) = &recording {
            use traffic_mirror_map_detector::visualization::{log_beams, log_rois, set_frame_time};
            set_frame_time(recording, header.stamp_ns);
            let topic = format!("/{}", header.frame_id);
            log_rois(recording, &format!("{}/rough", topic), &output.rough)?;
            log_rois(recording, &format!("{}/expected", topic), &output.expected)?;
            log_beams(recording, &topic, &output.beams)?;
        }
        outputs.push(output);
    }
    let duration_sec = now.elapsed().as_secs_f64();
    log::info!("processed {} frames in {:.6} sec", frames.len(), duration_sec);

    let report = DetectionReport::new(*detector.config(), frames.len(), outputs);
    object_to_json(&cli.output, &report)?;
    log::info!(
        "wrote {} frame outputs ({} skipped) to {}",
        report.outputs.len(),
        report.frames_skipped,
        cli.output
    );
    Ok(())
}
