use lane_detector::config::{load_config, RuntimeConfig};
use lane_detector::image::io::{load_color_image, save_color_image, save_gray_image, write_json_file};
use lane_detector::{LaneDetector, LaneReport, LaneTrace};
use log::{error, info, warn};
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameSummary {
    input: PathBuf,
    annotated: PathBuf,
    report: LaneReport,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunSummary {
    frames_processed: usize,
    stopped_early: bool,
    frames: Vec<FrameSummary>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage() -> String {
    "Usage: lane_demo <config.json>".to_string()
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;
    let detector = LaneDetector::new(config.params.clone()).map_err(|e| e.to_string())?;

    let frames = config.frame_paths()?;
    if frames.is_empty() {
        return Err(format!("No input frames found in {config_path}"));
    }
    info!("lane_demo: {} frame(s) queued", frames.len());

    let mut summary = RunSummary {
        frames_processed: 0,
        stopped_early: false,
        frames: Vec::with_capacity(frames.len()),
    };
    for path in &frames {
        // An unreadable frame ends the stream.
        let frame = match load_color_image(path) {
            Ok(frame) => frame,
            Err(err) => {
                warn!("lane_demo: stopping at {}: {err}", path.display());
                summary.stopped_early = true;
                break;
            }
        };
        let trace = detector
            .process_with_diagnostics(&frame)
            .map_err(|e| format!("Failed to process {}: {e}", path.display()))?;
        let annotated = save_outputs(&config, path, &trace)?;
        info!("{}: {}", path.display(), trace.report.summary());
        summary.frames.push(FrameSummary {
            input: path.clone(),
            annotated,
            report: trace.report,
        });
        summary.frames_processed += 1;
    }

    if let Some(json_path) = &config.output.json_out {
        write_json_file(json_path, &summary)?;
        info!("lane_demo: JSON summary written to {}", json_path.display());
    }
    info!(
        "lane_demo: processed {} of {} frame(s)",
        summary.frames_processed,
        frames.len()
    );
    Ok(())
}

fn save_outputs(config: &RuntimeConfig, input: &Path, trace: &LaneTrace) -> Result<PathBuf, String> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("frame");
    let annotated = config.output.dir.join(format!("{stem}_lanes.png"));
    save_color_image(&trace.detection.annotated, &annotated)?;

    if let Some(dir) = &config.output.debug_dir {
        save_color_image(&trace.birds_eye, &dir.join(format!("{stem}_birds_eye.png")))?;
        save_gray_image(&trace.mask, &dir.join(format!("{stem}_mask.png")))?;
    }
    Ok(annotated)
}
