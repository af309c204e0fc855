use std::path::Path;

use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;

use crate::colmap::{ColmapRunner, ReferenceModel, write_frame_model, write_reference_frame_model};
use crate::config::PrepConfig;
use crate::data_loader::{camera_folders, prepare_frame_inputs};
use crate::error::{PrepError, Result};
use crate::io::{FrameReport, PrepReport, write_report};
use crate::metadata::{META_FILE, MetaSplit};

pub const REPORT_FILE: &str = "prep_report.json";

/// Where the cameras of every frame come from.
enum CameraSource {
    Metadata(MetaSplit),
    Reference(ReferenceModel),
}

fn load_metadata(config: &PrepConfig) -> Result<Option<MetaSplit>> {
    // the reference model replaces the metadata, which is then only
    // needed for the train/test split
    if config.ref_frame.is_some() && !MetaSplit::is_present(&config.base_dir) {
        return Ok(None);
    }
    MetaSplit::load(&config.base_dir).map(Some)
}

/// Frames to process. A reference frame is already reconstructed and is
/// left alone.
fn frames_to_process(config: &PrepConfig) -> Vec<u32> {
    config
        .frames()
        .filter(|f| Some(*f) != config.ref_frame)
        .collect()
}

/// Phase 1: link every camera's image of every frame into the projects.
pub fn prepare_inputs(
    config: &PrepConfig,
    frames: &[u32],
    excluded: &[u32],
) -> Result<Vec<usize>> {
    let point_root = config.point_root();
    let folders = camera_folders(&config.image_root(), excluded)?;
    log::info!(
        "Start preparing colmap image input ({} cameras, {} frames)",
        folders.len(),
        frames.len()
    );
    frames
        .par_iter()
        .progress_count(frames.len() as u64)
        .map(|frame| prepare_frame_inputs(&folders, *frame, config.image_ext, &point_root))
        .collect()
}

/// Phase 2: write the database and manual model of every frame.
fn write_models(
    config: &PrepConfig,
    frames: &[u32],
    source: &CameraSource,
    point_root: &Path,
) -> Result<Vec<usize>> {
    log::info!("convert cam data to colmap db");
    match source {
        CameraSource::Metadata(split) => {
            let cameras = split
                .cameras()
                .camera_records(config.image_ext, config.intrinsics)?;
            frames
                .par_iter()
                .progress_count(frames.len() as u64)
                .map(|frame| write_frame_model(point_root, *frame, &cameras, config.intrinsics))
                .collect()
        }
        CameraSource::Reference(reference) => frames
            .par_iter()
            .progress_count(frames.len() as u64)
            .map(|frame| write_reference_frame_model(point_root, *frame, reference))
            .collect(),
    }
}

/// Phase 3: reconstruct frames one after another.
fn reconstruct(config: &PrepConfig, frames: &[u32], point_root: &Path) -> Result<()> {
    let runner = ColmapRunner::new(&config.colmap_bin);
    let pb = ProgressBar::new(frames.len() as u64);
    for frame in frames {
        log::info!("running colmap on frame {}", frame);
        runner.run_frame(point_root, *frame)?;
        pb.inc(1);
    }
    pb.finish();
    Ok(())
}

/// Runs all three phases for the configured frame range and writes the run
/// report into the point root.
pub fn run(config: &PrepConfig) -> Result<PrepReport> {
    config.validate()?;
    let point_root = config.point_root();
    let frames = frames_to_process(config);

    let split = load_metadata(config)?;
    let excluded = split
        .as_ref()
        .map(MetaSplit::excluded_camera_ids)
        .unwrap_or_default();
    let source = match (config.ref_frame, split) {
        (Some(ref_frame), _) => {
            log::info!("copying cameras from reference frame {}", ref_frame);
            CameraSource::Reference(ReferenceModel::load(&point_root, ref_frame, config.image_ext)?)
        }
        (None, Some(split)) => CameraSource::Metadata(split),
        (None, None) => {
            return Err(PrepError::PathDoesNotExist(config.base_dir.join(META_FILE)));
        }
    };

    let links = prepare_inputs(config, &frames, &excluded)?;
    let written = write_models(config, &frames, &source, &point_root)?;

    let reconstructed = !config.skip_colmap;
    if reconstructed {
        reconstruct(config, &frames, &point_root)?;
    } else {
        log::info!("skipping colmap");
    }

    let frame_reports = frames
        .iter()
        .zip(links.iter().zip(&written))
        .map(|(frame, (links_created, images_written))| FrameReport {
            frame: *frame,
            links_created: *links_created,
            images_written: *images_written,
            reconstructed,
        })
        .collect();
    let report = PrepReport::new(config, frame_reports);
    write_report(&point_root.join(REPORT_FILE), &report)?;
    Ok(report)
}
