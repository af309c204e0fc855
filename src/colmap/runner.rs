use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::frame_project_dir;
use crate::error::{PrepError, Result};

/// One COLMAP sub command with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ColmapStep {
    pub name: &'static str,
    pub args: Vec<OsString>,
}

impl ColmapStep {
    fn new(name: &'static str) -> ColmapStep {
        ColmapStep {
            name,
            args: vec![name.into()],
        }
    }

    fn arg(mut self, key: &str, value: impl Into<OsString>) -> ColmapStep {
        self.args.push(key.into());
        self.args.push(value.into());
        self
    }

    fn flag(mut self, flag: &str) -> ColmapStep {
        self.args.push(flag.into());
        self
    }
}

/// Sub commands that triangulate the known poses of one frame project and
/// undistort its images.
pub fn colmap_steps(frame_dir: &Path) -> Vec<ColmapStep> {
    let db_file = frame_dir.join("input.db");
    let input_images = frame_dir.join("input");
    let distorted_model = frame_dir.join("distorted").join("sparse");
    let manual_model = frame_dir.join("manual");

    vec![
        ColmapStep::new("feature_extractor")
            .arg("--database_path", &db_file)
            .arg("--image_path", &input_images),
        ColmapStep::new("exhaustive_matcher").arg("--database_path", &db_file),
        ColmapStep::new("point_triangulator")
            .arg("--database_path", &db_file)
            .arg("--image_path", &input_images)
            .arg("--output_path", &distorted_model)
            .arg("--input_path", &manual_model)
            .flag("--Mapper.ba_global_function_tolerance=0.000001"),
        ColmapStep::new("image_undistorter")
            .arg("--image_path", &input_images)
            .arg("--input_path", &distorted_model)
            .arg("--output_path", frame_dir)
            .arg("--output_type", "COLMAP"),
    ]
}

/// Runs the external COLMAP executable on prepared frame projects.
#[derive(Debug, Clone)]
pub struct ColmapRunner {
    pub colmap_bin: PathBuf,
}

impl Default for ColmapRunner {
    fn default() -> Self {
        Self {
            colmap_bin: PathBuf::from("colmap"),
        }
    }
}

impl ColmapRunner {
    pub fn new(colmap_bin: impl Into<PathBuf>) -> ColmapRunner {
        ColmapRunner {
            colmap_bin: colmap_bin.into(),
        }
    }

    fn run_step(&self, step: &ColmapStep, frame: u32) -> Result<()> {
        log::debug!("{} {:?}", self.colmap_bin.display(), step.args);
        let status = Command::new(&self.colmap_bin).args(&step.args).status()?;
        if !status.success() {
            return Err(PrepError::ColmapFailed {
                step: step.name,
                frame,
                code: status.code(),
            });
        }
        Ok(())
    }

    /// Triangulates `<point_root>/colmap_<frame>`, then drops the linked input
    /// images and moves the undistorted model into `sparse/0`.
    pub fn run_frame(&self, point_root: &Path, frame: u32) -> Result<()> {
        let frame_dir = frame_project_dir(point_root, frame);
        if !frame_dir.is_dir() {
            return Err(PrepError::PathDoesNotExist(frame_dir));
        }
        std::fs::create_dir_all(frame_dir.join("tmp"))?;
        std::fs::create_dir_all(frame_dir.join("distorted").join("sparse"))?;

        for step in colmap_steps(&frame_dir) {
            self.run_step(&step, frame)?;
        }

        let input_images = frame_dir.join("input");
        if input_images.exists() {
            std::fs::remove_dir_all(&input_images)?;
        }
        move_sparse_into_zero(&frame_dir.join("sparse"))
    }
}

/// `image_undistorter` writes its model straight into `sparse/`; the
/// training code expects it under `sparse/0/`.
fn move_sparse_into_zero(sparse: &Path) -> Result<()> {
    if !sparse.is_dir() {
        return Err(PrepError::PathDoesNotExist(sparse.to_path_buf()));
    }
    let zero = sparse.join("0");
    std::fs::create_dir_all(&zero)?;
    for entry in std::fs::read_dir(sparse)? {
        let entry = entry?;
        if entry.file_name() == "0" {
            continue;
        }
        std::fs::rename(entry.path(), zero.join(entry.file_name()))?;
    }
    Ok(())
}
