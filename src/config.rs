use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// Image extensions accepted for the decoded frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageExt {
    Png,
    Jpeg,
    Jpg,
}

impl ImageExt {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageExt::Png => "png",
            ImageExt::Jpeg => "jpeg",
            ImageExt::Jpg => "jpg",
        }
    }
}

impl std::fmt::Display for ImageExt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ImageExt {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "png" => Ok(ImageExt::Png),
            "jpeg" => Ok(ImageExt::Jpeg),
            "jpg" => Ok(ImageExt::Jpg),
            _ => Err(PrepError::InvalidArgument("wrong extension".to_string())),
        }
    }
}

/// How intrinsics from the metadata are mapped onto COLMAP cameras.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntrinsicsMode {
    /// One PINHOLE camera for the whole rig, taken from the first camera.
    #[default]
    Shared,
    /// One PINHOLE camera per metadata record.
    PerCamera,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepConfig {
    pub image_ext: ImageExt,
    pub base_dir: PathBuf,
    pub start_frame: u32,
    /// Exclusive.
    pub end_frame: u32,
    pub ref_frame: Option<u32>,
    pub colmap_bin: PathBuf,
    pub intrinsics: IntrinsicsMode,
    pub skip_colmap: bool,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            image_ext: ImageExt::Png,
            base_dir: PathBuf::from("/workspace/input_data/rotation"),
            start_frame: 1,
            end_frame: 49,
            ref_frame: None,
            colmap_bin: PathBuf::from("colmap"),
            intrinsics: IntrinsicsMode::Shared,
            skip_colmap: false,
        }
    }
}

impl PrepConfig {
    /// Checks the frame range and the base directory. Touches nothing on disk.
    pub fn validate(&self) -> Result<()> {
        if self.start_frame >= self.end_frame {
            return Err(PrepError::InvalidArgument(
                "start frame must smaller than end frame".to_string(),
            ));
        }
        if !self.base_dir.exists() {
            return Err(PrepError::PathDoesNotExist(self.base_dir.clone()));
        }
        Ok(())
    }

    pub fn frames(&self) -> std::ops::Range<u32> {
        self.start_frame..self.end_frame
    }

    /// Folder holding one sub folder of decoded frames per camera.
    pub fn image_root(&self) -> PathBuf {
        self.base_dir.join("ims")
    }

    /// Folder holding the `colmap_<frame>` projects.
    pub fn point_root(&self) -> PathBuf {
        self.base_dir.join("point")
    }
}

/// `<point_root>/colmap_<frame>`
pub fn frame_project_dir(point_root: &Path, frame: u32) -> PathBuf {
    point_root.join(format!("colmap_{}", frame))
}
