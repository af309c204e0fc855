//! Capture metadata produced upstream of the reconstruction.
//!
//! Every array is indexed `[time][camera]`. The rig is static so only the
//! first time step is read.

use std::path::Path;

use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::config::{ImageExt, IntrinsicsMode};
use crate::error::{PrepError, Result};
use crate::io::object_from_json;
use crate::types::CameraRecord;
use crate::util::{camera_image_name, rotmat_to_qvec};

pub const META_FILE: &str = "meta.json";
pub const TRAIN_META_FILE: &str = "train_meta.json";
pub const TEST_META_FILE: &str = "test_meta.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureMeta {
    pub w: u32,
    pub h: u32,
    pub k: Vec<Vec<[[f64; 3]; 3]>>,
    pub w2c: Vec<Vec<[[f64; 4]; 4]>>,
    pub cam_id: Vec<Vec<u32>>,
}

impl CaptureMeta {
    pub fn from_json(path: &Path) -> Result<CaptureMeta> {
        let meta: CaptureMeta = object_from_json(path)?;
        meta.check()?;
        Ok(meta)
    }

    fn check(&self) -> Result<()> {
        let (Some(ids), Some(ks), Some(w2cs)) =
            (self.cam_id.first(), self.k.first(), self.w2c.first())
        else {
            return Err(PrepError::Metadata("no time step".to_string()));
        };
        if ids.is_empty() {
            return Err(PrepError::Metadata("no camera".to_string()));
        }
        if ids.len() != w2cs.len() {
            return Err(PrepError::Metadata(format!(
                "{} camera ids but {} w2c matrices",
                ids.len(),
                w2cs.len()
            )));
        }
        if ks.len() != ids.len() {
            return Err(PrepError::Metadata(format!(
                "{} camera ids but {} intrinsic matrices",
                ids.len(),
                ks.len()
            )));
        }
        Ok(())
    }

    /// Camera ids of the first time step.
    pub fn camera_ids(&self) -> &[u32] {
        self.cam_id.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// Builds one record per camera of the first time step.
    ///
    /// With [`IntrinsicsMode::Shared`] every record carries the first camera's
    /// intrinsics.
    pub fn camera_records(&self, ext: ImageExt, mode: IntrinsicsMode) -> Result<Vec<CameraRecord>> {
        self.check()?;
        let ks = &self.k[0];
        self.cam_id[0]
            .iter()
            .zip(&self.w2c[0])
            .enumerate()
            .map(|(i, (id, w2c))| {
                let k = match mode {
                    IntrinsicsMode::Shared => &ks[0],
                    IntrinsicsMode::PerCamera => &ks[i],
                };
                let m = na::Matrix4::from_fn(|r, c| w2c[r][c]);
                let rot: na::Matrix3<f64> = m.fixed_view::<3, 3>(0, 0).into_owned();
                Ok(CameraRecord {
                    id: *id,
                    filename: camera_image_name(&id.to_string(), ext),
                    width: self.w,
                    height: self.h,
                    fx: k[0][0],
                    fy: k[1][1],
                    cx: k[0][2],
                    cy: k[1][2],
                    q: rotmat_to_qvec(&rot),
                    t: [m[(0, 3)], m[(1, 3)], m[(2, 3)]],
                })
            })
            .collect()
    }
}

/// Metadata of a capture, either for all cameras or split into train and test.
#[derive(Debug, Clone)]
pub enum MetaSplit {
    All(CaptureMeta),
    TrainTest { train: CaptureMeta, test: CaptureMeta },
}

impl MetaSplit {
    /// Whether `base_dir` carries either `train_meta.json` or `meta.json`.
    pub fn is_present(base_dir: &Path) -> bool {
        base_dir.join(TRAIN_META_FILE).exists() || base_dir.join(META_FILE).exists()
    }

    /// Prefers `train_meta.json` + `test_meta.json`, falls back to `meta.json`.
    pub fn load(base_dir: &Path) -> Result<MetaSplit> {
        let train_path = base_dir.join(TRAIN_META_FILE);
        if train_path.exists() {
            log::info!("using train/test split from {}", base_dir.display());
            let train = CaptureMeta::from_json(&train_path)?;
            let test = CaptureMeta::from_json(&base_dir.join(TEST_META_FILE))?;
            return Ok(MetaSplit::TrainTest { train, test });
        }
        let meta_path = base_dir.join(META_FILE);
        if meta_path.exists() {
            return Ok(MetaSplit::All(CaptureMeta::from_json(&meta_path)?));
        }
        Err(PrepError::PathDoesNotExist(meta_path))
    }

    /// Cameras that go into the COLMAP model.
    pub fn cameras(&self) -> &CaptureMeta {
        match self {
            MetaSplit::All(meta) => meta,
            MetaSplit::TrainTest { train, .. } => train,
        }
    }

    /// Cameras held out of the reconstruction inputs.
    pub fn excluded_camera_ids(&self) -> Vec<u32> {
        match self {
            MetaSplit::All(_) => Vec::new(),
            MetaSplit::TrainTest { test, .. } => test.camera_ids().to_vec(),
        }
    }
}
