use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glob::{Pattern, glob};

use super::binary::{read_cameras_bin, read_images_bin};
use super::database::ColmapDatabase;
use super::text::write_text_model;
use crate::config::{ImageExt, IntrinsicsMode, frame_project_dir};
use crate::error::{PrepError, Result};
use crate::types::{CameraModelId, CameraRecord, ColmapCamera, ColmapImage};

/// Writes `input.db` and the `manual/` text model of one frame from known
/// camera records. Returns the number of images written.
pub fn write_frame_model(
    point_root: &Path,
    frame: u32,
    cameras: &[CameraRecord],
    mode: IntrinsicsMode,
) -> Result<usize> {
    let project_folder = frame_project_dir(point_root, frame);
    let manual_folder = project_folder.join("manual");
    std::fs::create_dir_all(&manual_folder)?;

    let db = ColmapDatabase::create(&project_folder.join("input.db"))?;
    db.begin()?;

    let mut colmap_cameras = Vec::new();
    let mut colmap_images = Vec::new();
    let mut shared_camera_id = None;
    for cam in cameras {
        let camera_id = match (mode, shared_camera_id) {
            (IntrinsicsMode::Shared, Some(id)) => id,
            _ => {
                let params = cam.pinhole_params();
                let id = db.add_camera(
                    CameraModelId::Pinhole,
                    cam.width as u64,
                    cam.height as u64,
                    &params,
                    false,
                )?;
                colmap_cameras.push(ColmapCamera {
                    camera_id: id,
                    model: CameraModelId::Pinhole,
                    width: cam.width as u64,
                    height: cam.height as u64,
                    params: params.to_vec(),
                });
                shared_camera_id = Some(id);
                id
            }
        };
        db.add_image(&cam.filename, camera_id, cam.q, cam.t, Some(cam.id))?;
        colmap_images.push(ColmapImage {
            image_id: cam.id,
            q: cam.q,
            t: cam.t,
            camera_id,
            name: cam.filename.clone(),
        });
    }
    db.commit()?;

    write_text_model(&manual_folder, &colmap_cameras, &colmap_images)?;
    log::debug!(
        "frame {}: {} cameras, {} images",
        frame,
        colmap_cameras.len(),
        colmap_images.len()
    );
    Ok(colmap_images.len())
}

/// Cameras and poses reconstructed for a reference frame, in the order they
/// are copied to the other frames.
#[derive(Debug, Clone)]
pub struct ReferenceModel {
    pub cameras: Vec<ColmapCamera>,
    pub images: Vec<ColmapImage>,
}

impl ReferenceModel {
    /// Loads `colmap_<ref_frame>/distorted/sparse/0` and pairs it with the
    /// undistorted images of that frame, sorted by name.
    ///
    /// Image `i` gets image id and camera id `i + 1`.
    pub fn load(point_root: &Path, ref_frame: u32, ext: ImageExt) -> Result<ReferenceModel> {
        let ref_folder = frame_project_dir(point_root, ref_frame);
        let model_dir = ref_folder.join("distorted").join("sparse").join("0");
        let intrinsics = read_cameras_bin(&model_dir.join("cameras.bin"))?;
        let extrinsics = read_images_bin(&model_dir.join("images.bin"))?;
        let extrinsics_by_name: HashMap<&str, &ColmapImage> =
            extrinsics.values().map(|e| (e.name.as_str(), e)).collect();

        let image_dir = ref_folder.join("images");
        if !image_dir.is_dir() {
            return Err(PrepError::PathDoesNotExist(image_dir));
        }
        let pattern = format!("{}/*.{}", Pattern::escape(&image_dir.to_string_lossy()), ext);
        let mut image_paths: Vec<PathBuf> = glob(&pattern)
            .map_err(|e| PrepError::InvalidArgument(format!("bad reference folder: {}", e)))?
            .filter_map(|p| p.ok())
            .collect();
        image_paths.sort();

        let mut cameras = Vec::with_capacity(image_paths.len());
        let mut images = Vec::with_capacity(image_paths.len());
        for (i, path) in image_paths.iter().enumerate() {
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let extr = extrinsics_by_name
                .get(filename.as_str())
                .ok_or_else(|| PrepError::UnregisteredImage(filename.clone()))?;
            let intr = intrinsics.get(&extr.camera_id).ok_or_else(|| PrepError::BinaryModel {
                path: model_dir.join("cameras.bin"),
                reason: format!("camera {} referenced by {} is missing", extr.camera_id, filename),
            })?;
            let id = i as u32 + 1;
            cameras.push(ColmapCamera {
                camera_id: id,
                ..intr.clone()
            });
            images.push(ColmapImage {
                image_id: id,
                q: extr.q,
                t: extr.t,
                camera_id: id,
                name: filename,
            });
        }
        Ok(ReferenceModel { cameras, images })
    }
}

/// Writes `input.db` and the `manual/` text model of one frame from a
/// reference model. Returns the number of images written.
pub fn write_reference_frame_model(
    point_root: &Path,
    frame: u32,
    reference: &ReferenceModel,
) -> Result<usize> {
    let project_folder = frame_project_dir(point_root, frame);
    let manual_folder = project_folder.join("manual");
    std::fs::create_dir_all(&manual_folder)?;

    let db = ColmapDatabase::create(&project_folder.join("input.db"))?;
    db.begin()?;
    let mut db_camera_ids = HashMap::new();
    for cam in &reference.cameras {
        let db_id = db.add_camera(cam.model, cam.width, cam.height, &cam.params, false)?;
        db_camera_ids.insert(cam.camera_id, db_id);
    }
    for img in &reference.images {
        let camera_id = db_camera_ids.get(&img.camera_id).copied().ok_or_else(|| {
            PrepError::BinaryModel {
                path: project_folder.join("input.db"),
                reason: format!("image {} references unknown camera {}", img.name, img.camera_id),
            }
        })?;
        db.add_image(&img.name, camera_id, img.q, img.t, Some(img.image_id))?;
    }
    db.commit()?;

    write_text_model(&manual_folder, &reference.cameras, &reference.images)?;
    Ok(reference.images.len())
}
