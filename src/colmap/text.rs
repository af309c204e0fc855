use std::path::Path;

use crate::error::Result;
use crate::types::{ColmapCamera, ColmapImage};

fn join<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders `cameras.txt`.
/// CAMERA_ID, MODEL, WIDTH, HEIGHT, PARAMS[0], PARAMS[1], ...
pub fn cameras_txt(cameras: &[ColmapCamera]) -> String {
    let mut s = String::new();
    s += "# Camera list with one line of data per camera:\n";
    s += "#   CAMERA_ID, MODEL, WIDTH, HEIGHT, PARAMS[]\n";
    s += format!("# Number of cameras: {}\n", cameras.len()).as_str();
    for cam in cameras {
        s += format!(
            "{} {} {} {} {}\n",
            cam.camera_id,
            cam.model.name(),
            cam.width,
            cam.height,
            join(&cam.params)
        )
        .as_str();
    }
    s
}

/// Renders `images.txt` with an empty observation line after every image.
/// IMAGE_ID, QW, QX, QY, QZ, TX, TY, TZ, CAMERA_ID, NAME
pub fn images_txt(images: &[ColmapImage]) -> String {
    let mut s = String::new();
    s += "# Image list with two lines of data per image:\n";
    s += "#   IMAGE_ID, QW, QX, QY, QZ, TX, TY, TZ, CAMERA_ID, NAME\n";
    s += "#   POINTS2D[] as (X, Y, POINT3D_ID)\n";
    s += format!(
        "# Number of images: {}, mean observations per image: 0\n",
        images.len()
    )
    .as_str();
    for img in images {
        s += format!(
            "{} {} {} {} {}\n\n",
            img.image_id,
            join(&img.q),
            join(&img.t),
            img.camera_id,
            img.name
        )
        .as_str();
    }
    s
}

/// Renders an empty `points3D.txt`.
pub fn points3d_txt() -> String {
    let mut s = String::new();
    s += "# 3D point list with one line of data per point:\n";
    s += "#   POINT3D_ID, X, Y, Z, R, G, B, ERROR, TRACK[] as (IMAGE_ID, POINT2D_IDX)\n";
    s += "# Number of points: 0, mean track length: 0\n";
    s
}

/// Writes `cameras.txt`, `images.txt` and an empty `points3D.txt` into `dir`.
pub fn write_text_model(dir: &Path, cameras: &[ColmapCamera], images: &[ColmapImage]) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    std::fs::write(dir.join("cameras.txt"), cameras_txt(cameras))?;
    std::fs::write(dir.join("images.txt"), images_txt(images))?;
    std::fs::write(dir.join("points3D.txt"), points3d_txt())?;
    Ok(())
}
