#![allow(dead_code)]

use std::path::{Path, PathBuf};

use serde_json::json;

pub const W: u32 = 640;
pub const H: u32 = 480;

fn k_matrix(f: f64) -> serde_json::Value {
    json!([[f, 0.0, 320.0], [0.0, f + 1.0, 240.0], [0.0, 0.0, 1.0]])
}

/// w2c with a rotation of `angle` around z and translation (id, 0, 2).
fn w2c_matrix(id: u32, angle: f64) -> serde_json::Value {
    let (s, c) = angle.sin_cos();
    json!([
        [c, -s, 0.0, id as f64],
        [s, c, 0.0, 0.0],
        [0.0, 0.0, 1.0, 2.0],
        [0.0, 0.0, 0.0, 1.0]
    ])
}

/// Metadata json for the given cameras. Camera `i` has focal `500 + 10 i`.
pub fn meta_json(cam_ids: &[u32]) -> serde_json::Value {
    let ks: Vec<_> = (0..cam_ids.len()).map(|i| k_matrix(500.0 + 10.0 * i as f64)).collect();
    let w2cs: Vec<_> = cam_ids
        .iter()
        .enumerate()
        .map(|(i, id)| w2c_matrix(*id, 0.1 * i as f64))
        .collect();
    json!({
        "w": W,
        "h": H,
        "k": [ks],
        "w2c": [w2cs],
        "cam_id": [cam_ids],
        "fn": [["ignored"]],
    })
}

pub fn write_meta(base: &Path, file: &str, cam_ids: &[u32]) {
    std::fs::write(base.join(file), meta_json(cam_ids).to_string()).unwrap();
}

/// Creates `ims/<cam>/<frame:06>.png` for every camera and frame.
pub fn make_image_tree(base: &Path, cam_ids: &[u32], frames: std::ops::Range<u32>) -> PathBuf {
    let root = base.join("ims");
    for cam in cam_ids {
        let dir = root.join(cam.to_string());
        std::fs::create_dir_all(&dir).unwrap();
        for frame in frames.clone() {
            std::fs::write(dir.join(format!("{:06}.png", frame)), b"png").unwrap();
        }
    }
    root
}

pub struct BinCamera {
    pub id: u32,
    pub model: i32,
    pub width: u64,
    pub height: u64,
    pub params: Vec<f64>,
}

pub struct BinImage {
    pub id: u32,
    pub q: [f64; 4],
    pub t: [f64; 3],
    pub camera_id: u32,
    pub name: String,
    pub num_points2d: u64,
}

pub fn write_cameras_bin(path: &Path, cameras: &[BinCamera]) {
    let mut b = Vec::new();
    b.extend((cameras.len() as u64).to_le_bytes());
    for c in cameras {
        b.extend(c.id.to_le_bytes());
        b.extend(c.model.to_le_bytes());
        b.extend(c.width.to_le_bytes());
        b.extend(c.height.to_le_bytes());
        for p in &c.params {
            b.extend(p.to_le_bytes());
        }
    }
    std::fs::write(path, b).unwrap();
}

pub fn write_images_bin(path: &Path, images: &[BinImage]) {
    let mut b = Vec::new();
    b.extend((images.len() as u64).to_le_bytes());
    for img in images {
        b.extend(img.id.to_le_bytes());
        for q in img.q {
            b.extend(q.to_le_bytes());
        }
        for t in img.t {
            b.extend(t.to_le_bytes());
        }
        b.extend(img.camera_id.to_le_bytes());
        b.extend(img.name.as_bytes());
        b.push(0);
        b.extend(img.num_points2d.to_le_bytes());
        for i in 0..img.num_points2d {
            b.extend((i as f64).to_le_bytes());
            b.extend((i as f64 * 2.0).to_le_bytes());
            b.extend((-1i64).to_le_bytes());
        }
    }
    std::fs::write(path, b).unwrap();
}

/// A reconstructed reference frame with two PINHOLE cameras and undistorted
/// images `a.png`, `b.png`.
pub fn make_reference_frame(point_root: &Path, frame: u32) {
    let project = point_root.join(format!("colmap_{}", frame));
    let model = project.join("distorted").join("sparse").join("0");
    std::fs::create_dir_all(&model).unwrap();
    let images = project.join("images");
    std::fs::create_dir_all(&images).unwrap();
    for name in ["b.png", "a.png"] {
        std::fs::write(images.join(name), b"png").unwrap();
    }
    write_cameras_bin(
        &model.join("cameras.bin"),
        &[
            BinCamera { id: 7, model: 1, width: 640, height: 480, params: vec![500.0, 501.0, 320.0, 240.0] },
            BinCamera { id: 9, model: 1, width: 640, height: 480, params: vec![600.0, 601.0, 321.0, 241.0] },
        ],
    );
    write_images_bin(
        &model.join("images.bin"),
        &[
            BinImage {
                id: 3,
                q: [1.0, 0.0, 0.0, 0.0],
                t: [0.5, 0.0, 1.0],
                camera_id: 9,
                name: "b.png".to_string(),
                num_points2d: 2,
            },
            BinImage {
                id: 4,
                q: [0.0, 1.0, 0.0, 0.0],
                t: [0.0, 0.0, 1.0],
                camera_id: 7,
                name: "a.png".to_string(),
                num_points2d: 0,
            },
        ],
    );
}

/// An executable script standing in for colmap. It appends its arguments
/// to `log` and, for `image_undistorter`, creates `sparse/` and `images/`
/// in the output folder. Exits with `exit_code` on `fail_step`.
#[cfg(unix)]
pub fn fake_colmap(dir: &Path, log: &Path, fail_step: Option<&str>, exit_code: i32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let fail = fail_step.unwrap_or("none");
    let script = format!(
        r#"#!/bin/sh
echo "$@" >> "{log}"
if [ "$1" = "{fail}" ]; then
  exit {exit_code}
fi
if [ "$1" = "image_undistorter" ]; then
  out=""
  while [ $# -gt 0 ]; do
    if [ "$1" = "--output_path" ]; then out="$2"; fi
    shift
  done
  mkdir -p "$out/sparse" "$out/images"
  touch "$out/sparse/cameras.bin" "$out/sparse/images.bin" "$out/sparse/points3D.bin"
fi
exit 0
"#,
        log = log.display(),
    );
    let path = dir.join("fake-colmap");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
