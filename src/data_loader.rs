use std::path::{Path, PathBuf};

use glob::{Pattern, glob};

use crate::config::{ImageExt, frame_project_dir};
use crate::error::{PrepError, Result};
use crate::util::{camera_image_name, frame_image_name};

fn dir_filter(rp: glob::GlobResult) -> Option<PathBuf> {
    match rp {
        Ok(p) if p.is_dir() => Some(p),
        _ => None,
    }
}

/// Lists the per camera folders under `image_root`, sorted by name.
///
/// Folders named after one of `excluded` are left out.
pub fn camera_folders(image_root: &Path, excluded: &[u32]) -> Result<Vec<PathBuf>> {
    if !image_root.is_dir() {
        return Err(PrepError::PathDoesNotExist(image_root.to_path_buf()));
    }
    let pattern = format!("{}/*", Pattern::escape(&image_root.to_string_lossy()));
    let paths = glob(&pattern)
        .map_err(|e| PrepError::InvalidArgument(format!("bad image root: {}", e)))?;
    let excluded: Vec<String> = excluded.iter().map(|id| id.to_string()).collect();
    let mut folders: Vec<PathBuf> = paths
        .filter_map(dir_filter)
        .filter(|p| {
            let name = p.file_name().map(|n| n.to_string_lossy().into_owned());
            !name.is_some_and(|n| excluded.contains(&n))
        })
        .collect();
    folders.sort();
    Ok(folders)
}

#[cfg(unix)]
fn symlink(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
fn symlink(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

/// Links the image of `frame` from every camera folder into
/// `<point_root>/colmap_<frame>/input/<camera>.<ext>`.
///
/// Existing entries, dangling links included, are kept as they are. Cameras
/// without an image for this frame are skipped. Returns the number of links
/// created.
pub fn prepare_frame_inputs(
    camera_folders: &[PathBuf],
    frame: u32,
    ext: ImageExt,
    point_root: &Path,
) -> Result<usize> {
    let save_dir = frame_project_dir(point_root, frame).join("input");
    std::fs::create_dir_all(&save_dir)?;

    let mut created = 0;
    for folder in camera_folders {
        let Some(camera) = folder.file_name() else {
            continue;
        };
        let image_path = folder.join(frame_image_name(frame, ext));
        let image_save_path = save_dir.join(camera_image_name(&camera.to_string_lossy(), ext));

        if image_save_path.symlink_metadata().is_ok() {
            log::trace!("{} exists, skipping", image_save_path.display());
            continue;
        }
        if !image_path.exists() {
            log::warn!("missing {}", image_path.display());
            continue;
        }
        let target = std::fs::canonicalize(&image_path)?;
        symlink(&target, &image_save_path)?;
        log::debug!("{} -> {}", image_save_path.display(), target.display());
        created += 1;
    }
    Ok(created)
}
