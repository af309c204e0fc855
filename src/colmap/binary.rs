//! Readers for COLMAP's little-endian `cameras.bin` and `images.bin`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::{PrepError, Result};
use crate::types::{CameraModelId, ColmapCamera, ColmapImage};

struct BinReader<R: Read> {
    inner: R,
    path: PathBuf,
}

impl<R: Read> BinReader<R> {
    fn invalid(&self, reason: impl Into<String>) -> PrepError {
        PrepError::BinaryModel {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => self.invalid("unexpected end of file"),
            _ => PrepError::Io(e),
        })?;
        Ok(buf)
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.bytes()?))
    }

    fn i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.bytes()?))
    }

    fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.bytes()?))
    }

    fn f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.bytes()?))
    }

    fn f64s<const N: usize>(&mut self) -> Result<[f64; N]> {
        let mut out = [0.0; N];
        for v in out.iter_mut() {
            *v = self.f64()?;
        }
        Ok(out)
    }

    fn c_string(&mut self) -> Result<String> {
        let mut bytes = Vec::new();
        loop {
            let [b] = self.bytes::<1>()?;
            if b == 0 {
                break;
            }
            bytes.push(b);
        }
        String::from_utf8(bytes).map_err(|_| self.invalid("image name is not utf-8"))
    }
}

fn open(path: &Path) -> Result<BinReader<BufReader<File>>> {
    if !path.exists() {
        return Err(PrepError::PathDoesNotExist(path.to_path_buf()));
    }
    Ok(BinReader {
        inner: BufReader::new(File::open(path)?),
        path: path.to_path_buf(),
    })
}

/// Reads `cameras.bin`, keyed by camera id.
pub fn read_cameras_bin(path: &Path) -> Result<HashMap<u32, ColmapCamera>> {
    let mut reader = open(path)?;
    let num_cameras = reader.u64()?;
    let mut cameras = HashMap::new();
    for _ in 0..num_cameras {
        let camera_id = reader.u32()?;
        let model_id = reader.i32()?;
        let model = CameraModelId::from_i32(model_id)
            .ok_or_else(|| reader.invalid(format!("unknown camera model {}", model_id)))?;
        let width = reader.u64()?;
        let height = reader.u64()?;
        let params = (0..model.num_params())
            .map(|_| reader.f64())
            .collect::<Result<Vec<_>>>()?;
        cameras.insert(
            camera_id,
            ColmapCamera {
                camera_id,
                model,
                width,
                height,
                params,
            },
        );
    }
    log::trace!("read {} cameras from {}", cameras.len(), path.display());
    Ok(cameras)
}

/// Reads `images.bin`, keyed by image id. 2D observations are skipped.
pub fn read_images_bin(path: &Path) -> Result<HashMap<u32, ColmapImage>> {
    let mut reader = open(path)?;
    let num_images = reader.u64()?;
    let mut images = HashMap::new();
    for _ in 0..num_images {
        let image_id = reader.u32()?;
        let q = reader.f64s::<4>()?;
        let t = reader.f64s::<3>()?;
        let camera_id = reader.u32()?;
        let name = reader.c_string()?;
        let num_points2d = reader.u64()?;
        // x: f64, y: f64, point3d_id: i64
        for _ in 0..num_points2d {
            reader.bytes::<24>()?;
        }
        images.insert(
            image_id,
            ColmapImage {
                image_id,
                q,
                t,
                camera_id,
                name,
            },
        );
    }
    log::trace!("read {} images from {}", images.len(), path.display());
    Ok(images)
}
