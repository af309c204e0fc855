use std::path::Path;

use rusqlite::{Connection, params};

use crate::error::{PrepError, Result};
use crate::types::{CameraModelId, ColmapCamera, ColmapImage};

pub const MAX_IMAGE_ID: u32 = i32::MAX as u32;

const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS cameras (
    camera_id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    model INTEGER NOT NULL,
    width INTEGER NOT NULL,
    height INTEGER NOT NULL,
    params BLOB,
    prior_focal_length INTEGER NOT NULL);
CREATE TABLE IF NOT EXISTS images (
    image_id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    name TEXT NOT NULL UNIQUE,
    camera_id INTEGER NOT NULL,
    prior_qw REAL,
    prior_qx REAL,
    prior_qy REAL,
    prior_qz REAL,
    prior_tx REAL,
    prior_ty REAL,
    prior_tz REAL,
    CONSTRAINT image_id_check CHECK(image_id >= 0 and image_id < 2147483647),
    FOREIGN KEY(camera_id) REFERENCES cameras(camera_id));
CREATE TABLE IF NOT EXISTS keypoints (
    image_id INTEGER PRIMARY KEY NOT NULL,
    rows INTEGER NOT NULL,
    cols INTEGER NOT NULL,
    data BLOB,
    FOREIGN KEY(image_id) REFERENCES images(image_id) ON DELETE CASCADE);
CREATE TABLE IF NOT EXISTS descriptors (
    image_id INTEGER PRIMARY KEY NOT NULL,
    rows INTEGER NOT NULL,
    cols INTEGER NOT NULL,
    data BLOB,
    FOREIGN KEY(image_id) REFERENCES images(image_id) ON DELETE CASCADE);
CREATE TABLE IF NOT EXISTS matches (
    pair_id INTEGER PRIMARY KEY NOT NULL,
    rows INTEGER NOT NULL,
    cols INTEGER NOT NULL,
    data BLOB);
CREATE TABLE IF NOT EXISTS two_view_geometries (
    pair_id INTEGER PRIMARY KEY NOT NULL,
    rows INTEGER NOT NULL,
    cols INTEGER NOT NULL,
    data BLOB,
    config INTEGER NOT NULL,
    F BLOB,
    E BLOB,
    H BLOB,
    qvec BLOB,
    tvec BLOB);
CREATE UNIQUE INDEX IF NOT EXISTS index_name ON images(name);
";

fn params_to_blob(params: &[f64]) -> Vec<u8> {
    params.iter().flat_map(|p| p.to_le_bytes()).collect()
}

fn blob_to_params(blob: &[u8]) -> Vec<f64> {
    blob.chunks_exact(8)
        .map(|c| {
            let mut b = [0u8; 8];
            b.copy_from_slice(c);
            f64::from_le_bytes(b)
        })
        .collect()
}

/// COLMAP SQLite database seeded with known cameras and image priors.
pub struct ColmapDatabase {
    conn: Connection,
}

impl ColmapDatabase {
    /// Creates a fresh database at `path`, replacing any existing file.
    pub fn create(path: &Path) -> Result<ColmapDatabase> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        let db = ColmapDatabase {
            conn: Connection::open(path)?,
        };
        db.create_tables()?;
        Ok(db)
    }

    pub fn open(path: &Path) -> Result<ColmapDatabase> {
        if !path.exists() {
            return Err(PrepError::PathDoesNotExist(path.to_path_buf()));
        }
        Ok(ColmapDatabase {
            conn: Connection::open(path)?,
        })
    }

    pub fn create_tables(&self) -> Result<()> {
        self.conn.execute_batch(CREATE_TABLES)?;
        Ok(())
    }

    pub fn begin(&self) -> Result<()> {
        self.conn.execute_batch("BEGIN;")?;
        Ok(())
    }

    pub fn commit(&self) -> Result<()> {
        self.conn.execute_batch("COMMIT;")?;
        Ok(())
    }

    /// Inserts a camera and returns the id the database assigned to it.
    pub fn add_camera(
        &self,
        model: CameraModelId,
        width: u64,
        height: u64,
        params: &[f64],
        prior_focal_length: bool,
    ) -> Result<u32> {
        self.conn.execute(
            "INSERT INTO cameras VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                Option::<i64>::None,
                model as i32,
                width as i64,
                height as i64,
                params_to_blob(params),
                prior_focal_length,
            ],
        )?;
        Ok(self.conn.last_insert_rowid() as u32)
    }

    /// Inserts an image with its pose prior. `image_id` of `None` lets the
    /// database pick one.
    pub fn add_image(
        &self,
        name: &str,
        camera_id: u32,
        prior_q: [f64; 4],
        prior_t: [f64; 3],
        image_id: Option<u32>,
    ) -> Result<u32> {
        if let Some(id) = image_id {
            if id >= MAX_IMAGE_ID {
                return Err(PrepError::InvalidArgument(format!("image id {} out of range", id)));
            }
        }
        self.conn.execute(
            "INSERT INTO images VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                image_id,
                name,
                camera_id,
                prior_q[0],
                prior_q[1],
                prior_q[2],
                prior_q[3],
                prior_t[0],
                prior_t[1],
                prior_t[2],
            ],
        )?;
        Ok(self.conn.last_insert_rowid() as u32)
    }

    pub fn read_cameras(&self) -> Result<Vec<ColmapCamera>> {
        let mut stmt = self
            .conn
            .prepare("SELECT camera_id, model, width, height, params FROM cameras ORDER BY camera_id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, u32>(0)?,
                row.get::<_, i32>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, Vec<u8>>(4)?,
            ))
        })?;
        let cameras = rows
            .map(|row| -> Result<ColmapCamera> {
                let (camera_id, model, width, height, blob) = row?;
                let model = CameraModelId::from_i32(model).ok_or_else(|| {
                    PrepError::InvalidArgument(format!("unknown camera model {}", model))
                })?;
                Ok(ColmapCamera {
                    camera_id,
                    model,
                    width: width as u64,
                    height: height as u64,
                    params: blob_to_params(&blob),
                })
            })
            .collect();
        cameras
    }

    pub fn read_images(&self) -> Result<Vec<ColmapImage>> {
        let mut stmt = self.conn.prepare(
            "SELECT image_id, name, camera_id, prior_qw, prior_qx, prior_qy, prior_qz, \
             prior_tx, prior_ty, prior_tz FROM images ORDER BY image_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ColmapImage {
                image_id: row.get(0)?,
                name: row.get(1)?,
                camera_id: row.get(2)?,
                q: [row.get(3)?, row.get(4)?, row.get(5)?, row.get(6)?],
                t: [row.get(7)?, row.get(8)?, row.get(9)?],
            })
        })?;
        let images = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(images)
    }
}
