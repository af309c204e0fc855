use std::io::Write;
use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::config::PrepConfig;
use crate::error::{PrepError, Result};

/// Serializes an object to a JSON file.
pub fn object_to_json<T: Serialize>(output_path: &Path, object: &T) -> Result<()> {
    let j = serde_json::to_string_pretty(object)?;
    let mut file = std::fs::File::create(output_path)?;
    file.write_all(j.as_bytes())?;
    Ok(())
}

/// Deserializes an object from a JSON file.
pub fn object_from_json<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    if !file_path.exists() {
        return Err(PrepError::PathDoesNotExist(file_path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(file_path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Per frame outcome recorded in the run report.
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct FrameReport {
    pub frame: u32,
    pub links_created: usize,
    pub images_written: usize,
    pub reconstructed: bool,
}

/// Summary of one run, written next to the `colmap_*` projects.
#[derive(Debug, Serialize, serde::Deserialize)]
pub struct PrepReport {
    pub timestamp: String,
    pub config: PrepConfig,
    pub frames: Vec<FrameReport>,
}

impl PrepReport {
    pub fn new(config: &PrepConfig, frames: Vec<FrameReport>) -> PrepReport {
        PrepReport {
            timestamp: local_timestamp(),
            config: config.clone(),
            frames,
        }
    }
}

/// RFC 3339 time of now, in local time when the offset can be determined.
fn local_timestamp() -> String {
    let now = time::OffsetDateTime::now_local().unwrap_or_else(|_| time::OffsetDateTime::now_utc());
    now.format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

pub fn write_report(output_path: &Path, report: &PrepReport) -> Result<()> {
    log::info!("writing run report to {}", output_path.display());
    object_to_json(output_path, report)
}
