use std::path::PathBuf;

/// Errors raised while preparing COLMAP projects.
#[derive(thiserror::Error, Debug)]
pub enum PrepError {
    /// Filesystem failure.
    #[error("Failed to manipulate the file. {0}")]
    Io(#[from] std::io::Error),

    /// Metadata or report (de)serialization failure.
    #[error("Invalid json. {0}")]
    Json(#[from] serde_json::Error),

    /// Failure while writing the COLMAP database.
    #[error("Database error. {0}")]
    Database(#[from] rusqlite::Error),

    /// A command line argument failed validation.
    #[error("{0}")]
    InvalidArgument(String),

    /// A file or directory the step depends on is missing.
    #[error("Path does not exist: {0}")]
    PathDoesNotExist(PathBuf),

    /// Metadata is readable json but does not describe a camera rig.
    #[error("Malformed metadata: {0}")]
    Metadata(String),

    /// Truncated or inconsistent COLMAP binary model.
    #[error("Invalid COLMAP binary model {path}: {reason}")]
    BinaryModel { path: PathBuf, reason: String },

    /// An image of the reference frame has no pose in its model.
    #[error("Image {0} is not registered in the reference model")]
    UnregisteredImage(String),

    /// A COLMAP step exited unsuccessfully.
    #[error("colmap {step} failed for frame {frame} (exit code {code:?})")]
    ColmapFailed {
        step: &'static str,
        frame: u32,
        code: Option<i32>,
    },
}

pub type Result<T> = std::result::Result<T, PrepError>;
