pub mod colmap;
pub mod config;
pub mod data_loader;
pub mod error;
pub mod io;
pub mod metadata;
pub mod pipeline;
pub mod types;
pub mod util;

pub use error::{PrepError, Result};
