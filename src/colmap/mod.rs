pub mod binary;
pub mod database;
pub mod model;
pub mod runner;
pub mod text;

pub use database::ColmapDatabase;
pub use model::*;
pub use runner::ColmapRunner;
