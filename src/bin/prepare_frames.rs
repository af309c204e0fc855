use std::path::PathBuf;

use clap::Parser;
use colmap_frame_prep::config::{ImageExt, IntrinsicsMode, PrepConfig};
use colmap_frame_prep::pipeline;

/// Prepares one COLMAP project per frame of a multi-view capture and
/// triangulates it from the known camera poses.
///
/// 1. links the (training) images of each frame into `point/colmap_<frame>/input`
/// 2. writes the static cameras into each frame's database and manual model
/// 3. runs colmap for each frame
#[derive(Parser)]
#[command(version, about, author)]
struct PrepCli {
    /// extension of the decoded frames
    #[arg(long, value_enum, default_value = "png")]
    imageext: ImageExt,

    /// capture root holding `ims/` and the metadata json
    #[arg(long, default_value = "/workspace/input_data/rotation")]
    basedir: PathBuf,

    /// first frame, frames are numbered from 1
    #[arg(long, default_value_t = 1)]
    startframe: u32,

    /// frame after the last one
    #[arg(long, default_value_t = 49)]
    endframe: u32,

    /// copy cameras from this frame's reconstruction instead of the metadata
    #[arg(long)]
    refframe: Option<u32>,

    /// colmap executable
    #[arg(long, default_value = "colmap")]
    colmap: PathBuf,

    /// one camera per metadata entry instead of one shared camera
    #[arg(long)]
    per_camera_intrinsics: bool,

    /// only prepare the projects
    #[arg(long)]
    skip_colmap: bool,
}

impl From<PrepCli> for PrepConfig {
    fn from(cli: PrepCli) -> Self {
        PrepConfig {
            image_ext: cli.imageext,
            base_dir: cli.basedir,
            start_frame: cli.startframe,
            end_frame: cli.endframe,
            ref_frame: cli.refframe,
            colmap_bin: cli.colmap,
            intrinsics: if cli.per_camera_intrinsics {
                IntrinsicsMode::PerCamera
            } else {
                IntrinsicsMode::Shared
            },
            skip_colmap: cli.skip_colmap,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config: PrepConfig = PrepCli::parse().into();

    if let Err(e) = config.validate() {
        println!("{}", e);
        std::process::exit(1);
    }

    match pipeline::run(&config) {
        Ok(report) => {
            let reconstructed = report.frames.iter().filter(|f| f.reconstructed).count();
            log::info!(
                "prepared {} frames, reconstructed {}",
                report.frames.len(),
                reconstructed
            );
        }
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}
