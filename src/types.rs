use nalgebra as na;
use serde::{Deserialize, Serialize};

/// COLMAP camera model ids, as stored in `cameras.bin` and the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraModelId {
    SimplePinhole = 0,
    Pinhole = 1,
    SimpleRadial = 2,
    Radial = 3,
    OpenCV = 4,
    OpenCVFisheye = 5,
    FullOpenCV = 6,
    Fov = 7,
    SimpleRadialFisheye = 8,
    RadialFisheye = 9,
    ThinPrismFisheye = 10,
}

impl CameraModelId {
    pub fn from_i32(id: i32) -> Option<CameraModelId> {
        use CameraModelId::*;
        Some(match id {
            0 => SimplePinhole,
            1 => Pinhole,
            2 => SimpleRadial,
            3 => Radial,
            4 => OpenCV,
            5 => OpenCVFisheye,
            6 => FullOpenCV,
            7 => Fov,
            8 => SimpleRadialFisheye,
            9 => RadialFisheye,
            10 => ThinPrismFisheye,
            _ => return None,
        })
    }

    /// Name used in `cameras.txt`.
    pub fn name(&self) -> &'static str {
        use CameraModelId::*;
        match self {
            SimplePinhole => "SIMPLE_PINHOLE",
            Pinhole => "PINHOLE",
            SimpleRadial => "SIMPLE_RADIAL",
            Radial => "RADIAL",
            OpenCV => "OPENCV",
            OpenCVFisheye => "OPENCV_FISHEYE",
            FullOpenCV => "FULL_OPENCV",
            Fov => "FOV",
            SimpleRadialFisheye => "SIMPLE_RADIAL_FISHEYE",
            RadialFisheye => "RADIAL_FISHEYE",
            ThinPrismFisheye => "THIN_PRISM_FISHEYE",
        }
    }

    pub fn num_params(&self) -> usize {
        use CameraModelId::*;
        match self {
            SimplePinhole => 3,
            Pinhole => 4,
            SimpleRadial => 4,
            Radial => 5,
            OpenCV => 8,
            OpenCVFisheye => 8,
            FullOpenCV => 12,
            Fov => 5,
            SimpleRadialFisheye => 4,
            RadialFisheye => 5,
            ThinPrismFisheye => 12,
        }
    }
}

/// A camera of the rig with its pinhole intrinsics and world-to-camera pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraRecord {
    pub id: u32,
    /// Name of the image inside the frame's `input/` folder.
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
    /// qw, qx, qy, qz
    pub q: [f64; 4],
    pub t: [f64; 3],
}

impl CameraRecord {
    pub fn pinhole_params(&self) -> [f64; 4] {
        [self.fx, self.fy, self.cx, self.cy]
    }

    pub fn na_rotation(&self) -> na::UnitQuaternion<f64> {
        na::UnitQuaternion::from_quaternion(na::Quaternion::new(
            self.q[0], self.q[1], self.q[2], self.q[3],
        ))
    }

    pub fn na_translation(&self) -> na::Vector3<f64> {
        na::Vector3::from_row_slice(&self.t)
    }
}

/// One camera line of a COLMAP model.
#[derive(Debug, Clone, PartialEq)]
pub struct ColmapCamera {
    pub camera_id: u32,
    pub model: CameraModelId,
    pub width: u64,
    pub height: u64,
    pub params: Vec<f64>,
}

/// One registered image of a COLMAP model, without its 2D observations.
#[derive(Debug, Clone, PartialEq)]
pub struct ColmapImage {
    pub image_id: u32,
    /// qw, qx, qy, qz
    pub q: [f64; 4],
    pub t: [f64; 3],
    pub camera_id: u32,
    pub name: String,
}
