use nalgebra as na;

use crate::config::ImageExt;

/// Converts a rotation matrix to a COLMAP quaternion `(qw, qx, qy, qz)`.
///
/// Takes the eigenvector of the largest eigenvalue of the symmetric 4x4
/// matrix built from `r` (Bar-Itzhack), so slightly non-orthonormal input
/// still yields the closest unit quaternion. The sign is fixed to `qw >= 0`.
pub fn rotmat_to_qvec(r: &na::Matrix3<f64>) -> [f64; 4] {
    let (rxx, ryx, rzx) = (r[(0, 0)], r[(0, 1)], r[(0, 2)]);
    let (rxy, ryy, rzy) = (r[(1, 0)], r[(1, 1)], r[(1, 2)]);
    let (rxz, ryz, rzz) = (r[(2, 0)], r[(2, 1)], r[(2, 2)]);

    // rows/cols ordered x, y, z, w
    let k = na::Matrix4::new(
        rxx - ryy - rzz,
        ryx + rxy,
        rzx + rxz,
        ryz - rzy,
        ryx + rxy,
        ryy - rxx - rzz,
        rzy + ryz,
        rzx - rxz,
        rzx + rxz,
        rzy + ryz,
        rzz - rxx - ryy,
        rxy - ryx,
        ryz - rzy,
        rzx - rxz,
        rxy - ryx,
        rxx + ryy + rzz,
    ) / 3.0;

    let eigen = k.symmetric_eigen();
    let best = eigen.eigenvalues.imax();
    let v = eigen.eigenvectors.column(best);
    let mut qvec = [v[3], v[0], v[1], v[2]];
    if qvec[0] < 0.0 {
        qvec.iter_mut().for_each(|x| *x = -*x);
    }
    // no "-0" in the text model
    qvec.map(|x| if x == 0.0 { 0.0 } else { x })
}

/// Decoded frames are stored as `<frame padded to 6 digits>.<ext>`.
pub fn frame_image_name(frame: u32, ext: ImageExt) -> String {
    format!("{:06}.{}", frame, ext)
}

/// Camera folders are named after the camera.
pub fn camera_image_name(camera: &str, ext: ImageExt) -> String {
    format!("{}.{}", camera, ext)
}
