use colmap_frame_prep::colmap::text::images_txt;
use colmap_frame_prep::config::{ImageExt, IntrinsicsMode};
use colmap_frame_prep::metadata::CaptureMeta;
use colmap_frame_prep::types::ColmapImage;
use colmap_frame_prep::util::rotmat_to_qvec;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use nalgebra as na;

fn rig_meta(num_cams: usize) -> CaptureMeta {
    let k = [[500.0, 0.0, 320.0], [0.0, 500.0, 240.0], [0.0, 0.0, 1.0]];
    let w2c: Vec<[[f64; 4]; 4]> = (0..num_cams)
        .map(|i| {
            let r = na::Rotation3::from_euler_angles(0.0, 0.1 * i as f64, 0.0);
            let m = r.matrix();
            [
                [m[(0, 0)], m[(0, 1)], m[(0, 2)], i as f64],
                [m[(1, 0)], m[(1, 1)], m[(1, 2)], 0.0],
                [m[(2, 0)], m[(2, 1)], m[(2, 2)], 4.0],
                [0.0, 0.0, 0.0, 1.0],
            ]
        })
        .collect();
    CaptureMeta {
        w: 640,
        h: 480,
        k: vec![vec![k; num_cams]],
        w2c: vec![w2c],
        cam_id: vec![(0..num_cams as u32).collect()],
    }
}

fn bench_rotmat_to_qvec(c: &mut Criterion) {
    let axis = na::Unit::new_normalize(na::Vector3::new(1.0, 1.0, 0.5));
    let r = na::Rotation3::from_axis_angle(&axis, 0.2);

    c.bench_function("rotmat_to_qvec", |b| {
        b.iter(|| rotmat_to_qvec(black_box(r.matrix())))
    });
}

fn bench_camera_records(c: &mut Criterion) {
    let meta = rig_meta(64);

    c.bench_function("camera_records_64", |b| {
        b.iter(|| meta.camera_records(ImageExt::Png, IntrinsicsMode::Shared))
    });
}

fn bench_images_txt(c: &mut Criterion) {
    let records = rig_meta(64)
        .camera_records(ImageExt::Png, IntrinsicsMode::Shared)
        .unwrap();
    let images: Vec<_> = records
        .iter()
        .map(|r| ColmapImage {
            image_id: r.id,
            q: r.q,
            t: r.t,
            camera_id: 1,
            name: r.filename.clone(),
        })
        .collect();

    c.bench_function("images_txt_64", |b| b.iter(|| images_txt(black_box(&images))));
}

criterion_group!(benches, bench_rotmat_to_qvec, bench_camera_records, bench_images_txt);
criterion_main!(benches);
