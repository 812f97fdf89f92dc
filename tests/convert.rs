//! End-to-end conversion: hr.dat text → model → HDF5 container → model.

use hr2h5::{HrModel, read_h5, write_h5};
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(tag: &str, ext: &str) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir()
        .join(format!("hr2h5_it_{tag}_{now}.{ext}"))
        .display()
        .to_string()
}

const TWO_ORBITAL_HR: &str = "\
written on 24Apr2024 by wannier90
2
1
1
0 0 0 1 1 1.0 0.0
0 0 0 1 2 0.0 0.5
0 0 0 2 1 0.0 -0.5
0 0 0 2 2 1.0 0.0
";

#[test]
fn converts_hr_file_to_container_and_back() {
    let hr_file = temp_path("scenario", "dat");
    let h5_file = temp_path("scenario", "h5");
    fs::write(&hr_file, TWO_ORBITAL_HR).unwrap();

    let model = HrModel::from_hr(&hr_file).unwrap();
    write_h5(&model, &h5_file).unwrap();
    let back = read_h5(&h5_file).unwrap();

    fs::remove_file(&hr_file).unwrap();
    fs::remove_file(&h5_file).unwrap();

    assert_eq!(back.num_wann, 2);
    assert_eq!(back.nrvecs, 1);
    assert_eq!(back.re_h.as_slice().unwrap(), &[1.0, 0.0, 0.0, 1.0]);
    assert_eq!(back.im_h.as_slice().unwrap(), &[0.0, 0.5, -0.5, 0.0]);
    assert_eq!(back.rvecs.as_slice().unwrap(), &[0.0, 0.0, 0.0]);
}

#[test]
fn conversion_is_idempotent_at_dataset_level() {
    let hr_file = temp_path("idem", "dat");
    let h5_first = temp_path("idem_a", "h5");
    let h5_second = temp_path("idem_b", "h5");
    fs::write(&hr_file, TWO_ORBITAL_HR).unwrap();

    let model = HrModel::from_hr(&hr_file).unwrap();
    write_h5(&model, &h5_first).unwrap();
    let model_again = HrModel::from_hr(&hr_file).unwrap();
    write_h5(&model_again, &h5_second).unwrap();

    let a = read_h5(&h5_first).unwrap();
    let b = read_h5(&h5_second).unwrap();

    fs::remove_file(&hr_file).unwrap();
    fs::remove_file(&h5_first).unwrap();
    fs::remove_file(&h5_second).unwrap();

    assert_eq!(a.num_wann, b.num_wann);
    assert_eq!(a.nrvecs, b.nrvecs);
    for (x, y) in a.re_h.iter().zip(b.re_h.iter()) {
        assert_eq!(x.to_bits(), y.to_bits());
    }
    for (x, y) in a.im_h.iter().zip(b.im_h.iter()) {
        assert_eq!(x.to_bits(), y.to_bits());
    }
    for (x, y) in a.rvecs.iter().zip(b.rvecs.iter()) {
        assert_eq!(x.to_bits(), y.to_bits());
    }
}

#[test]
fn missing_input_file_is_an_error() {
    let missing = temp_path("missing", "dat");
    let result = HrModel::from_hr(&missing);
    assert!(matches!(result, Err(hr2h5::HrError::OpenInput { .. })));
}
