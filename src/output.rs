//! HDF5 container I/O.
//!
//! The container holds five datasets at the root, all created in one
//! shot from a finished [`HrModel`]:
//!
//! | name    | shape                    | type |
//! |---------|--------------------------|------|
//! | `reH`   | `num_wann² * nrvecs`     | f64  |
//! | `imH`   | `num_wann² * nrvecs`     | f64  |
//! | `rvecs` | `nrvecs * 3`             | f64  |
//! | `nw`    | scalar                   | i32  |
//! | `nr`    | scalar                   | i32  |

use hdf5_metno as hdf5;

use crate::error::{HrError, Result};
use crate::layout::HoppingLayout;
use crate::model::HrModel;
use ndarray::Array1;
use std::path::Path;

pub const DSET_RE_H: &str = "reH";
pub const DSET_IM_H: &str = "imH";
pub const DSET_RVECS: &str = "rvecs";
pub const DSET_NUM_WANN: &str = "nw";
pub const DSET_NRVECS: &str = "nr";

/// Write the model as five named datasets at the container root.
/// An existing file at `path` is truncated.
pub fn write_h5<P: AsRef<Path>>(model: &HrModel, path: P) -> Result<()> {
    let file = hdf5::File::create(path)?;

    file.new_dataset_builder()
        .with_data(model.re_h.view())
        .create(DSET_RE_H)?;
    file.new_dataset_builder()
        .with_data(model.im_h.view())
        .create(DSET_IM_H)?;

    // Lattice vectors are stored flat, row-major.
    let rvecs_flat: Array1<f64> = Array1::from_iter(model.rvecs.iter().copied());
    file.new_dataset_builder()
        .with_data(rvecs_flat.view())
        .create(DSET_RVECS)?;

    file.new_dataset::<i32>()
        .create(DSET_NUM_WANN)?
        .write_scalar(&(model.num_wann as i32))?;
    file.new_dataset::<i32>()
        .create(DSET_NRVECS)?
        .write_scalar(&(model.nrvecs as i32))?;

    Ok(())
}

/// Load a model back from a container produced by [`write_h5`].
///
/// The dataset lengths are checked against the stored scalars before the
/// arrays are accepted.
pub fn read_h5<P: AsRef<Path>>(path: P) -> Result<HrModel> {
    let file = hdf5::File::open(path)?;

    let num_wann = read_dim_scalar(&file, DSET_NUM_WANN)?;
    let nrvecs = read_dim_scalar(&file, DSET_NRVECS)?;
    let layout = HoppingLayout::new(num_wann, nrvecs)?;

    let re_h = file.dataset(DSET_RE_H)?.read_1d::<f64>()?;
    let im_h = file.dataset(DSET_IM_H)?.read_1d::<f64>()?;
    let rvecs_flat = file.dataset(DSET_RVECS)?.read_1d::<f64>()?;

    check_len(DSET_RE_H, layout.len(), re_h.len())?;
    check_len(DSET_IM_H, layout.len(), im_h.len())?;
    check_len(DSET_RVECS, nrvecs * 3, rvecs_flat.len())?;

    let rvecs = rvecs_flat
        .into_shape_with_order((nrvecs, 3))
        .map_err(|_| HrError::ContainerShape {
            dataset: DSET_RVECS,
            expected: nrvecs * 3,
            found: 0,
        })?;

    Ok(HrModel {
        num_wann,
        nrvecs,
        rvecs,
        re_h,
        im_h,
    })
}

fn read_dim_scalar(file: &hdf5::File, dataset: &'static str) -> Result<usize> {
    let value = file.dataset(dataset)?.read_scalar::<i32>()?;
    usize::try_from(value).map_err(|_| HrError::ContainerScalar {
        dataset,
        value: value as i64,
    })
}

fn check_len(dataset: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(HrError::ContainerShape {
            dataset,
            expected,
            found,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_h5(tag: &str) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir()
            .join(format!("hr2h5_{tag}_{now}.h5"))
            .display()
            .to_string()
    }

    fn sample_model() -> HrModel {
        HrModel {
            num_wann: 2,
            nrvecs: 2,
            rvecs: arr2(&[[0.0, 0.0, 0.0], [1.0, 0.0, -1.0]]),
            re_h: arr1(&[1.0, 0.25, -0.5, 1.0e-17, 3.5, 0.0, -2.0, 0.125]),
            im_h: arr1(&[0.0, 0.5, -0.5, 0.0, -1.0 / 3.0, 0.75, 0.0, 9.0]),
        }
    }

    #[test]
    fn roundtrip_preserves_floats_bit_for_bit() {
        let filename = temp_h5("roundtrip");
        let model = sample_model();
        write_h5(&model, &filename).unwrap();

        let back = read_h5(&filename).unwrap();
        fs::remove_file(&filename).unwrap();

        assert_eq!(back.num_wann, model.num_wann);
        assert_eq!(back.nrvecs, model.nrvecs);
        for (a, b) in model.re_h.iter().zip(back.re_h.iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
        for (a, b) in model.im_h.iter().zip(back.im_h.iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
        for (a, b) in model.rvecs.iter().zip(back.rvecs.iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn create_truncates_existing_container() {
        let filename = temp_h5("truncate");
        let model = sample_model();
        write_h5(&model, &filename).unwrap();
        write_h5(&model, &filename).unwrap();

        let back = read_h5(&filename).unwrap();
        fs::remove_file(&filename).unwrap();
        assert_eq!(back.re_h.len(), model.re_h.len());
    }

    #[test]
    fn create_fails_for_unwritable_path() {
        let model = sample_model();
        let result = write_h5(&model, "/nonexistent-dir/model.h5");
        assert!(matches!(result, Err(HrError::Hdf5(_))));
    }
}
