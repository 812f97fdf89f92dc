//! Convert Wannier90 real-space tight-binding models into HDF5.
//!
//! A `seedname_hr.dat` file stores the hopping amplitudes
//! $\bra{m0}\hat H\ket{nR}$ of a Wannier tight-binding model as
//! whitespace-delimited text: a header with the orbital and R-vector
//! counts, a block of per-R-vector degeneracy factors, and one record per
//! (R-vector, orbital pair). This crate parses that format into dense
//! arrays and writes them as named datasets in an HDF5 container, ready
//! for fast columnar access from downstream numerical codes.
//!
//! The usual entry points are [`HrModel::from_hr`] and
//! [`output::write_h5`]; the `hr2h5` binary wraps the two into a one-shot
//! command-line conversion.

pub mod error;
pub mod layout;
pub mod lines;
pub mod model;
pub mod output;
pub mod wannier90;

pub use error::{HrError, Result};
pub use layout::HoppingLayout;
pub use model::HrModel;
pub use output::{read_h5, write_h5};
