//! src/error.rs
//! Centralized error type for the hr.dat → HDF5 conversion pipeline.
//! Every fallible operation in the crate returns the `Result` alias
//! defined here; nothing degrades to a zeroed or partial value.

use hdf5_metno as hdf5;
use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Error, Debug)]
pub enum HrError {
    // --- I/O Errors ---
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("unable to open input file '{path}': {source}")]
    OpenInput {
        path: String,
        source: std::io::Error,
    },

    // --- Text Parsing Errors ---
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    // --- Data Consistency Errors ---
    #[error("degeneracy factor {value} for R-vector {r_index} must be positive")]
    InvalidDegeneracy { r_index: usize, value: i64 },

    #[error("orbital index {orbital} at line {line} is outside [1, {num_wann}]")]
    OrbitalOutOfRange {
        orbital: i64,
        num_wann: usize,
        line: usize,
    },

    #[error(
        "R-vector {rvec:?} at line {line} repeats a block seen earlier; \
         records for one R-vector must be contiguous"
    )]
    NonContiguousRVector { rvec: [f64; 3], line: usize },

    #[error("input contains {found} distinct R-vector blocks, header declares {expected}")]
    RVectorCount { expected: usize, found: usize },

    #[error("model dimensions num_wann={num_wann}, nrvecs={nrvecs} overflow the flat buffer size")]
    ModelTooLarge { num_wann: usize, nrvecs: usize },

    // --- Output Container Errors ---
    #[error("HDF5 container error")]
    Hdf5(#[from] hdf5::Error),

    #[error("container scalar '{dataset}' has invalid value {value}")]
    ContainerScalar { dataset: &'static str, value: i64 },

    #[error("container dataset '{dataset}' has {found} elements, expected {expected}")]
    ContainerShape {
        dataset: &'static str,
        expected: usize,
        found: usize,
    },
}

/// A specialized `Result` type for this crate's operations.
pub type Result<T> = std::result::Result<T, HrError>;
