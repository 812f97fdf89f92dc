use crate::error::Result;
use crate::layout::HoppingLayout;
use ndarray::{Array1, Array2};

/// A real-space tight-binding model read from a Wannier90 hr.dat file.
///
/// `re_h` and `im_h` are the real and imaginary parts of the hopping
/// amplitudes, already divided by the per-R-vector degeneracy factor and
/// stored flat in the slot order of [`HoppingLayout`]. `rvecs` holds one
/// lattice triple `(n1, n2, n3)` per row, in first-encounter order.
#[derive(Debug, Clone)]
pub struct HrModel {
    /// Number of Wannier orbitals (the matrix dimension).
    pub num_wann: usize,
    /// Number of real-space lattice vectors.
    pub nrvecs: usize,
    /// Lattice vectors, shape `(nrvecs, 3)`.
    pub rvecs: Array2<f64>,
    /// Real part of the hopping amplitudes, length `num_wann² * nrvecs`.
    pub re_h: Array1<f64>,
    /// Imaginary part of the hopping amplitudes, same length as `re_h`.
    pub im_h: Array1<f64>,
}

impl HrModel {
    /// The addressing scheme of the flat hopping buffers.
    pub fn layout(&self) -> Result<HoppingLayout> {
        HoppingLayout::new(self.num_wann, self.nrvecs)
    }

    /// In-memory footprint of the two hopping buffers, in bytes.
    pub fn hopping_bytes(&self) -> usize {
        (self.re_h.len() + self.im_h.len()) * std::mem::size_of::<f64>()
    }
}
