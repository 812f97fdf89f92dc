//! Reader for the Wannier90 `seedname_hr.dat` format.
//!
//! The file is line-oriented and whitespace-delimited:
//!
//! ```text
//! <comment line>
//! <num_wann>
//! <nrvecs>
//! <degeneracy factors, at most 15 per line>
//! <records>: n1 n2 n3 alpha beta reH imH
//! ```
//!
//! Records are grouped by R-vector, `(n1, n2, n3)` repeated verbatim for
//! every orbital pair of one lattice vector before the next begins. Each
//! amplitude is divided by the degeneracy factor of its R-vector.

use crate::error::{HrError, Result};
use crate::layout::HoppingLayout;
use crate::lines::LineCursor;
use crate::model::HrModel;
use ndarray::{Array1, Array2};
use num_complex::Complex;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// The degeneracy block packs at most this many integers per line.
pub const DEGENERACY_PER_LINE: usize = 15;

impl HrModel {
    /// Read a tight-binding model from an hr.dat file.
    pub fn from_hr<P: AsRef<Path>>(path: P) -> Result<HrModel> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| HrError::OpenInput {
            path: path.display().to_string(),
            source,
        })?;
        parse_hr(BufReader::new(file))
    }
}

/// Parse hr.dat content from any buffered reader.
pub fn parse_hr<R: BufRead>(reader: R) -> Result<HrModel> {
    let mut cursor = LineCursor::new(reader);

    // Comment line, discarded.
    cursor.next_line()?.ok_or_else(|| HrError::Parse {
        line: 1,
        message: "empty input, expected a comment line".to_string(),
    })?;

    let num_wann = read_header_scalar(&mut cursor, "num_wann")?;
    let nrvecs = read_header_scalar(&mut cursor, "nrvecs")?;

    let degeneracy = read_degeneracy(&mut cursor, nrvecs)?;

    build_matrix(&mut cursor, num_wann, nrvecs, &degeneracy)
}

/// Read one header line and parse its leading token as a positive integer.
/// Trailing content on the line is ignored.
fn read_header_scalar<R: BufRead>(cursor: &mut LineCursor<R>, name: &str) -> Result<usize> {
    let line = cursor.next_line()?.ok_or_else(|| HrError::Parse {
        line: cursor.line_no() + 1,
        message: format!("unexpected end of input while reading {name}"),
    })?;
    let token = line.split_whitespace().next().ok_or_else(|| HrError::Parse {
        line: cursor.line_no(),
        message: format!("expected an integer for {name}, found a blank line"),
    })?;
    let value = token.parse::<i64>().map_err(|e| HrError::Parse {
        line: cursor.line_no(),
        message: format!("failed to parse {name} from '{token}': {e}"),
    })?;
    if value <= 0 {
        return Err(HrError::Parse {
            line: cursor.line_no(),
            message: format!("{name} must be positive, got {value}"),
        });
    }
    Ok(value as usize)
}

/// Collect `nrvecs` degeneracy factors from the fixed-width block.
///
/// Exactly `(nrvecs / 15) + 1` lines are consumed. When `nrvecs` is an
/// exact multiple of 15 the block itself spans only `nrvecs / 15` lines;
/// the extra consumed line is the first hopping record, which is dropped.
fn read_degeneracy<R: BufRead>(cursor: &mut LineCursor<R>, nrvecs: usize) -> Result<Vec<usize>> {
    let num_lines = (nrvecs / DEGENERACY_PER_LINE) + 1;
    let mut factors: Vec<usize> = Vec::with_capacity(nrvecs);

    for _ in 0..num_lines {
        let line = cursor.next_line()?.ok_or_else(|| HrError::Parse {
            line: cursor.line_no() + 1,
            message: "unexpected end of input in the degeneracy block".to_string(),
        })?;
        if factors.len() == nrvecs {
            continue;
        }
        for token in line.split_whitespace() {
            if factors.len() == nrvecs {
                break;
            }
            let value = token.parse::<i64>().map_err(|e| HrError::Parse {
                line: cursor.line_no(),
                message: format!("failed to parse degeneracy factor '{token}': {e}"),
            })?;
            if value <= 0 {
                return Err(HrError::InvalidDegeneracy {
                    r_index: factors.len(),
                    value,
                });
            }
            factors.push(value as usize);
        }
    }

    if factors.len() < nrvecs {
        return Err(HrError::Parse {
            line: cursor.line_no(),
            message: format!(
                "degeneracy block ended after {} of {} factors",
                factors.len(),
                nrvecs
            ),
        });
    }
    Ok(factors)
}

/// One hopping record: lattice triple, zero-based orbital pair, amplitude.
struct HrRecord {
    rvec: [f64; 3],
    alpha: usize,
    beta: usize,
    amp: Complex<f64>,
}

fn parse_record(line: &str, line_no: usize, num_wann: usize) -> Result<HrRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 7 {
        return Err(HrError::Parse {
            line: line_no,
            message: format!("expected 7 fields in hopping record, found {}", fields.len()),
        });
    }

    let mut rvec = [0.0f64; 3];
    for (slot, token) in rvec.iter_mut().zip(&fields[..3]) {
        *slot = token.parse::<f64>().map_err(|e| HrError::Parse {
            line: line_no,
            message: format!("failed to parse R-vector component '{token}': {e}"),
        })?;
    }

    let alpha = parse_orbital(fields[3], line_no, num_wann)?;
    let beta = parse_orbital(fields[4], line_no, num_wann)?;

    let re = parse_amplitude(fields[5], line_no)?;
    let im = parse_amplitude(fields[6], line_no)?;

    Ok(HrRecord {
        rvec,
        alpha,
        beta,
        amp: Complex::new(re, im),
    })
}

/// 1-based orbital field, validated against `num_wann`, returned zero-based.
fn parse_orbital(token: &str, line_no: usize, num_wann: usize) -> Result<usize> {
    let value = token.parse::<i64>().map_err(|e| HrError::Parse {
        line: line_no,
        message: format!("failed to parse orbital index '{token}': {e}"),
    })?;
    if value < 1 || value > num_wann as i64 {
        return Err(HrError::OrbitalOutOfRange {
            orbital: value,
            num_wann,
            line: line_no,
        });
    }
    Ok((value - 1) as usize)
}

fn parse_amplitude(token: &str, line_no: usize) -> Result<f64> {
    token.parse::<f64>().map_err(|e| HrError::Parse {
        line: line_no,
        message: format!("failed to parse hopping amplitude '{token}': {e}"),
    })
}

/// Scatter the remaining records into the flat hopping buffers.
///
/// R-vectors are detected run-length style: the index advances whenever a
/// record's triple differs from the previously stored one. A triple that
/// matches an already-closed run means the grouping invariant is broken
/// and the addressing would be wrong, so it is rejected. Duplicate
/// `(r, alpha, beta)` slots within a run overwrite (last write wins).
fn build_matrix<R: BufRead>(
    cursor: &mut LineCursor<R>,
    num_wann: usize,
    nrvecs: usize,
    degeneracy: &[usize],
) -> Result<HrModel> {
    let layout = HoppingLayout::new(num_wann, nrvecs)?;
    let mut re_h = Array1::<f64>::zeros(layout.len());
    let mut im_h = Array1::<f64>::zeros(layout.len());
    let mut rvecs = Array2::<f64>::zeros((nrvecs, 3));

    let mut closed: HashSet<[u64; 3]> = HashSet::new();
    let mut current: Option<[f64; 3]> = None;
    let mut r_index = 0usize;

    while let Some(line) = cursor.next_line()? {
        if line.trim().is_empty() {
            continue;
        }
        let record = parse_record(&line, cursor.line_no(), num_wann)?;

        match current {
            None => {
                for (i, v) in record.rvec.iter().enumerate() {
                    rvecs[[0, i]] = *v;
                }
                current = Some(record.rvec);
            }
            Some(prev) if prev != record.rvec => {
                closed.insert(rvec_key(&prev));
                if closed.contains(&rvec_key(&record.rvec)) {
                    return Err(HrError::NonContiguousRVector {
                        rvec: record.rvec,
                        line: cursor.line_no(),
                    });
                }
                r_index += 1;
                if r_index >= nrvecs {
                    return Err(HrError::RVectorCount {
                        expected: nrvecs,
                        found: r_index + 1,
                    });
                }
                for (i, v) in record.rvec.iter().enumerate() {
                    rvecs[[r_index, i]] = *v;
                }
                current = Some(record.rvec);
            }
            Some(_) => {}
        }

        let hop = record.amp / (degeneracy[r_index] as f64);
        let slot = layout.index(r_index, record.alpha, record.beta);
        re_h[slot] = hop.re;
        im_h[slot] = hop.im;
    }

    let found = if current.is_some() { r_index + 1 } else { 0 };
    if found != nrvecs {
        return Err(HrError::RVectorCount {
            expected: nrvecs,
            found,
        });
    }

    Ok(HrModel {
        num_wann,
        nrvecs,
        rvecs,
        re_h,
        im_h,
    })
}

// Runs are compared with f64 equality, where -0.0 == 0.0; normalize so the
// hash key agrees with the comparison.
fn rvec_key(rvec: &[f64; 3]) -> [u64; 3] {
    fn canon(v: f64) -> u64 {
        let v = if v == 0.0 { 0.0 } else { v };
        v.to_bits()
    }
    [canon(rvec[0]), canon(rvec[1]), canon(rvec[2])]
}
