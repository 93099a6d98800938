//! Floating-point counterparts of the [`crate::ints`] primitives, used
//! for per-entity `f64` attribute data (coordinates, nodal fields).

use crate::ints::Index;

/// Repeats row `i` of `a` (each row `width` wide) `offsets[i+1] -
/// offsets[i]` times.
pub fn expand(a: &[f64], width: usize, offsets: &[Index]) -> Vec<f64> {
    let n = offsets.len() - 1;
    let nout = offsets[n] as usize;
    let mut out = vec![0.0; nout * width];
    for i in 0..n {
        let first = offsets[i] as usize;
        let end = offsets[i + 1] as usize;
        let row = &a[i * width..(i + 1) * width];
        for j in first..end {
            out[j * width..(j + 1) * width].copy_from_slice(row);
        }
    }
    out
}

/// Keeps row `i` exactly when `offsets[i+1] == offsets[i] + 1`.
pub fn subset(a: &[f64], width: usize, offsets: &[Index]) -> Vec<f64> {
    let n = offsets.len() - 1;
    let nout = offsets[n] as usize;
    let mut out = vec![0.0; nout * width];
    for i in 0..n {
        if offsets[i + 1] == offsets[i] + 1 {
            let dst = offsets[i] as usize;
            out[dst * width..(dst + 1) * width].copy_from_slice(&a[i * width..(i + 1) * width]);
        }
    }
    out
}

/// Maximum element, or `f64::NEG_INFINITY` for an empty slice (unlike
/// [`crate::ints::max`], zero is not a valid floor for arbitrary reals).
pub fn max(a: &[f64]) -> f64 {
    a.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Minimum element, or `f64::INFINITY` for an empty slice. This is the
/// primitive the quality pipelines reduce cavities with.
pub fn min(a: &[f64]) -> f64 {
    a.iter().copied().fold(f64::INFINITY, f64::min)
}

pub fn sum(a: &[f64]) -> f64 {
    a.iter().sum()
}

/// Component-wise average of `width`-wide rows gathered from `a` at
/// `indices`, used to interpolate a nodal field at a new midpoint/
/// centroid vertex.
pub fn average_rows(a: &[f64], width: usize, indices: &[Index]) -> Vec<f64> {
    let mut out = vec![0.0; width];
    for &idx in indices {
        let row = &a[idx as usize * width..(idx as usize + 1) * width];
        for k in 0..width {
            out[k] += row[k];
        }
    }
    let n = indices.len() as f64;
    for v in &mut out {
        *v /= n;
    }
    out
}

#[cfg(test)]
#[path = "floats_test.rs"]
mod floats_test;
