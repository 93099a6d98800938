//! Index-array primitives over `u32`, the element type used for every
//! entity id, offset and count in this crate.
//!
//! These mirror the `uints_*` family from the original C core
//! (`ints.c`): every function takes a full slice and produces a full
//! `Vec`, is internally a single flat loop, and has no short-circuiting
//! control flow, so that any of them could be swapped for a GPU-style
//! bulk kernel without changing observable behaviour.
//!
//! When the `rayon` feature is enabled, the per-element loops run on
//! the global thread pool; the sequential and parallel paths produce
//! identical output for every function here.

pub type Index = u32;

/// Exclusive prefix scan. `b[0] = 0`, `b[i] = a[0] + ... + a[i-1]`.
/// Output length is `n + 1`.
pub fn exscan(a: &[Index]) -> Vec<Index> {
    let mut out = Vec::with_capacity(a.len() + 1);
    let mut sum: Index = 0;
    out.push(0);
    for &v in a {
        sum += v;
        out.push(sum);
    }
    out
}

/// Inverse of [`exscan`]: `a[i] = b[i+1] - b[i]`. Output length is
/// `b.len() - 1`.
pub fn unscan(b: &[Index]) -> Vec<Index> {
    b.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Maps a "repeat-by" offsets array into an offsets array with one slot
/// for every input whose repeat count is zero:
/// `negate_offsets(b) = exscan(not unscan(b))`.
pub fn negate_offsets(b: &[Index]) -> Vec<Index> {
    let kept: Vec<Index> = unscan(b).into_iter().map(|v| (v == 0) as Index).collect();
    exscan(&kept)
}

/// Maximum element, or 0 for an empty slice.
#[cfg(not(feature = "rayon"))]
pub fn max(a: &[Index]) -> Index {
    a.iter().copied().fold(0, Index::max)
}

#[cfg(feature = "rayon")]
pub fn max(a: &[Index]) -> Index {
    use rayon::prelude::*;
    a.par_iter().copied().reduce(|| 0, Index::max)
}

/// Sum of all elements.
#[cfg(not(feature = "rayon"))]
pub fn sum(a: &[Index]) -> Index {
    a.iter().copied().sum()
}

#[cfg(feature = "rayon")]
pub fn sum(a: &[Index]) -> Index {
    use rayon::prelude::*;
    a.par_iter().copied().sum()
}

/// A constant-filled array of length `n`.
pub fn filled(n: usize, v: Index) -> Vec<Index> {
    vec![v; n]
}

/// Repeats row `i` of `a` (each row `width` wide) `offsets[i+1] -
/// offsets[i]` times. Output length is `offsets[n] * width`.
#[cfg(not(feature = "rayon"))]
pub fn expand(a: &[Index], width: usize, offsets: &[Index]) -> Vec<Index> {
    let n = offsets.len() - 1;
    let nout = offsets[n] as usize;
    let mut out = vec![0; nout * width];
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

#[cfg(feature = "rayon")]
pub fn expand(a: &[Index], width: usize, offsets: &[Index]) -> Vec<Index> {
    use rayon::prelude::*;
    let n = offsets.len() - 1;
    (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            let first = offsets[i] as usize;
            let end = offsets[i + 1] as usize;
            let row = &a[i * width..(i + 1) * width];
            (first..end).flat_map(move |_| row.iter().copied())
        })
        .collect()
}

/// Keeps row `i` exactly when `offsets[i+1] == offsets[i] + 1`. Output
/// length is `offsets[n] * width`.
#[cfg(not(feature = "rayon"))]
pub fn subset(a: &[Index], width: usize, offsets: &[Index]) -> Vec<Index> {
    let n = offsets.len() - 1;
    let nout = offsets[n] as usize;
    let mut out = vec![0; nout * width];
    for i in 0..n {
        if offsets[i + 1] == offsets[i] + 1 {
            let dst = offsets[i] as usize;
            out[dst * width..(dst + 1) * width].copy_from_slice(&a[i * width..(i + 1) * width]);
        }
    }
    out
}

#[cfg(feature = "rayon")]
pub fn subset(a: &[Index], width: usize, offsets: &[Index]) -> Vec<Index> {
    use rayon::prelude::*;
    let n = offsets.len() - 1;
    let rows: Vec<&[Index]> = (0..n)
        .into_par_iter()
        .filter_map(|i| {
            if offsets[i + 1] == offsets[i] + 1 {
                Some(&a[i * width..(i + 1) * width])
            } else {
                None
            }
        })
        .collect();
    rows.into_iter().flatten().copied().collect()
}

/// Reorders rows of `a` (each `width` wide) so that row `i` of the input
/// lands at row `out_of_in[i]` of the output.
#[cfg(not(feature = "rayon"))]
pub fn shuffle(a: &[Index], width: usize, out_of_in: &[Index]) -> Vec<Index> {
    let n = out_of_in.len();
    let mut out = vec![0; n * width];
    for i in 0..n {
        let j = out_of_in[i] as usize;
        out[j * width..(j + 1) * width].copy_from_slice(&a[i * width..(i + 1) * width]);
    }
    out
}

#[cfg(feature = "rayon")]
pub fn shuffle(a: &[Index], width: usize, out_of_in: &[Index]) -> Vec<Index> {
    use rayon::prelude::*;
    let n = out_of_in.len();
    let placed: Vec<(usize, &[Index])> = (0..n)
        .into_par_iter()
        .map(|i| (out_of_in[i] as usize, &a[i * width..(i + 1) * width]))
        .collect();
    let mut out = vec![0; n * width];
    for (j, row) in placed {
        out[j * width..(j + 1) * width].copy_from_slice(row);
    }
    out
}

/// A simple linear sequence `0, 1, ..., n-1`, used as the identity
/// offsets array of an unfiltered "one slot per source" map.
pub fn linear(n: usize) -> Vec<Index> {
    (0..n as Index).collect()
}

#[cfg(test)]
#[path = "ints_test.rs"]
mod ints_test;
