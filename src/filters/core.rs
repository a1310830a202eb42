//! Core utilities shared by the 3x3 plane filters.
//!
//! This module provides:
//! - Mirror border addressing
//! - 3x3 neighbourhood gathering
//! - Row-parallel plane construction

use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;

/// Reflect an out-of-range coordinate back into `0..len`.
///
/// Mirrors about the edge sample without repeating it (`-1 -> 1`,
/// `len -> len - 2`). A length-1 axis reflects onto itself.
#[inline]
pub fn mirror(pos: isize, len: usize) -> usize {
    let last = len as isize - 1;
    if last <= 0 {
        return 0;
    }
    if pos < 0 {
        (-pos).min(last) as usize
    } else if pos > last {
        (2 * last - pos).max(0) as usize
    } else {
        pos as usize
    }
}

/// Gather the 3x3 neighbourhood of `(y, x)` in row-major order.
///
/// Index 4 is the centre; out-of-range taps are mirrored.
#[inline]
pub fn neighborhood(input: &ArrayView2<u16>, y: usize, x: usize) -> [u16; 9] {
    let (height, width) = input.dim();
    let rows = [
        mirror(y as isize - 1, height),
        y,
        mirror(y as isize + 1, height),
    ];
    let cols = [
        mirror(x as isize - 1, width),
        x,
        mirror(x as isize + 1, width),
    ];

    let mut taps = [0u16; 9];
    for (ky, &sy) in rows.iter().enumerate() {
        for (kx, &sx) in cols.iter().enumerate() {
            taps[ky * 3 + kx] = input[[sy, sx]];
        }
    }
    taps
}

/// Build a plane of `input`'s shape by evaluating `f(y, x)` per sample.
///
/// Rows are filled in parallel with Rayon.
pub fn map_plane<F>(input: &ArrayView2<u16>, f: F) -> Array2<u16>
where
    F: Fn(usize, usize) -> u16 + Sync,
{
    let (height, width) = input.dim();
    let mut flat = vec![0u16; height * width];
    if width > 0 {
        flat.par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, out) in row.iter_mut().enumerate() {
                    *out = f(y, x);
                }
            });
    }

    // Shape always matches the buffer length
    Array2::from_shape_vec((height, width), flat).unwrap_or_else(|_| Array2::zeros((height, width)))
}

/// Apply a 3x3 neighbourhood operator to every sample.
pub fn map_neighborhood<F>(input: ArrayView2<u16>, f: F) -> Array2<u16>
where
    F: Fn(&[u16; 9]) -> u16 + Sync,
{
    map_plane(&input, |y, x| f(&neighborhood(&input, y, x)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_reflects_without_repeat() {
        assert_eq!(mirror(-1, 5), 1);
        assert_eq!(mirror(0, 5), 0);
        assert_eq!(mirror(4, 5), 4);
        assert_eq!(mirror(5, 5), 3);
    }

    #[test]
    fn test_mirror_single_sample() {
        assert_eq!(mirror(-1, 1), 0);
        assert_eq!(mirror(1, 1), 0);
    }

    #[test]
    fn test_neighborhood_corner() {
        let input = Array2::from_shape_vec((2, 2), vec![1u16, 2, 3, 4]).unwrap();
        let taps = neighborhood(&input.view(), 0, 0);
        // Row -1 mirrors to row 1, column -1 to column 1
        assert_eq!(taps, [4, 3, 4, 2, 1, 2, 4, 3, 4]);
    }

    #[test]
    fn test_map_plane_preserves_shape() {
        let input = Array2::<u16>::zeros((3, 5));
        let out = map_plane(&input.view(), |y, x| (y * 10 + x) as u16);
        assert_eq!(out.dim(), (3, 5));
        assert_eq!(out[[2, 4]], 24);
    }
}
