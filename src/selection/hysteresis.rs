//! Hysteresis edge linking using flood fill.
//!
//! Grows a strict ("clean") edge mask into a permissive ("noisy") one: noisy
//! pixels survive only when an 8-connected chain of noisy pixels links them
//! to a clean pixel.

use std::collections::VecDeque;

use ndarray::{Array2, ArrayView2};

use crate::error::{HysteriaError, HysteriaResult};

const NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Join a clean and a noisy edge mask.
///
/// # Arguments
/// * `clean` - Strict mask; every non-zero pixel seeds a fill
/// * `noisy` - Permissive mask the fill may travel through
///
/// # Returns
/// Mask holding the noisy value at every retained pixel (the clean value
/// where noisy is 0) and 0 elsewhere
pub fn hysteresis(clean: ArrayView2<u16>, noisy: ArrayView2<u16>) -> HysteriaResult<Array2<u16>> {
    if clean.dim() != noisy.dim() {
        return Err(HysteriaError::DimensionMismatch {
            expected: (clean.ncols(), clean.nrows()),
            actual: (noisy.ncols(), noisy.nrows()),
        });
    }

    let (height, width) = clean.dim();
    let mut out = Array2::<u16>::zeros((height, width));
    let mut visited = vec![false; width * height];
    let mut queue = VecDeque::new();

    for y in 0..height {
        for x in 0..width {
            if clean[[y, x]] == 0 || visited[y * width + x] {
                continue;
            }

            visited[y * width + x] = true;
            out[[y, x]] = retained_value(clean[[y, x]], noisy[[y, x]]);
            queue.push_back((x, y));

            while let Some((cx, cy)) = queue.pop_front() {
                for (dx, dy) in NEIGHBORS {
                    let nx = cx as isize + dx;
                    let ny = cy as isize + dy;
                    if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                        continue;
                    }

                    let (nx, ny) = (nx as usize, ny as usize);
                    let nidx = ny * width + nx;
                    if visited[nidx] {
                        continue;
                    }

                    let n = noisy[[ny, nx]];
                    let c = clean[[ny, nx]];
                    if n > 0 || c > 0 {
                        visited[nidx] = true;
                        out[[ny, nx]] = retained_value(c, n);
                        queue.push_back((nx, ny));
                    }
                }
            }
        }
    }

    Ok(out)
}

#[inline]
fn retained_value(clean: u16, noisy: u16) -> u16 {
    if noisy > 0 {
        noisy
    } else {
        clean
    }
}
