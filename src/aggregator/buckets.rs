//! Rank-and-bucket heat level assignment.
//!
//! Given points ranked from hottest to coldest, the top `threshold`
//! fraction of them is split into up to five near-equal chunks which get
//! levels 5, 4, 3, 2, 1. Everything past that prefix stays at level 0.

use crate::index::DataPoint;
use crate::utils::config::MAX_HEAT_LEVEL;
use std::cmp::Ordering;

/// Ranking order: higher value first, ties broken by higher line first
///
/// Lines are unique inside a function window, so this is a total order
/// there. The global ranking relies on a stable sort for the remaining
/// ties.
pub fn hotter_first(a: &DataPoint, b: &DataPoint) -> Ordering {
    b.value.cmp(&a.value).then_with(|| b.line.cmp(&a.line))
}

/// Number of ranked points eligible for a non-zero level
///
/// Always at least 1 for a non-empty set, never more than `len`.
pub fn top_n(len: usize, threshold: f64) -> usize {
    if len == 0 {
        return 0;
    }
    let n = (len as f64 * threshold).floor() as usize;
    n.clamp(1, len)
}

/// Split `len` consecutive positions into `n` chunks of near-equal size
///
/// Uses a Bresenham-style accumulator so the remainder is spread across
/// the chunks instead of piling up at either end. `visit` gets
/// `(chunk_number, position)` for every position in order. When
/// `len < n` only `len` single-element chunks are produced.
pub fn for_each_chunk(len: usize, n: usize, mut visit: impl FnMut(usize, usize)) {
    if len == 0 || n == 0 {
        return;
    }

    let mut acc = 0;
    let mut pos = 0;
    let mut chunk = 0;
    for _ in 0..n {
        acc += len;
        let size = acc / n;
        if size == 0 {
            continue;
        }
        for _ in 0..size {
            visit(chunk, pos);
            pos += 1;
        }
        chunk += 1;
        acc -= size * n;
    }

    debug_assert_eq!(pos, len, "chunks must cover every position");
}

/// Assign heat levels to the hot prefix of a ranked sequence of `len` points
///
/// `visit` gets `(rank_position, level)` for each eligible position only;
/// positions it is not called for keep level 0.
pub fn for_each_level(len: usize, threshold: f64, mut visit: impl FnMut(usize, u8)) {
    let top = top_n(len, threshold);
    for_each_chunk(top, MAX_HEAT_LEVEL as usize, |chunk, pos| {
        visit(pos, MAX_HEAT_LEVEL - chunk as u8);
    });
}
