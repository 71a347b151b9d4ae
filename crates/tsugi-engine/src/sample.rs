//! Row sampling: compress a pixel row into a short sequence of colors.
//!
//! A full row of RGBA bytes is far more data than adjacency scoring
//! needs. Taking every `stride`-th pixel (default: every 10th) keeps
//! fingerprints small while still spanning the whole row width.

use crate::types::Rgb;

/// Subsample one row of RGBA bytes at a fixed pixel stride.
///
/// Every `stride`-th pixel contributes one [`Rgb`] sample; alpha is
/// discarded. Trailing pixels that do not complete a full stride step
/// are dropped, never padded, so two rows of the same width always
/// produce the same sample count. An empty row yields an empty vector.
///
/// A `stride` of zero is a configuration error upstream; it is treated
/// as 1 here rather than looping forever.
#[must_use]
pub fn sample_row(row: &[u8], stride: usize) -> Vec<Rgb> {
    let step = 4 * stride.max(1);
    row.chunks_exact(step)
        .map(|chunk| Rgb::new(chunk[0], chunk[1], chunk[2]))
        .collect()
}
