//! Edge signature extraction: per-image fingerprints for adjacency
//! scoring.
//!
//! This is the only component that touches pixels. Everything
//! downstream (the difference metric, the sequencer) operates on the
//! already-sampled [`EdgeSignature`] data, so an extraction pass reads
//! at most the two letterbox scan windows plus the two content rows of
//! each image.

use crate::blank;
use crate::diagnostics::DiagnosticSink;
use crate::sample::sample_row;
use crate::source::RowSource;
use crate::types::{EdgeSignature, EngineConfig};

/// Extract the edge fingerprint of one image.
///
/// Runs the letterbox scan on both edges, then samples the resulting
/// content rows. Degenerate geometry (zero width or height) produces a
/// signature with empty pixel vectors, zero row offsets, and no blank
/// flags; it still participates in sequencing.
#[must_use]
pub fn extract<S: RowSource>(source: &S, config: &EngineConfig) -> EdgeSignature {
    let width = source.width();
    let height = source.height();

    if width == 0 || height == 0 {
        return EdgeSignature {
            top_pixels: Vec::new(),
            bottom_pixels: Vec::new(),
            top_row: 0,
            bottom_row: 0,
            blank_top: false,
            blank_bottom: false,
        };
    }

    let top_row = blank::find_content_top(source, config);
    let bottom_row = blank::find_content_bottom(source, config);

    EdgeSignature {
        top_pixels: sample_row(&source.row_rgba(top_row), config.sample_stride),
        bottom_pixels: sample_row(&source.row_rgba(bottom_row), config.sample_stride),
        top_row,
        bottom_row,
        blank_top: top_row > 0,
        blank_bottom: bottom_row + 1 < height,
    }
}

/// Extract fingerprints for every image, preserving input order.
pub fn extract_all<S: RowSource>(
    sources: &[S],
    config: &EngineConfig,
    sink: &dyn DiagnosticSink,
) -> Vec<EdgeSignature> {
    sources
        .iter()
        .enumerate()
        .map(|(index, source)| {
            let signature = extract(source, config);
            sink.record(&format!(
                "image {index}: {}x{} content rows {}..={} blank_top={} blank_bottom={}",
                source.width(),
                source.height(),
                signature.top_row,
                signature.bottom_row,
                signature.blank_top,
                signature.blank_bottom,
            ));
            signature
        })
        .collect()
}
