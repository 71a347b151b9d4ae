//! The ordering decision procedure.
//!
//! Classification first: an image with a blank top edge but a solid
//! bottom edge is a candidate for the topmost position, its mirror a
//! candidate for the last, and an image blank on both edges carries no
//! adjacency signal at all ("floating"). When a first/last anchor pair
//! exists the interior is placed between them, searching interior
//! permutations only where more than one arrangement is possible.
//! Without a usable anchor pair, every permutation of the non-floating
//! images is scored exhaustively. Floating images are always appended
//! at the end in their original relative order.
//!
//! Every tie-break is fixed, so identical fingerprints always produce
//! identical output.

use crate::diagnostics::{DecisionPath, DiagnosticSink, SequenceReport};
use crate::metric;
use crate::types::{EdgeSignature, EngineConfig, EngineError, Order};

/// Decide the stacking order for a set of edge fingerprints.
///
/// Returns a [`SequenceReport`] whose `order` is always a permutation
/// of `0..signatures.len()`.
///
/// # Errors
///
/// Returns [`EngineError::TooManySearchImages`] when a permutation
/// search would have to cover more images than
/// [`EngineConfig::max_search_images`] allows.
pub fn sequence(
    signatures: &[EdgeSignature],
    config: &EngineConfig,
    sink: &dyn DiagnosticSink,
) -> Result<SequenceReport, EngineError> {
    let classes = signatures.iter().map(EdgeSignature::classify).collect();

    let floating: Vec<usize> = signatures
        .iter()
        .enumerate()
        .filter(|(_, s)| s.blank_top && s.blank_bottom)
        .map(|(i, _)| i)
        .collect();
    let non_floating: Vec<usize> = (0..signatures.len())
        .filter(|i| !floating.contains(i))
        .collect();

    // Anchor candidates, deliberately retaining the LAST qualifying
    // index for each role. Preferring the first match instead would
    // change the output for inputs with competing candidates.
    let (first_anchor, last_anchor) = signatures.iter().enumerate().fold(
        (None, None),
        |(first, last), (i, s)| {
            (
                if s.blank_top && !s.blank_bottom {
                    Some(i)
                } else {
                    first
                },
                if !s.blank_top && s.blank_bottom {
                    Some(i)
                } else {
                    last
                },
            )
        },
    );
    sink.record(&format!(
        "anchors: first={first_anchor:?} last={last_anchor:?} floating={floating:?}",
    ));

    let (base, path) = match (first_anchor, last_anchor) {
        _ if non_floating.len() <= 1 => (non_floating.clone(), DecisionPath::Trivial),
        (Some(first), Some(last)) if first != last => {
            place_anchored(signatures, config, sink, first, last, &non_floating)?
        }
        _ => {
            let order = exhaustive_order(signatures, config, sink, &non_floating)?;
            (order, DecisionPath::Exhaustive)
        }
    };

    let chain_score = (base.len() >= 2).then(|| score_chain(signatures, &base));
    if let Some(score) = chain_score {
        sink.record(&format!("chosen base order {base:?} score {score:.3}"));
    }

    let mut indices = base;
    indices.extend_from_slice(&floating);

    Ok(SequenceReport {
        order: Order::new(indices),
        path,
        classes,
        floating,
        chain_score,
    })
}

/// Place the interior between an anchor pair.
///
/// Zero or one middle image needs no comparison at all. Two or more
/// are ordered by exhaustive search over their permutations, scored as
/// the full `first -> middles -> last` chain. For exactly two middles
/// this reduces to comparing the two candidate chains, keeping the
/// ascending arrangement on a tie.
fn place_anchored(
    signatures: &[EdgeSignature],
    config: &EngineConfig,
    sink: &dyn DiagnosticSink,
    first: usize,
    last: usize,
    non_floating: &[usize],
) -> Result<(Vec<usize>, DecisionPath), EngineError> {
    let middles: Vec<usize> = non_floating
        .iter()
        .copied()
        .filter(|&i| i != first && i != last)
        .collect();

    match middles.len() {
        0 => Ok((vec![first, last], DecisionPath::Anchored)),
        1 => Ok((vec![first, middles[0], last], DecisionPath::Anchored)),
        count => {
            check_search_size(count, config)?;
            sink.record(&format!(
                "searching {count} middle images between anchors {first} and {last}",
            ));

            let mut best: Option<(Vec<usize>, f64)> = None;
            for middle_order in Permutations::new(middles) {
                let mut candidate = Vec::with_capacity(count + 2);
                candidate.push(first);
                candidate.extend_from_slice(&middle_order);
                candidate.push(last);

                let score = score_chain(signatures, &candidate);
                // Strict comparison keeps the earliest permutation on ties.
                if best.as_ref().is_none_or(|(_, s)| score < *s) {
                    best = Some((candidate, score));
                }
            }
            // A non-empty middle set always yields at least one permutation.
            let (order, _) = best.unwrap_or((vec![first, last], 0.0));
            Ok((order, DecisionPath::AnchoredSearch))
        }
    }
}

/// Score every permutation of `indices` and keep the best chain.
///
/// Permutations are generated in lexicographic order starting from the
/// ascending arrangement; a strictly lower score replaces the current
/// best, so ties keep the earliest-generated permutation.
fn exhaustive_order(
    signatures: &[EdgeSignature],
    config: &EngineConfig,
    sink: &dyn DiagnosticSink,
    indices: &[usize],
) -> Result<Vec<usize>, EngineError> {
    check_search_size(indices.len(), config)?;
    sink.record(&format!(
        "no anchor pair, exhaustive search over {} images",
        indices.len(),
    ));

    let mut best: Option<(Vec<usize>, f64)> = None;
    for candidate in Permutations::new(indices.to_vec()) {
        let score = score_chain(signatures, &candidate);
        if best.as_ref().is_none_or(|(_, s)| score < *s) {
            best = Some((candidate, score));
        }
    }
    Ok(best.map(|(order, _)| order).unwrap_or_default())
}

/// Sum of adjacent-pair differences along a chain: each pair scored as
/// the left image's bottom edge against the right image's top edge.
fn score_chain(signatures: &[EdgeSignature], chain: &[usize]) -> f64 {
    chain
        .windows(2)
        .map(|pair| {
            metric::difference(
                &signatures[pair[0]].bottom_pixels,
                &signatures[pair[1]].top_pixels,
            )
        })
        .sum()
}

fn check_search_size(count: usize, config: &EngineConfig) -> Result<(), EngineError> {
    if count > config.max_search_images {
        return Err(EngineError::TooManySearchImages {
            count,
            limit: config.max_search_images,
        });
    }
    Ok(())
}

/// Lazily generated permutations in lexicographic order.
///
/// Iterative successor stepping rather than recursive generation keeps
/// peak memory at one permutation regardless of input size. The first
/// item is the input sorted ascending; the iterator is finite and can
/// be restarted by constructing a new one.
struct Permutations {
    items: Vec<usize>,
    started: bool,
    exhausted: bool,
}

impl Permutations {
    fn new(mut items: Vec<usize>) -> Self {
        items.sort_unstable();
        Self {
            items,
            started: false,
            exhausted: false,
        }
    }
}

impl Iterator for Permutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.exhausted {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.items.clone());
        }

        // Standard next-permutation step: find the rightmost ascent,
        // swap its left element with the smallest larger element to its
        // right, then reverse the suffix.
        let n = self.items.len();
        let Some(pivot) = (0..n.saturating_sub(1))
            .rev()
            .find(|&i| self.items[i] < self.items[i + 1])
        else {
            self.exhausted = true;
            return None;
        };
        let Some(successor) = (pivot + 1..n)
            .rev()
            .find(|&j| self.items[j] > self.items[pivot])
        else {
            // Unreachable: the pivot guarantees a larger suffix element.
            self.exhausted = true;
            return None;
        };
        self.items.swap(pivot, successor);
        self.items[pivot + 1..].reverse();
        Some(self.items.clone())
    }
}
