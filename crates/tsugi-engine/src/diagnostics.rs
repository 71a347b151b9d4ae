//! Sequencing diagnostics: the injected logging capability and the
//! per-run decision report.
//!
//! The sink is supplied at invocation time and is write-only; nothing
//! the engine computes ever depends on it. The report is structured
//! data describing how the final order was reached, intended for
//! parameter tuning and the CLI's `--json` output.

use serde::{Deserialize, Serialize};

use crate::types::{EdgeClass, Order};

/// A free-form diagnostic text sink.
///
/// Implementations must tolerate repeated calls and must not influence
/// engine behavior. Any `Fn(&str)` closure qualifies.
pub trait DiagnosticSink {
    /// Record one diagnostic message.
    fn record(&self, message: &str);
}

/// The default sink: discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&self, _message: &str) {}
}

impl<F: Fn(&str)> DiagnosticSink for F {
    fn record(&self, message: &str) {
        self(message);
    }
}

/// Which branch of the decision procedure produced the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionPath {
    /// Zero or one non-floating image: nothing to compare.
    Trivial,
    /// Both anchors found; at most one middle image placed directly.
    Anchored,
    /// Both anchors found; middle images ordered by exhaustive search
    /// between the anchors.
    AnchoredSearch,
    /// No usable anchor pair; exhaustive search over all non-floating
    /// images.
    Exhaustive,
}

impl DecisionPath {
    /// Short human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Trivial => "trivial",
            Self::Anchored => "anchored",
            Self::AnchoredSearch => "anchored-search",
            Self::Exhaustive => "exhaustive",
        }
    }
}

/// Structured outcome of one sequencing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceReport {
    /// The computed ordering of input indices.
    pub order: Order,
    /// Which decision branch produced it.
    pub path: DecisionPath,
    /// Per-index classification, in input order.
    pub classes: Vec<EdgeClass>,
    /// Indices that were blank on both edges, in input order. These
    /// always occupy the trailing positions of `order`.
    pub floating: Vec<usize>,
    /// Total adjacent-pair score of the non-floating part of the
    /// order, when at least one pair was scored.
    pub chain_score: Option<f64>,
}

impl SequenceReport {
    /// Format the report as a short human-readable summary.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        let order: Vec<String> = self.order.indices().iter().map(ToString::to_string).collect();
        lines.push(format!("Order: [{}]", order.join(", ")));
        lines.push(format!("Decision path: {}", self.path.label()));

        let classes: Vec<String> = self
            .classes
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{i}:{c:?}"))
            .collect();
        lines.push(format!("Classes: {}", classes.join(" ")));

        if !self.floating.is_empty() {
            let floating: Vec<String> =
                self.floating.iter().map(ToString::to_string).collect();
            lines.push(format!("Floating (appended last): {}", floating.join(", ")));
        }
        if let Some(score) = self.chain_score {
            lines.push(format!("Chain score: {score:.3}"));
        }

        lines.join("\n")
    }
}
