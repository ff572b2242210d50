use serde::Serialize;

use super::super::domain::TrackId;

/// Comparator that settled a decision, reported alongside the prose rationale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionRule {
    TotalCount,
    ChildCount,
    EthicalLoss,
    HeadCount,
    FullTie,
    NonIntervention,
    ChildPresence,
    GuiltyCount,
    VulnerablePresence,
    Classifier,
    ClassifierUnavailable,
    UnrecognizedMode,
    UnrecognizedVariant,
}

/// Metrics reported with a decision, shaped by the track representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DecisionMetrics {
    Totals {
        track1_total: u64,
        track2_total: u64,
    },
    Roster {
        track1_count: usize,
        track2_count: usize,
        track1_loss: i64,
        track2_loss: i64,
    },
}

/// Outcome of one strategy: the sacrificed track and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionResult {
    pub chosen_track: TrackId,
    pub rule: DecisionRule,
    pub reason: String,
    #[serde(flatten)]
    pub metrics: DecisionMetrics,
}

/// Intermediate verdict produced by a strategy before metrics are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Verdict {
    pub(crate) track: TrackId,
    pub(crate) rule: DecisionRule,
    pub(crate) reason: String,
}

impl Verdict {
    pub(crate) fn new(track: TrackId, rule: DecisionRule, reason: impl Into<String>) -> Self {
        Self {
            track,
            rule,
            reason: reason.into(),
        }
    }

    pub(crate) fn default_track(reason: impl Into<String>) -> Self {
        Self::new(TrackId::One, DecisionRule::FullTie, reason)
    }

    pub(crate) fn with_metrics(self, metrics: DecisionMetrics) -> DecisionResult {
        DecisionResult {
            chosen_track: self.track,
            rule: self.rule,
            reason: self.reason,
            metrics,
        }
    }
}

/// Track holding the strictly smaller value, if the values differ.
pub(crate) fn lower_side<T: Ord>(track1: T, track2: T) -> Option<TrackId> {
    match track1.cmp(&track2) {
        std::cmp::Ordering::Less => Some(TrackId::One),
        std::cmp::Ordering::Greater => Some(TrackId::Two),
        std::cmp::Ordering::Equal => None,
    }
}

/// Track holding the strictly larger value, if the values differ.
pub(crate) fn higher_side<T: Ord>(track1: T, track2: T) -> Option<TrackId> {
    lower_side(track1, track2).map(TrackId::other)
}
