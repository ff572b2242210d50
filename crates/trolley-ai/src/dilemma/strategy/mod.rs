//! Strategy dispatcher: turns a scenario and its mode into a [`DecisionResult`].
//!
//! Every path terminates with exactly one sacrificed track. Unsupported modes, unknown
//! variants, and an unavailable classifier all resolve to track 1 with a reason saying so.

mod aggregate;
mod deontological;
mod mode;
mod policy;
mod utilitarian;

pub use mode::{DecisionMode, DeonVariant};
pub use policy::{DecisionMetrics, DecisionResult, DecisionRule};

use std::sync::Arc;

use tracing::debug;

use super::classifier::ClassifierHandle;
use super::domain::TrackId;
use super::features::{encode_extended, encode_legacy, FeatureVector};
use super::scenario::{AggregateScenario, RosterScenario, Scenario};
use super::weights::WeightTable;
use policy::Verdict;
use utilitarian::{weigh_losses, RosterMeasures};

/// Stateless decision engine holding the default weights and the shared classifier slot.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    weights: WeightTable,
    classifier: Arc<ClassifierHandle>,
}

impl DecisionEngine {
    pub fn new(classifier: Arc<ClassifierHandle>) -> Self {
        Self {
            weights: WeightTable::default(),
            classifier,
        }
    }

    /// Engine whose `ml` mode always reports the model as unavailable.
    pub fn without_classifier() -> Self {
        Self::new(Arc::new(ClassifierHandle::unavailable()))
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn classifier(&self) -> &Arc<ClassifierHandle> {
        &self.classifier
    }

    pub fn decide(&self, scenario: &Scenario) -> DecisionResult {
        match scenario {
            Scenario::Aggregate(scenario) => self.decide_aggregate(scenario),
            Scenario::Roster(scenario) => self.decide_roster(scenario),
        }
    }

    pub fn decide_aggregate(&self, scenario: &AggregateScenario) -> DecisionResult {
        let AggregateScenario {
            track1,
            track2,
            mode,
        } = scenario;

        let verdict = match mode {
            DecisionMode::Normal => aggregate::simple_count(track1, track2),
            DecisionMode::ChildrenFirst => aggregate::children_first(track1, track2),
            DecisionMode::Ml => self.classify("ML", encode_legacy(track1, track2)),
            other => unsupported(other, "aggregate"),
        };

        debug!(
            mode = %mode,
            chosen_track = %verdict.track,
            rule = ?verdict.rule,
            "aggregate scenario decided"
        );

        verdict.with_metrics(DecisionMetrics::Totals {
            track1_total: track1.total(),
            track2_total: track2.total(),
        })
    }

    pub fn decide_roster(&self, scenario: &RosterScenario) -> DecisionResult {
        let RosterScenario {
            track1,
            track2,
            mode,
            deon_variant,
            custom_rules,
        } = scenario;

        let defaults = RosterMeasures::measure(track1, track2, &self.weights);

        let (verdict, measures) = match mode {
            DecisionMode::Utilitarian => (
                weigh_losses("Utilitarian (weighted)", &defaults),
                defaults,
            ),
            DecisionMode::Custom => {
                let table = self.weights.merged(custom_rules.as_ref());
                let measures = RosterMeasures::measure(track1, track2, &table);
                (weigh_losses("Custom weights", &measures), measures)
            }
            DecisionMode::Deontological => (
                deontological::decide(deon_variant, track1, track2, &defaults),
                defaults,
            ),
            DecisionMode::Ml => (
                self.classify("ML (extended)", encode_extended(track1, track2)),
                defaults,
            ),
            other => (unsupported(other, "roster"), defaults),
        };

        debug!(
            mode = %mode,
            deon_variant = %deon_variant,
            chosen_track = %verdict.track,
            rule = ?verdict.rule,
            track1_loss = measures.track1_loss,
            track2_loss = measures.track2_loss,
            "roster scenario decided"
        );

        verdict.with_metrics(measures.metrics())
    }

    fn classify(&self, label: &str, features: FeatureVector) -> Verdict {
        let scheme = features.scheme();
        match self.classifier.predict(&features) {
            Ok(track) => Verdict::new(
                track,
                DecisionRule::Classifier,
                format!(
                    "{label}: the classifier evaluated the {scheme} feature encoding and chose \
                     track {track}."
                ),
            ),
            Err(error) => Verdict::new(
                TrackId::One,
                DecisionRule::ClassifierUnavailable,
                format!("{label}: model unavailable ({error}); track 1 chosen by default."),
            ),
        }
    }
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::without_classifier()
    }
}

fn unsupported(mode: &DecisionMode, shape: &str) -> Verdict {
    Verdict::new(
        TrackId::One,
        DecisionRule::UnrecognizedMode,
        format!(
            "Mode '{mode}' is not implemented for {shape} scenarios; track 1 chosen by default."
        ),
    )
}
