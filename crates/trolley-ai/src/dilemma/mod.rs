//! Multi-mode trolley dilemma engine.
//!
//! Scenarios arrive in aggregate form (pre-counted age buckets) or roster form (one entry
//! per person). The [`DecisionEngine`] scores them under the selected mode, and the
//! [`ComparisonOrchestrator`] runs several modes side by side against a manual choice.

pub mod batch;
pub mod classifier;
pub mod comparison;
pub mod domain;
pub mod features;
pub mod router;
pub mod scenario;
pub mod scoring;
pub mod strategy;
pub mod weights;

#[cfg(test)]
mod tests;

pub use batch::{decide_batch, BatchError, BatchSummary};
pub use classifier::{
    Classifier, ClassifierError, ClassifierHandle, ForestModel, ModelLoadError, ModelSource,
};
pub use comparison::{
    AgreementLedger, AgreementStats, ComparisonOrchestrator, ComparisonRequest,
    ComparisonResult, InMemoryAgreementLedger, ManualComparison, StrategyName,
};
pub use domain::{AgeGroup, Flag, HeadCount, Person, Role, Roster, TrackId};
pub use features::{
    encode_extended, encode_legacy, encode_legacy_roster, EncodingScheme, FeatureVector,
};
pub use router::dilemma_router;
pub use scenario::{AggregateScenario, RosterScenario, Scenario};
pub use scoring::{person_value, track_loss};
pub use strategy::{
    DecisionEngine, DecisionMetrics, DecisionMode, DecisionResult, DecisionRule, DeonVariant,
};
pub use weights::{
    merge, AgeOverrides, FlagOverrides, RoleOverrides, WeightOverrides, WeightTable,
};
