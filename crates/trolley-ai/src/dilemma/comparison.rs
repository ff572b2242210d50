use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::info;

use super::domain::{Roster, TrackId};
use super::scenario::RosterScenario;
use super::strategy::{DecisionEngine, DecisionMode, DecisionResult, DeonVariant};
use super::weights::WeightOverrides;

/// Running tally of manual choices and how often any strategy matched them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgreementStats {
    pub total_manual_decisions: u64,
    pub total_ai_agreements: u64,
    /// `None` until the first manual choice is recorded.
    pub agreement_rate: Option<f64>,
}

impl AgreementStats {
    fn from_counts(total_manual_decisions: u64, total_ai_agreements: u64) -> Self {
        let agreement_rate = (total_manual_decisions > 0)
            .then(|| total_ai_agreements as f64 / total_manual_decisions as f64);
        Self {
            total_manual_decisions,
            total_ai_agreements,
            agreement_rate,
        }
    }
}

/// Store for the agreement counters so the orchestrator can be exercised in isolation.
pub trait AgreementLedger: Send + Sync {
    /// Counts one manual decision and, when `any_agreement` holds, one agreement.
    fn record(&self, any_agreement: bool) -> AgreementStats;
    fn snapshot(&self) -> AgreementStats;
}

#[derive(Debug, Default)]
struct Counters {
    manual_decisions: u64,
    agreements: u64,
}

/// Process-lifetime ledger guarded by a mutex so both counters move together.
#[derive(Debug, Default)]
pub struct InMemoryAgreementLedger {
    counters: Mutex<Counters>,
}

impl InMemoryAgreementLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AgreementLedger for InMemoryAgreementLedger {
    fn record(&self, any_agreement: bool) -> AgreementStats {
        let mut counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        counters.manual_decisions += 1;
        if any_agreement {
            counters.agreements += 1;
        }
        AgreementStats::from_counts(counters.manual_decisions, counters.agreements)
    }

    fn snapshot(&self) -> AgreementStats {
        let counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        AgreementStats::from_counts(counters.manual_decisions, counters.agreements)
    }
}

/// Strategy families run side by side during a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyName {
    Utilitarian,
    Deontological,
    Custom,
    Ml,
}

impl StrategyName {
    pub fn label(self) -> &'static str {
        match self {
            Self::Utilitarian => "utilitarian",
            Self::Deontological => "deontological",
            Self::Custom => "custom",
            Self::Ml => "ml",
        }
    }

    fn mode(self) -> DecisionMode {
        match self {
            Self::Utilitarian => DecisionMode::Utilitarian,
            Self::Deontological => DecisionMode::Deontological,
            Self::Custom => DecisionMode::Custom,
            Self::Ml => DecisionMode::Ml,
        }
    }
}

impl fmt::Display for StrategyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Roster scenario plus the options controlling which strategies run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ComparisonRequest {
    #[serde(default)]
    pub track1: Roster,
    #[serde(default)]
    pub track2: Roster,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deon_variant: Option<DeonVariant>,
    /// Present whenever the caller sent a non-empty `custom_rules` object, even one
    /// naming no known category.
    #[serde(
        default,
        deserialize_with = "supplied_rules",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_rules: Option<WeightOverrides>,
    #[serde(default = "include_ml_default")]
    pub include_ml: bool,
    /// Anything other than 1 or 2 is treated as "no manual choice".
    #[serde(default, deserialize_with = "lenient_track")]
    pub manual_choice: Option<TrackId>,
}

impl ComparisonRequest {
    pub fn new(track1: Roster, track2: Roster) -> Self {
        Self {
            track1,
            track2,
            deon_variant: None,
            custom_rules: None,
            include_ml: true,
            manual_choice: None,
        }
    }

    pub fn with_manual_choice(mut self, choice: TrackId) -> Self {
        self.manual_choice = Some(choice);
        self
    }
}

fn include_ml_default() -> bool {
    true
}

fn supplied_rules<'de, D>(deserializer: D) -> Result<Option<WeightOverrides>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Value::Object(fields)) if fields.is_empty() => Ok(None),
        Some(value) => WeightOverrides::deserialize(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn lenient_track<'de, D>(deserializer: D) -> Result<Option<TrackId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_i64)
        .and_then(TrackId::from_index))
}

/// Per-strategy agreement with the caller's own choice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManualComparison {
    pub manual_choice: Option<TrackId>,
    pub agreements: BTreeMap<StrategyName, bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub results: BTreeMap<StrategyName, DecisionResult>,
    pub manual: ManualComparison,
    pub stats: AgreementStats,
}

/// Runs one roster scenario through several strategies and tracks agreement with
/// manual choices.
pub struct ComparisonOrchestrator<L> {
    engine: Arc<DecisionEngine>,
    ledger: Arc<L>,
    default_variant: DeonVariant,
}

impl<L> ComparisonOrchestrator<L>
where
    L: AgreementLedger + 'static,
{
    pub fn new(engine: Arc<DecisionEngine>, ledger: Arc<L>) -> Self {
        Self {
            engine,
            ledger,
            default_variant: DeonVariant::ProtectChildren,
        }
    }

    /// Variant used when a request does not name one.
    pub fn with_default_variant(mut self, variant: DeonVariant) -> Self {
        self.default_variant = variant;
        self
    }

    pub fn engine(&self) -> &Arc<DecisionEngine> {
        &self.engine
    }

    pub fn default_variant(&self) -> &DeonVariant {
        &self.default_variant
    }

    pub fn stats(&self) -> AgreementStats {
        self.ledger.snapshot()
    }

    pub fn compare(&self, request: &ComparisonRequest) -> ComparisonResult {
        let custom_rules = request.custom_rules.as_ref();

        let mut strategies = vec![StrategyName::Utilitarian, StrategyName::Deontological];
        if custom_rules.is_some() {
            strategies.push(StrategyName::Custom);
        }
        if request.include_ml {
            strategies.push(StrategyName::Ml);
        }

        let variant = request
            .deon_variant
            .clone()
            .unwrap_or_else(|| self.default_variant.clone());

        let results: BTreeMap<_, _> = strategies
            .into_iter()
            .map(|strategy| {
                let scenario = RosterScenario {
                    track1: request.track1.clone(),
                    track2: request.track2.clone(),
                    mode: strategy.mode(),
                    deon_variant: variant.clone(),
                    custom_rules: custom_rules.cloned(),
                };
                (strategy, self.engine.decide_roster(&scenario))
            })
            .collect();

        let (manual, stats) = match request.manual_choice {
            Some(choice) => {
                let agreements: BTreeMap<_, _> = results
                    .iter()
                    .map(|(strategy, result)| (*strategy, result.chosen_track == choice))
                    .collect();
                let any_agreement = agreements.values().any(|agrees| *agrees);
                let stats = self.ledger.record(any_agreement);

                info!(
                    manual_choice = %choice,
                    any_agreement,
                    total_manual_decisions = stats.total_manual_decisions,
                    agreement_rate = stats.agreement_rate,
                    "manual choice recorded"
                );

                let manual = ManualComparison {
                    manual_choice: Some(choice),
                    agreements,
                };
                (manual, stats)
            }
            None => {
                let manual = ManualComparison {
                    manual_choice: None,
                    agreements: BTreeMap::new(),
                };
                (manual, self.ledger.snapshot())
            }
        };

        ComparisonResult {
            results,
            manual,
            stats,
        }
    }
}
