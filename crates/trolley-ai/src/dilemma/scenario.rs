use serde::{Deserialize, Serialize};

use super::domain::{HeadCount, Roster};
use super::strategy::{DecisionMode, DeonVariant};
use super::weights::WeightOverrides;

/// Legacy scenario: both tracks given as pre-counted age buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateScenario {
    #[serde(default)]
    pub track1: HeadCount,
    #[serde(default)]
    pub track2: HeadCount,
    #[serde(default = "default_aggregate_mode")]
    pub mode: DecisionMode,
}

impl AggregateScenario {
    pub fn new(track1: HeadCount, track2: HeadCount, mode: impl Into<DecisionMode>) -> Self {
        Self {
            track1,
            track2,
            mode: mode.into(),
        }
    }
}

impl Default for AggregateScenario {
    fn default() -> Self {
        Self::new(HeadCount::default(), HeadCount::default(), DecisionMode::Normal)
    }
}

/// Scenario listing every person on each track, with mode-specific parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterScenario {
    #[serde(default)]
    pub track1: Roster,
    #[serde(default)]
    pub track2: Roster,
    #[serde(default = "default_roster_mode")]
    pub mode: DecisionMode,
    #[serde(default)]
    pub deon_variant: DeonVariant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_rules: Option<WeightOverrides>,
}

impl RosterScenario {
    pub fn new(track1: Roster, track2: Roster, mode: impl Into<DecisionMode>) -> Self {
        Self {
            track1,
            track2,
            mode: mode.into(),
            deon_variant: DeonVariant::default(),
            custom_rules: None,
        }
    }

    pub fn with_variant(mut self, variant: impl Into<DeonVariant>) -> Self {
        self.deon_variant = variant.into();
        self
    }

    pub fn with_custom_rules(mut self, rules: WeightOverrides) -> Self {
        self.custom_rules = Some(rules);
        self
    }
}

impl Default for RosterScenario {
    fn default() -> Self {
        Self::new(Roster::default(), Roster::default(), DecisionMode::Utilitarian)
    }
}

/// Either scenario shape. Roster form is tried first, so a document whose tracks are
/// lists of people never reads as aggregate counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scenario {
    Roster(RosterScenario),
    Aggregate(AggregateScenario),
}

impl Scenario {
    pub fn mode(&self) -> &DecisionMode {
        match self {
            Self::Roster(scenario) => &scenario.mode,
            Self::Aggregate(scenario) => &scenario.mode,
        }
    }
}

impl From<RosterScenario> for Scenario {
    fn from(scenario: RosterScenario) -> Self {
        Self::Roster(scenario)
    }
}

impl From<AggregateScenario> for Scenario {
    fn from(scenario: AggregateScenario) -> Self {
        Self::Aggregate(scenario)
    }
}

fn default_aggregate_mode() -> DecisionMode {
    DecisionMode::Normal
}

fn default_roster_mode() -> DecisionMode {
    DecisionMode::Utilitarian
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shape_selects_the_scenario_kind() {
        let roster: Scenario = serde_json::from_value(json!({
            "track1": [{ "age": "child" }],
            "track2": [],
        }))
        .expect("roster scenario");
        assert!(matches!(roster, Scenario::Roster(_)));
        assert_eq!(roster.mode(), &DecisionMode::Utilitarian);

        let aggregate: Scenario = serde_json::from_value(json!({
            "track1": { "children": 2 },
            "track2": { "adults": 3 },
        }))
        .expect("aggregate scenario");
        assert!(matches!(aggregate, Scenario::Aggregate(_)));
        assert_eq!(aggregate.mode(), &DecisionMode::Normal);
    }

    #[test]
    fn roster_defaults_fill_missing_parameters() {
        let scenario: RosterScenario =
            serde_json::from_value(json!({ "mode": "deontological" })).expect("scenario");
        assert!(scenario.track1.is_empty() && scenario.track2.is_empty());
        assert_eq!(scenario.deon_variant, DeonVariant::NonIntervention);
        assert_eq!(scenario.custom_rules, None);
    }

    #[test]
    fn null_counts_read_as_zero() {
        let scenario: AggregateScenario = serde_json::from_value(json!({
            "track1": { "children": null, "adults": 1 },
            "mode": "children_first",
        }))
        .expect("scenario");
        assert_eq!(scenario.track1, HeadCount::new(0, 1, 0));
        assert_eq!(scenario.track2, HeadCount::default());
        assert_eq!(scenario.mode, DecisionMode::ChildrenFirst);
    }
}
