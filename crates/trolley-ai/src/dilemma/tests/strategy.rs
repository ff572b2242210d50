use super::common::*;

use crate::dilemma::classifier::{Classifier, ClassifierError, ClassifierHandle};
use crate::dilemma::domain::{AgeGroup, Flag, HeadCount, Role, Roster, TrackId};
use crate::dilemma::features::FeatureVector;
use crate::dilemma::scenario::{AggregateScenario, RosterScenario, Scenario};
use crate::dilemma::strategy::{
    DecisionEngine, DecisionMetrics, DecisionMode, DecisionResult, DecisionRule, DeonVariant,
};
use crate::dilemma::weights::{AgeOverrides, WeightOverrides};
use std::sync::Arc;

fn utilitarian(track1: Roster, track2: Roster) -> DecisionResult {
    DecisionEngine::without_classifier().decide_roster(&RosterScenario::new(
        track1,
        track2,
        DecisionMode::Utilitarian,
    ))
}

fn deontological(variant: &str, track1: Roster, track2: Roster) -> DecisionResult {
    DecisionEngine::without_classifier().decide_roster(
        &RosterScenario::new(track1, track2, DecisionMode::Deontological).with_variant(variant),
    )
}

fn losses(result: &DecisionResult) -> (i64, i64) {
    match result.metrics {
        DecisionMetrics::Roster {
            track1_loss,
            track2_loss,
            ..
        } => (track1_loss, track2_loss),
        DecisionMetrics::Totals { .. } => panic!("expected roster metrics"),
    }
}

#[test]
fn simple_count_sacrifices_the_smaller_group() {
    let engine = DecisionEngine::without_classifier();
    let result = engine.decide_aggregate(&AggregateScenario::new(
        HeadCount::new(2, 0, 0),
        HeadCount::new(0, 3, 0),
        DecisionMode::Normal,
    ));

    assert_eq!(result.chosen_track, TrackId::One);
    assert_eq!(
        result.metrics,
        DecisionMetrics::Totals {
            track1_total: 2,
            track2_total: 3
        }
    );
}

#[test]
fn utilitarian_sacrifices_the_lower_loss_in_either_direction() {
    // child = 4 + 1, two adults = 2 * (2 + 1)
    let result = utilitarian(roster(vec![child()]), roster(vec![adult(), adult()]));
    assert_eq!(result.chosen_track, TrackId::One);
    assert_eq!(result.rule, DecisionRule::EthicalLoss);
    assert_eq!(losses(&result), (5, 6));

    let result = utilitarian(roster(vec![adult(), adult()]), roster(vec![child()]));
    assert_eq!(result.chosen_track, TrackId::Two);
}

#[test]
fn utilitarian_equal_loss_prefers_the_smaller_group_then_track_one() {
    let result = utilitarian(roster(vec![child()]), roster(vec![adult(), elder()]));
    assert_eq!(losses(&result), (5, 5));
    assert_eq!(result.chosen_track, TrackId::One);
    assert_eq!(result.rule, DecisionRule::HeadCount);

    let result = utilitarian(roster(vec![adult()]), roster(vec![adult()]));
    assert_eq!(result.chosen_track, TrackId::One);
    assert_eq!(result.rule, DecisionRule::FullTie);
}

#[test]
fn custom_rules_change_the_reported_losses() {
    let rules = WeightOverrides {
        age: AgeOverrides {
            child: Some(10),
            ..AgeOverrides::default()
        },
        ..WeightOverrides::default()
    };
    let scenario = RosterScenario::new(
        roster(vec![child()]),
        roster(vec![adult(), adult()]),
        DecisionMode::Custom,
    )
    .with_custom_rules(rules);

    let result = DecisionEngine::without_classifier().decide_roster(&scenario);

    assert_eq!(result.chosen_track, TrackId::Two);
    assert_eq!(losses(&result), (11, 6));
    assert!(result.reason.contains("track 1 loss = 11"));
}

#[test]
fn custom_without_rules_matches_utilitarian() {
    let track1 = roster(vec![person(Some(AgeGroup::Teen), Some(Role::Doctor), &[])]);
    let track2 = roster(vec![adult(), adult(), adult()]);
    let custom = DecisionEngine::without_classifier().decide_roster(&RosterScenario::new(
        track1.clone(),
        track2.clone(),
        DecisionMode::Custom,
    ));
    let baseline = utilitarian(track1, track2);

    assert_eq!(custom.chosen_track, baseline.chosen_track);
    assert_eq!(custom.metrics, baseline.metrics);
}

#[test]
fn non_intervention_always_sacrifices_track_one() {
    let result = deontological(
        "non_intervention",
        roster(vec![child(), child(), child()]),
        roster(vec![elder()]),
    );
    assert_eq!(result.chosen_track, TrackId::One);
    assert_eq!(result.rule, DecisionRule::NonIntervention);
}

#[test]
fn protect_children_sacrifices_the_childless_track() {
    let result = deontological(
        "protect_children",
        roster(vec![child()]),
        roster(vec![adult(), adult(), adult()]),
    );
    assert_eq!(result.chosen_track, TrackId::Two);
    assert_eq!(result.rule, DecisionRule::ChildPresence);

    let result = deontological(
        "protect_children",
        roster(vec![adult(), adult(), adult()]),
        roster(vec![child()]),
    );
    assert_eq!(result.chosen_track, TrackId::One);
}

#[test]
fn protect_children_falls_back_to_losses_when_both_tracks_hold_children() {
    let result = deontological(
        "protect_children",
        roster(vec![child()]),
        roster(vec![child(), adult()]),
    );
    assert_eq!(result.chosen_track, TrackId::One);
    assert_eq!(result.rule, DecisionRule::EthicalLoss);
    assert!(result.reason.contains("both"));
}

#[test]
fn protect_innocent_sacrifices_the_guiltier_track() {
    let result = deontological(
        "protect_innocent",
        roster(vec![person(None, None, &[Flag::Guilty])]),
        roster(vec![person(None, None, &[])]),
    );
    assert_eq!(result.chosen_track, TrackId::One);
    assert_eq!(result.rule, DecisionRule::GuiltyCount);
}

#[test]
fn protect_innocent_counts_law_breakers_too() {
    let result = deontological(
        "protect_innocent",
        roster(vec![person(None, None, &[Flag::Guilty])]),
        roster(vec![person(None, None, &[Flag::Guilty, Flag::LawBreaker])]),
    );
    assert_eq!(result.chosen_track, TrackId::Two);
}

#[test]
fn protect_vulnerable_only_fires_when_one_side_is_free_of_vulnerable_people() {
    let pregnant = person(Some(AgeGroup::Adult), None, &[Flag::Pregnant]);
    let result = deontological(
        "protect_vulnerable",
        roster(vec![pregnant.clone()]),
        roster(vec![adult(), adult()]),
    );
    assert_eq!(result.chosen_track, TrackId::Two);
    assert_eq!(result.rule, DecisionRule::VulnerablePresence);

    let disabled = person(Some(AgeGroup::Adult), None, &[Flag::Disabled]);
    let result = deontological(
        "protect_vulnerable",
        roster(vec![pregnant.clone()]),
        roster(vec![disabled]),
    );
    // pregnant adult = 2 + 1 + 3, disabled adult = 2 + 1 + 2
    assert_eq!(result.chosen_track, TrackId::Two);
    assert_eq!(result.rule, DecisionRule::EthicalLoss);
    assert_eq!(losses(&result), (6, 5));

    let result = deontological(
        "protect_vulnerable",
        roster(vec![adult(), adult()]),
        roster(vec![pregnant]),
    );
    assert_eq!(result.chosen_track, TrackId::One);
    assert_eq!(result.rule, DecisionRule::VulnerablePresence);
}

#[test]
fn protect_innocent_equal_guilt_walks_the_utilitarian_chain() {
    let guilty_adult = person(Some(AgeGroup::Adult), None, &[Flag::Guilty]);
    let guilty_child = person(Some(AgeGroup::Child), None, &[Flag::Guilty]);

    // guilty adult = 2 + 1 - 2, guilty child = 4 + 1 - 2
    let result = deontological(
        "protect_innocent",
        roster(vec![guilty_adult.clone()]),
        roster(vec![guilty_child.clone()]),
    );
    assert_eq!(result.chosen_track, TrackId::One);
    assert_eq!(result.rule, DecisionRule::EthicalLoss);
    assert_eq!(losses(&result), (1, 3));

    let result = deontological(
        "protect_innocent",
        roster(vec![guilty_adult.clone(), elder()]),
        roster(vec![guilty_child]),
    );
    assert_eq!(losses(&result), (3, 3));
    assert_eq!(result.chosen_track, TrackId::Two);
    assert_eq!(result.rule, DecisionRule::HeadCount);

    let result = deontological(
        "protect_innocent",
        roster(vec![guilty_adult.clone()]),
        roster(vec![guilty_adult]),
    );
    assert_eq!(result.chosen_track, TrackId::One);
    assert_eq!(result.rule, DecisionRule::FullTie);
    assert!(result.reason.contains("protect innocent"));
}

#[test]
fn unknown_variant_and_mode_default_to_track_one_and_say_so() {
    let result = deontological("golden_rule", roster(vec![adult()]), Roster::default());
    assert_eq!(result.chosen_track, TrackId::One);
    assert_eq!(result.rule, DecisionRule::UnrecognizedVariant);
    assert!(result.reason.contains("golden_rule"));

    let result = DecisionEngine::without_classifier().decide_roster(&RosterScenario::new(
        Roster::default(),
        roster(vec![adult()]),
        DecisionMode::Normal,
    ));
    assert_eq!(result.chosen_track, TrackId::One);
    assert_eq!(result.rule, DecisionRule::UnrecognizedMode);
    assert!(result.reason.contains("not implemented"));
}

#[test]
fn every_mode_terminates_on_empty_tracks() {
    let engine = DecisionEngine::without_classifier();
    let modes = [
        DecisionMode::Normal,
        DecisionMode::ChildrenFirst,
        DecisionMode::Utilitarian,
        DecisionMode::Custom,
        DecisionMode::Deontological,
        DecisionMode::Ml,
        DecisionMode::from("manual"),
    ];

    for mode in modes {
        let scenarios = [
            Scenario::from(AggregateScenario::new(
                HeadCount::default(),
                HeadCount::default(),
                mode.clone(),
            )),
            Scenario::from(RosterScenario::new(
                Roster::default(),
                Roster::default(),
                mode.clone(),
            )),
        ];
        for scenario in &scenarios {
            let result = engine.decide(scenario);
            assert_eq!(result.chosen_track, TrackId::One, "mode {mode}");
            assert!(!result.reason.is_empty(), "mode {mode}");
        }
    }
}

#[test]
fn deontological_variants_terminate_on_empty_tracks() {
    for variant in [
        DeonVariant::NonIntervention,
        DeonVariant::ProtectChildren,
        DeonVariant::ProtectInnocent,
        DeonVariant::ProtectVulnerable,
    ] {
        let result = deontological(variant.label(), Roster::default(), Roster::default());
        assert_eq!(result.chosen_track, TrackId::One, "variant {variant}");
    }
}

#[test]
fn classifier_prediction_is_passed_through() {
    let engine = engine_with(TrackId::Two);

    let aggregate = engine.decide_aggregate(&AggregateScenario::new(
        HeadCount::new(0, 1, 0),
        HeadCount::new(5, 0, 0),
        DecisionMode::Ml,
    ));
    assert_eq!(aggregate.chosen_track, TrackId::Two);
    assert_eq!(aggregate.rule, DecisionRule::Classifier);

    let roster_result = engine.decide_roster(&RosterScenario::new(
        roster(vec![adult()]),
        roster(vec![child()]),
        DecisionMode::Ml,
    ));
    assert_eq!(roster_result.chosen_track, TrackId::Two);
}

#[test]
fn classifier_sees_the_encoding_matching_the_scenario_shape() {
    struct WidthCheckingClassifier;

    impl Classifier for WidthCheckingClassifier {
        fn predict(&self, features: &FeatureVector) -> Result<TrackId, ClassifierError> {
            Ok(if features.len() == 6 {
                TrackId::One
            } else {
                TrackId::Two
            })
        }
    }

    let engine = DecisionEngine::new(Arc::new(ClassifierHandle::preloaded(Arc::new(WidthCheckingClassifier))));

    let aggregate = engine.decide(&Scenario::from(AggregateScenario::new(
        HeadCount::default(),
        HeadCount::default(),
        DecisionMode::Ml,
    )));
    let roster_result = engine.decide(&Scenario::from(RosterScenario::new(
        Roster::default(),
        Roster::default(),
        DecisionMode::Ml,
    )));

    assert_eq!(aggregate.chosen_track, TrackId::One);
    assert_eq!(roster_result.chosen_track, TrackId::Two);
}

#[test]
fn unavailable_classifier_falls_back_to_track_one() {
    let result = DecisionEngine::without_classifier().decide_aggregate(&AggregateScenario::new(
        HeadCount::new(0, 0, 1),
        HeadCount::new(0, 4, 0),
        DecisionMode::Ml,
    ));
    assert_eq!(result.chosen_track, TrackId::One);
    assert_eq!(result.rule, DecisionRule::ClassifierUnavailable);
    assert!(result.reason.contains("unavailable"));
}
