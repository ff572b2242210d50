use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::dilemma::classifier::{Classifier, ClassifierError, ClassifierHandle};
use crate::dilemma::comparison::{ComparisonOrchestrator, InMemoryAgreementLedger};
use crate::dilemma::domain::{AgeGroup, Flag, Person, Role, Roster, TrackId};
use crate::dilemma::features::FeatureVector;
use crate::dilemma::router::dilemma_router;
use crate::dilemma::strategy::DecisionEngine;

pub(super) fn person(age: Option<AgeGroup>, role: Option<Role>, flags: &[Flag]) -> Person {
    Person::new(age, role, flags.iter().copied())
}

pub(super) fn child() -> Person {
    person(Some(AgeGroup::Child), None, &[])
}

pub(super) fn adult() -> Person {
    person(Some(AgeGroup::Adult), None, &[])
}

pub(super) fn elder() -> Person {
    person(Some(AgeGroup::Elder), None, &[])
}

pub(super) fn roster(people: Vec<Person>) -> Roster {
    Roster::new(people)
}

/// Classifier stub that always names the same track.
pub(super) struct FixedClassifier(pub(super) TrackId);

impl Classifier for FixedClassifier {
    fn predict(&self, _features: &FeatureVector) -> Result<TrackId, ClassifierError> {
        Ok(self.0)
    }
}

pub(super) fn engine_with(track: TrackId) -> DecisionEngine {
    DecisionEngine::new(Arc::new(ClassifierHandle::preloaded(Arc::new(
        FixedClassifier(track),
    ))))
}

pub(super) fn orchestrator(
    engine: DecisionEngine,
) -> ComparisonOrchestrator<InMemoryAgreementLedger> {
    ComparisonOrchestrator::new(Arc::new(engine), Arc::new(InMemoryAgreementLedger::new()))
}

pub(super) fn router() -> axum::Router {
    dilemma_router(Arc::new(orchestrator(DecisionEngine::without_classifier())))
}

pub(super) fn assert_bad_request(response: &Response) {
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
