use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use super::comparison::{AgreementLedger, ComparisonOrchestrator, ComparisonRequest};
use super::scenario::{AggregateScenario, RosterScenario};
use super::strategy::DecisionResult;

/// Router builder exposing the decision and comparison endpoints.
pub fn dilemma_router<L>(orchestrator: Arc<ComparisonOrchestrator<L>>) -> Router
where
    L: AgreementLedger + 'static,
{
    Router::new()
        .route("/decide", post(decide_handler::<L>))
        .route("/decide_v2", post(decide_v2_handler::<L>))
        .route("/compare", post(compare_handler::<L>))
        .with_state(orchestrator)
}

/// Decision echoed together with the payload it was computed from.
#[derive(Debug, Serialize)]
struct DecisionResponse {
    #[serde(flatten)]
    result: DecisionResult,
    received: Value,
}

pub(crate) async fn decide_handler<L>(
    State(orchestrator): State<Arc<ComparisonOrchestrator<L>>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response
where
    L: AgreementLedger + 'static,
{
    let (scenario, received) = match parse_body::<AggregateScenario>(body) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    let result = orchestrator.engine().decide_aggregate(&scenario);
    (StatusCode::OK, Json(DecisionResponse { result, received })).into_response()
}

pub(crate) async fn decide_v2_handler<L>(
    State(orchestrator): State<Arc<ComparisonOrchestrator<L>>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response
where
    L: AgreementLedger + 'static,
{
    let (scenario, received) = match parse_body::<RosterScenario>(body) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    let result = orchestrator.engine().decide_roster(&scenario);
    (StatusCode::OK, Json(DecisionResponse { result, received })).into_response()
}

pub(crate) async fn compare_handler<L>(
    State(orchestrator): State<Arc<ComparisonOrchestrator<L>>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response
where
    L: AgreementLedger + 'static,
{
    let (request, _) = match parse_body::<ComparisonRequest>(body) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    let comparison = orchestrator.compare(&request);
    (StatusCode::OK, Json(comparison)).into_response()
}

/// Rejects missing, malformed, and empty bodies before the engine sees them.
fn parse_body<T: DeserializeOwned>(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(T, Value), Response> {
    let Json(value) = body.map_err(|rejection| bad_request(rejection.body_text()))?;

    let is_empty_object = value.as_object().map_or(true, |fields| fields.is_empty());
    if is_empty_object {
        return Err(bad_request(
            "request body must be a non-empty JSON object".to_string(),
        ));
    }

    let parsed = serde_json::from_value(value.clone())
        .map_err(|error| bad_request(format!("invalid scenario: {error}")))?;
    Ok((parsed, value))
}

fn bad_request(message: String) -> Response {
    let payload = json!({
        "error": message,
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}
