use crate::error::CompoundError;
use crate::models::{CompoundData, CompoundRequest};
use crate::services::metrics;
use crate::startup::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

/// `POST /api/compound`
///
/// Every failure is returned as `{"error": ...}` with the status from
/// [`CompoundError::status_code`]. A body that cannot be read as a JSON object
/// is a server error; the rejection detail is only logged.
pub async fn generate_compound(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CompoundData>, CompoundError> {
    let outcome = match payload.map_err(rejected_body) {
        Ok(Json(body)) => match CompoundRequest::from_body(body) {
            Ok(request) => state.compound_service.handle(request).await,
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    };

    match &outcome {
        Ok(payload) => {
            metrics::record_compound_request("success");
            tracing::info!(bytes = payload.raw_text.len(), "Compound structure generated");
        }
        Err(e) => metrics::record_compound_request(e.kind()),
    }

    Ok(Json(outcome?.into()))
}

fn rejected_body(rejection: JsonRejection) -> CompoundError {
    tracing::error!(error = %rejection.body_text(), "Unreadable compound request body");
    CompoundError::ServerError(rejection.body_text())
}
