//! Credits JSON API endpoint

use axum::extract::{Query, State};
use std::collections::HashMap;

use crate::{ApiError, AppState, FilterResponse};
use nomsops_core::CREDIT_FORM;

/// Filtered, ordered credits plus the active filter descriptions
pub async fn api_credits(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<String, ApiError> {
    let outcome = CREDIT_FORM.apply(&params, state.provider.credits());
    let response = FilterResponse::from_outcome(outcome);
    serde_json::to_string(&response).map_err(|_| ApiError::InternalError)
}
