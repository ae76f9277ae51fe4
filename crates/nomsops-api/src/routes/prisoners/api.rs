//! Prisoners JSON API endpoint

use axum::extract::{Query, State};
use std::collections::HashMap;

use crate::{ApiError, AppState, FilterResponse};
use nomsops_core::PRISONER_FORM;

/// Filtered, ordered prisoners plus the active filter descriptions
pub async fn api_prisoners(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<String, ApiError> {
    let outcome = PRISONER_FORM.apply(&params, state.provider.prisoners());
    let response = FilterResponse::from_outcome(outcome);
    serde_json::to_string(&response).map_err(|_| ApiError::InternalError)
}
