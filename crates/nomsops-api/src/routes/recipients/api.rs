//! Recipients JSON API endpoint

use axum::extract::{Query, State};
use std::collections::HashMap;

use crate::{ApiError, AppState, FilterResponse};
use nomsops_core::RECIPIENT_FORM;

/// Filtered, ordered recipients plus the active filter descriptions
pub async fn api_recipients(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<String, ApiError> {
    let outcome = RECIPIENT_FORM.apply(&params, state.provider.recipients());
    let response = FilterResponse::from_outcome(outcome);
    serde_json::to_string(&response).map_err(|_| ApiError::InternalError)
}
