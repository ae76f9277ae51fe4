//! Senders JSON API endpoint

use axum::extract::{Query, State};
use std::collections::HashMap;

use crate::{ApiError, AppState, FilterResponse};
use nomsops_core::SENDER_FORM;

/// Filtered, ordered payment sources plus the active filter descriptions
pub async fn api_senders(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<String, ApiError> {
    let outcome = SENDER_FORM.apply(&params, state.provider.senders());
    let response = FilterResponse::from_outcome(outcome);
    serde_json::to_string(&response).map_err(|_| ApiError::InternalError)
}
