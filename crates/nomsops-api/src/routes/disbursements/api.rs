//! Disbursements JSON API endpoint

use axum::extract::{Query, State};
use std::collections::HashMap;

use crate::{ApiError, AppState, FilterResponse};
use nomsops_core::DISBURSEMENT_FORM;

/// Filtered, ordered disbursements plus the active filter descriptions
pub async fn api_disbursements(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<String, ApiError> {
    let outcome = DISBURSEMENT_FORM.apply(&params, state.provider.disbursements());
    let response = FilterResponse::from_outcome(outcome);
    serde_json::to_string(&response).map_err(|_| ApiError::InternalError)
}
