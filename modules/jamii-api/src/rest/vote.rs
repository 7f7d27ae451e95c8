use std::sync::Arc;

use axum::{
    extract::{Json, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;

use super::error_response;

#[derive(Deserialize)]
pub struct VoteRequest {
    user_id: Option<i64>,
    report_id: Option<i64>,
}

pub async fn cast_vote(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VoteRequest>,
) -> Response {
    // Presence validation happens in the ledger; absent ids fail there.
    let user_id = body.user_id.unwrap_or(0);
    let report_id = body.report_id.unwrap_or(0);

    match state.ledger.cast_vote(user_id, report_id).await {
        Ok(()) => axum::Json(json!({ "message": "vote recorded" })).into_response(),
        Err(e) => error_response("cast vote", e),
    }
}
