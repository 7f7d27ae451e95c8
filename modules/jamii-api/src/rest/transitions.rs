//! Status transition endpoints: broad admin triage, the narrower
//! department-scoped update, and department assignment.

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use jamii_common::lifecycle::{parse_transition, Actor};
use jamii_common::JamiiError;

use crate::AppState;

use super::error_response;

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    id: Option<i64>,
    status: Option<String>,
    is_urgent: Option<bool>,
}

#[derive(Deserialize)]
pub struct DepartmentStatusRequest {
    id: Option<i64>,
    status: Option<String>,
    proof_image: Option<String>,
    admin_notes: Option<String>,
}

#[derive(Deserialize)]
pub struct AssignRequest {
    id: Option<i64>,
    department: Option<String>,
}

fn require_id_and_status(id: Option<i64>, status: &Option<String>) -> Result<i64, JamiiError> {
    match (id, status) {
        (Some(id), Some(s)) if id > 0 && !s.trim().is_empty() => Ok(id),
        _ => Err(JamiiError::validation("id and status are required")),
    }
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UpdateStatusRequest>,
) -> Response {
    let id = match require_id_and_status(body.id, &body.status) {
        Ok(id) => id,
        Err(e) => return error_response("update report status", e),
    };
    let target = match parse_transition(Actor::Admin, body.status.as_deref().unwrap_or_default()) {
        Ok(t) => t,
        Err(e) => return error_response("update report status", e),
    };

    match state.store.update_status(id, target, body.is_urgent).await {
        Ok(()) => axum::Json(json!({ "message": "report status updated" })).into_response(),
        Err(e) => error_response("update report status", e),
    }
}

pub async fn update_department_status(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DepartmentStatusRequest>,
) -> Response {
    let id = match require_id_and_status(body.id, &body.status) {
        Ok(id) => id,
        Err(e) => return error_response("update department status", e),
    };
    let target = match parse_transition(Actor::Department, body.status.as_deref().unwrap_or_default())
    {
        Ok(t) => t,
        Err(e) => return error_response("update department status", e),
    };

    match state
        .store
        .update_department_status(id, target, body.proof_image, body.admin_notes)
        .await
    {
        Ok(()) => axum::Json(json!({
            "message": "report status updated",
            "status": target.to_string(),
        }))
        .into_response(),
        Err(e) => error_response("update department status", e),
    }
}

pub async fn assign_department(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AssignRequest>,
) -> Response {
    let id = body.id.unwrap_or(0);
    if id <= 0 {
        return error_response(
            "assign department",
            JamiiError::validation("id and department are required"),
        );
    }

    let department = body.department.unwrap_or_default();
    match state.store.assign_department(id, &department).await {
        Ok(()) => axum::Json(json!({ "message": "report assigned" })).into_response(),
        Err(e) => error_response("assign department", e),
    }
}
