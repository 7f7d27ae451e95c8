pub mod transitions;
pub mod vote;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use jamii_common::{JamiiError, NewReport, Report};
use jamii_store::stats;

use crate::AppState;

pub use transitions::{assign_department, update_department_status, update_status};
pub use vote::cast_vote;

// --- Request structs ---

#[derive(Deserialize)]
pub struct CreateReportRequest {
    user_id: Option<i64>,
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    ward: Option<String>,
    location_details: Option<String>,
    image_path: Option<String>,
}

/// Department filter, accepted both as query string and JSON body.
#[derive(Deserialize)]
pub struct DepartmentParams {
    department: Option<String>,
}

#[derive(Deserialize)]
pub struct TimeseriesQuery {
    days: Option<u32>,
}

// --- Helpers ---

/// Translate the error taxonomy into the HTTP contract. Duplicate votes fold
/// into 400 on the wire even though the core keeps them distinct.
pub(crate) fn error_response(context: &'static str, e: JamiiError) -> Response {
    let (code, message) = match &e {
        JamiiError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
        JamiiError::Conflict(m) => (StatusCode::BAD_REQUEST, m.clone()),
        JamiiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
        JamiiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
        JamiiError::Database(_) => {
            warn!(error = %e, context, "Store operation failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "unable to reach the report store".to_string(),
            )
        }
    };
    (code, Json(json!({ "message": message }))).into_response()
}

/// The legacy dashboard treats an empty report table as 404, not an empty
/// list. Preserved for compatibility.
fn list_response(reports: Vec<Report>) -> Response {
    if reports.is_empty() {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "no reports found" })),
        )
            .into_response()
    } else {
        Json(json!({ "reports": reports })).into_response()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsDimension {
    Category,
    Ward,
    Department,
}

impl StatsDimension {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "category" => Some(Self::Category),
            "ward" => Some(Self::Ward),
            "department" => Some(Self::Department),
            _ => None,
        }
    }

    /// JSON key the dashboard expects for this dimension's label.
    pub fn key(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Ward => "ward",
            Self::Department => "department",
        }
    }
}

// --- Handlers ---

pub async fn create_report(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateReportRequest>,
) -> Response {
    let new = NewReport {
        user_id: body.user_id.unwrap_or(0),
        title: body.title.unwrap_or_default(),
        description: body.description.unwrap_or_default(),
        category: body.category.unwrap_or_default(),
        ward: body.ward.unwrap_or_default(),
        location_details: body.location_details,
        image_path: body.image_path,
    };

    match state.store.create(new).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(json!({ "message": "report submitted", "report_id": id })),
        )
            .into_response(),
        Err(e) => error_response("create report", e),
    }
}

pub async fn list_reports(State(state): State<Arc<AppState>>) -> Response {
    match state.store.list().await {
        Ok(reports) => list_response(reports),
        Err(e) => error_response("list reports", e),
    }
}

pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let id = match id.parse::<i64>() {
        Ok(n) => n,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };

    match state.store.get(id).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => error_response("load report", e),
    }
}

pub async fn department_reports(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DepartmentParams>,
) -> Response {
    department_inner(state, params.department).await
}

pub async fn department_reports_body(
    State(state): State<Arc<AppState>>,
    Json(params): Json<DepartmentParams>,
) -> Response {
    department_inner(state, params.department).await
}

async fn department_inner(state: Arc<AppState>, department: Option<String>) -> Response {
    let department = department.unwrap_or_default();
    match state.store.list_by_department(&department).await {
        Ok(reports) => {
            let count = reports.len();
            Json(json!({ "success": true, "reports": reports, "count": count })).into_response()
        }
        Err(e) => error_response("list department reports", e),
    }
}

pub async fn stats_by_dimension(
    State(state): State<Arc<AppState>>,
    Path(dimension): Path<String>,
) -> Response {
    let dimension = match StatsDimension::parse(&dimension) {
        Some(d) => d,
        None => {
            return error_response(
                "aggregate reports",
                JamiiError::validation(format!("unrecognized stats dimension: {dimension}")),
            )
        }
    };

    let counts = match dimension {
        StatsDimension::Category => stats::by_category(&state.pool).await,
        StatsDimension::Ward => stats::by_ward(&state.pool).await,
        StatsDimension::Department => stats::by_department(&state.pool).await,
    };

    match counts {
        Ok(counts) => {
            let rows: Vec<serde_json::Value> = counts
                .iter()
                .map(|c| json!({ dimension.key(): c.label, "count": c.count }))
                .collect();
            Json(rows).into_response()
        }
        Err(e) => error_response("aggregate reports", e),
    }
}

pub async fn stats_timeseries(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TimeseriesQuery>,
) -> Response {
    match stats::over_time(&state.pool, params.days).await {
        Ok(days) => {
            let rows: Vec<serde_json::Value> = days
                .iter()
                .map(|d| json!({ "date": d.date, "count": d.count }))
                .collect();
            Json(rows).into_response()
        }
        Err(e) => error_response("aggregate reports over time", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jamii_common::{ReportCategory, ReportStatus};

    fn sample_report() -> Report {
        Report {
            id: 1,
            user_id: 1,
            reporter_name: "Asha".to_string(),
            title: "Broken pipe".to_string(),
            description: "Leaking for days".to_string(),
            category: ReportCategory::Health,
            ward: "Lindi".to_string(),
            location_details: None,
            image_path: None,
            status: ReportStatus::Pending,
            is_urgent: false,
            assigned_department: None,
            proof_image: None,
            admin_notes: None,
            vote_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    // --- dimension parsing ---

    #[test]
    fn dimension_parses_known_values() {
        assert_eq!(StatsDimension::parse("category"), Some(StatsDimension::Category));
        assert_eq!(StatsDimension::parse("ward"), Some(StatsDimension::Ward));
        assert_eq!(StatsDimension::parse("department"), Some(StatsDimension::Department));
    }

    #[test]
    fn dimension_rejects_unknown_values() {
        assert_eq!(StatsDimension::parse("status"), None);
        assert_eq!(StatsDimension::parse(""), None);
    }

    // --- error mapping ---

    #[test]
    fn validation_maps_to_400() {
        let resp = error_response("test", JamiiError::validation("incomplete report data"));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn duplicate_vote_maps_to_400_on_the_wire() {
        let resp = error_response("test", JamiiError::Conflict("already voted".to_string()));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn forbidden_maps_to_403() {
        let resp = error_response(
            "test",
            JamiiError::Forbidden("account suspended, cannot vote".to_string()),
        );
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn not_found_maps_to_404() {
        let resp = error_response("test", JamiiError::not_found("report 42 not found"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_failure_maps_to_503() {
        let resp = error_response("test", JamiiError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    // --- list quirk ---

    #[test]
    fn empty_report_list_is_404() {
        let resp = list_response(Vec::new());
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn populated_report_list_is_200() {
        let resp = list_response(vec![sample_report()]);
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn report_serializes_with_wire_status() {
        let value = serde_json::to_value(sample_report()).unwrap();
        assert_eq!(value["status"], "pending");
        assert_eq!(value["category"], "health");
        assert_eq!(value["vote_count"], 0);
    }
}
