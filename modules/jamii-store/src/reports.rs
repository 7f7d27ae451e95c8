//! Postgres persistence for report records.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use jamii_common::lifecycle::{self, Actor};
use jamii_common::{JamiiError, NewReport, Report, ReportCategory, ReportStatus, Result, UserStatus};

use crate::users;

/// A row from `reports`, joined with the reporter's display name.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ReportRow {
    id: i64,
    user_id: i64,
    reporter_name: String,
    title: String,
    description: String,
    category: String,
    ward: String,
    location_details: Option<String>,
    image_path: Option<String>,
    status: String,
    is_urgent: bool,
    assigned_department: Option<String>,
    proof_image: Option<String>,
    admin_notes: Option<String>,
    vote_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

const REPORT_COLUMNS: &str = r#"
    r.id, r.user_id, u.name AS reporter_name, r.title, r.description,
    r.category, r.ward, r.location_details, r.image_path, r.status,
    r.is_urgent, r.assigned_department, r.proof_image, r.admin_notes,
    r.vote_count, r.created_at, r.updated_at
"#;

fn row_to_report(row: ReportRow) -> Result<Report> {
    // Stored values outside the vocabulary mean the write path was bypassed;
    // surface that as a store fault instead of inventing a state.
    let category = ReportCategory::parse(&row.category).ok_or_else(|| {
        JamiiError::Database(sqlx::Error::Decode(
            format!("report {} has unrecognized category {:?}", row.id, row.category).into(),
        ))
    })?;
    let status = ReportStatus::parse(&row.status).ok_or_else(|| {
        JamiiError::Database(sqlx::Error::Decode(
            format!("report {} has unrecognized status {:?}", row.id, row.status).into(),
        ))
    })?;

    Ok(Report {
        id: row.id,
        user_id: row.user_id,
        reporter_name: row.reporter_name,
        title: row.title,
        description: row.description,
        category,
        ward: row.ward,
        location_details: row.location_details,
        image_path: row.image_path,
        status,
        is_urgent: row.is_urgent,
        assigned_department: row.assigned_department,
        proof_image: row.proof_image,
        admin_notes: row.admin_notes,
        vote_count: row.vote_count,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Drop optional free-text values that are empty after trimming.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Clone)]
pub struct ReportStore {
    pool: PgPool,
}

impl ReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new report. Validates required fields, rejects suspended
    /// accounts, and initializes `status = pending`, `vote_count = 0`.
    /// Returns the generated id.
    pub async fn create(&self, new: NewReport) -> Result<i64> {
        let category = new.validate()?;

        match users::status_of(&self.pool, new.user_id).await? {
            None => return Err(JamiiError::not_found(format!("user {} not found", new.user_id))),
            Some(UserStatus::Suspended) => {
                return Err(JamiiError::Forbidden(
                    "account suspended, cannot submit reports".to_string(),
                ))
            }
            Some(_) => {}
        }

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO reports
                (user_id, title, description, category, ward, location_details, image_path)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(new.user_id)
        .bind(new.title.trim())
        .bind(new.description.trim())
        .bind(category.to_string())
        .bind(new.ward.trim())
        .bind(non_empty(new.location_details))
        .bind(non_empty(new.image_path))
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Fetch one report with the reporter's display name joined.
    pub async fn get(&self, id: i64) -> Result<Report> {
        let row = sqlx::query_as::<_, ReportRow>(&format!(
            r#"
            SELECT {REPORT_COLUMNS}
            FROM reports r
            JOIN users u ON u.id = r.user_id
            WHERE r.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| JamiiError::not_found(format!("report {id} not found")))?;

        row_to_report(row)
    }

    /// All reports, newest first. Dashboards rely on most-recent-first order.
    pub async fn list(&self) -> Result<Vec<Report>> {
        let rows = sqlx::query_as::<_, ReportRow>(&format!(
            r#"
            SELECT {REPORT_COLUMNS}
            FROM reports r
            JOIN users u ON u.id = r.user_id
            ORDER BY r.created_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_report).collect()
    }

    /// Reports assigned to one department, newest first. An empty result is
    /// a normal outcome, not an error.
    pub async fn list_by_department(&self, department: &str) -> Result<Vec<Report>> {
        if department.trim().is_empty() {
            return Err(JamiiError::validation("department is required"));
        }

        let rows = sqlx::query_as::<_, ReportRow>(&format!(
            r#"
            SELECT {REPORT_COLUMNS}
            FROM reports r
            JOIN users u ON u.id = r.user_id
            WHERE r.assigned_department = $1
            ORDER BY r.created_at DESC
            "#
        ))
        .bind(department.trim())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_report).collect()
    }

    /// Admin triage transition. The target may be any lifecycle status.
    /// `is_urgent` defaults to false when the caller does not send it — that
    /// matches the existing wire contract, where omitting the flag clears it.
    pub async fn update_status(
        &self,
        id: i64,
        target: ReportStatus,
        is_urgent: Option<bool>,
    ) -> Result<()> {
        lifecycle::authorize_transition(Actor::Admin, target)?;

        let result = sqlx::query(
            r#"
            UPDATE reports
            SET status = $2, is_urgent = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(target.to_string())
        .bind(is_urgent.unwrap_or(false))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(JamiiError::not_found(format!("report {id} not found")));
        }
        Ok(())
    }

    /// Department-scoped transition. Only `in_progress` and
    /// `awaiting_verification` pass the guard. Proof image and notes are
    /// persisted alongside the status when supplied non-empty, untouched
    /// otherwise.
    pub async fn update_department_status(
        &self,
        id: i64,
        target: ReportStatus,
        proof_image: Option<String>,
        admin_notes: Option<String>,
    ) -> Result<()> {
        lifecycle::authorize_transition(Actor::Department, target)?;

        let result = sqlx::query(
            r#"
            UPDATE reports
            SET status = $2,
                proof_image = COALESCE($3, proof_image),
                admin_notes = COALESCE($4, admin_notes),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(target.to_string())
        .bind(non_empty(proof_image))
        .bind(non_empty(admin_notes))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(JamiiError::not_found(format!("report {id} not found")));
        }
        Ok(())
    }

    /// Route a report to the department responsible for resolving it.
    pub async fn assign_department(&self, id: i64, department: &str) -> Result<()> {
        if department.trim().is_empty() {
            return Err(JamiiError::validation("department is required"));
        }

        let result = sqlx::query(
            r#"
            UPDATE reports
            SET assigned_department = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(department.trim())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(JamiiError::not_found(format!("report {id} not found")));
        }
        Ok(())
    }
}
