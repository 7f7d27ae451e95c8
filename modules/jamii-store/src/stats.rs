//! Read-side aggregation for dashboards. No mutation here; empty result
//! sets come back as empty collections.

use chrono::NaiveDate;
use sqlx::PgPool;

use jamii_common::Result;

/// Default window for the time-series aggregate, in days.
pub const DEFAULT_TIMESERIES_DAYS: u32 = 30;

/// One bucket of a grouped count (category, ward, or department).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionCount {
    pub label: String,
    pub count: i64,
}

/// Reports created on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}

pub async fn by_category(pool: &PgPool) -> Result<Vec<DimensionCount>> {
    grouped(pool, "category").await
}

pub async fn by_ward(pool: &PgPool) -> Result<Vec<DimensionCount>> {
    grouped(pool, "ward").await
}

pub async fn by_department(pool: &PgPool) -> Result<Vec<DimensionCount>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT assigned_department, COUNT(*)
        FROM reports
        WHERE assigned_department IS NOT NULL
        GROUP BY assigned_department
        ORDER BY COUNT(*) DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(label, count)| DimensionCount { label, count })
        .collect())
}

// `column` is always one of the fixed names above, never caller input.
async fn grouped(pool: &PgPool, column: &str) -> Result<Vec<DimensionCount>> {
    let rows = sqlx::query_as::<_, (String, i64)>(&format!(
        r#"
        SELECT {column}, COUNT(*)
        FROM reports
        GROUP BY {column}
        ORDER BY COUNT(*) DESC
        "#
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(label, count)| DimensionCount { label, count })
        .collect())
}

/// Daily report counts over a trailing window. The boundary is
/// `today − days`; callers that pass `None` get the 30-day default.
pub async fn over_time(pool: &PgPool, days: Option<u32>) -> Result<Vec<DailyCount>> {
    let days = days.unwrap_or(DEFAULT_TIMESERIES_DAYS);

    let rows = sqlx::query_as::<_, (NaiveDate, i64)>(
        r#"
        SELECT created_at::date AS day, COUNT(*)
        FROM reports
        WHERE created_at::date >= CURRENT_DATE - $1::int
        GROUP BY day
        ORDER BY day
        "#,
    )
    .bind(days as i32)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect())
}
