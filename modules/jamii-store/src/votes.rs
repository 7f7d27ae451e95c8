//! The vote ledger: at most one vote per resident per report, with the
//! denormalized `vote_count` kept in lockstep.

use sqlx::PgPool;

use jamii_common::{JamiiError, Result, UserStatus};

use crate::users;

// Postgres SQLSTATE codes surfaced as typed failures.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

fn sqlstate(e: &sqlx::Error) -> Option<String> {
    e.as_database_error()
        .and_then(|db| db.code())
        .map(|c| c.into_owned())
}

#[derive(Clone)]
pub struct VoteLedger {
    pool: PgPool,
}

impl VoteLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record one vote for (`user_id`, `report_id`).
    ///
    /// The ledger insert and the `vote_count` increment commit in a single
    /// transaction, so a crash between the two writes cannot strand either
    /// side. Concurrent duplicates race on the composite primary key; the
    /// loser surfaces as `Conflict` with no state change. The increment runs
    /// in SQL, never as an application-level read-modify-write.
    pub async fn cast_vote(&self, user_id: i64, report_id: i64) -> Result<()> {
        if user_id <= 0 || report_id <= 0 {
            return Err(JamiiError::validation("user_id and report_id are required"));
        }

        match users::status_of(&self.pool, user_id).await? {
            None => return Err(JamiiError::not_found(format!("user {user_id} not found"))),
            Some(UserStatus::Verified) => {}
            Some(UserStatus::Suspended) => {
                return Err(JamiiError::Forbidden(
                    "account suspended, cannot vote".to_string(),
                ))
            }
            Some(UserStatus::Pending) => {
                return Err(JamiiError::Forbidden(
                    "account not verified, cannot vote".to_string(),
                ))
            }
        }

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query("INSERT INTO votes (user_id, report_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(report_id)
            .execute(&mut *tx)
            .await;

        // Dropping the open transaction on the error paths rolls it back.
        if let Err(e) = inserted {
            return match sqlstate(&e).as_deref() {
                Some(UNIQUE_VIOLATION) => Err(JamiiError::Conflict("already voted".to_string())),
                Some(FOREIGN_KEY_VIOLATION) => {
                    Err(JamiiError::not_found(format!("report {report_id} not found")))
                }
                _ => Err(e.into()),
            };
        }

        sqlx::query("UPDATE reports SET vote_count = vote_count + 1 WHERE id = $1")
            .bind(report_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Whether this resident already voted on the report. Read-only; the
    /// dashboard uses it to disable the vote button.
    pub async fn has_voted(&self, user_id: i64, report_id: i64) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM votes WHERE user_id = $1 AND report_id = $2",
        )
        .bind(user_id)
        .bind(report_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Ledger cardinality for one report — the authoritative vote count that
    /// `reports.vote_count` denormalizes.
    pub async fn tally(&self, report_id: i64) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM votes WHERE report_id = $1")
                .bind(report_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
