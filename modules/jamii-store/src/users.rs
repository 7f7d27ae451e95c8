//! Read-side access to resident accounts. The account service owns these
//! rows; this crate only consults the standing that gates actions.

use sqlx::PgPool;

use jamii_common::{JamiiError, Result, UserStatus};

/// Account standing for a resident, or `None` if the id is unknown.
pub async fn status_of(pool: &PgPool, user_id: i64) -> Result<Option<UserStatus>> {
    let raw = sqlx::query_scalar::<_, String>("SELECT status FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    match raw {
        None => Ok(None),
        Some(s) => UserStatus::parse(&s).map(Some).ok_or_else(|| {
            JamiiError::Database(sqlx::Error::Decode(
                format!("user {user_id} has unrecognized status {s:?}").into(),
            ))
        }),
    }
}
