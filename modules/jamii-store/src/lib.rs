pub mod reports;
pub mod stats;
pub mod users;
pub mod votes;

#[cfg(feature = "test-utils")]
pub mod testutil;

use sqlx::PgPool;
use tracing::info;

use jamii_common::Result;

pub use reports::ReportStore;
pub use stats::{DailyCount, DimensionCount};
pub use votes::VoteLedger;

/// Run the embedded SQL migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    info!("Applying report store migrations");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| jamii_common::JamiiError::Database(e.into()))?;
    Ok(())
}
