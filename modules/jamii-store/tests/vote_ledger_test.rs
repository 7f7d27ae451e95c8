//! Integration tests for the vote ledger.
//!
//! Verifies that:
//! - A vote lands exactly once and bumps the denormalized count
//! - Duplicate votes fail with Conflict and change nothing
//! - 50 residents voting concurrently each land exactly once
//!
//! Requirements: Docker (for Postgres via testcontainers)
//!
//! Run with: cargo test -p jamii-store --features test-utils --test vote_ledger_test

#![cfg(feature = "test-utils")]

use futures::future::join_all;

use jamii_common::{JamiiError, NewReport, UserStatus};
use jamii_store::testutil::{postgres_container, seed_user};
use jamii_store::{ReportStore, VoteLedger};

async fn seed_report(pool: &sqlx::PgPool) -> i64 {
    let reporter = seed_user(pool, "Asha", UserStatus::Verified).await;
    ReportStore::new(pool.clone())
        .create(NewReport {
            user_id: reporter,
            title: "Broken streetlight".to_string(),
            description: "Dark corner near the market".to_string(),
            category: "security".to_string(),
            ward: "Kivukoni".to_string(),
            location_details: Some("junction by the bus stand".to_string()),
            image_path: None,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn vote_lands_once_and_bumps_count() {
    let (_pg, pool) = postgres_container().await;
    let ledger = VoteLedger::new(pool.clone());
    let store = ReportStore::new(pool.clone());
    let report = seed_report(&pool).await;
    let voter = seed_user(&pool, "Neema", UserStatus::Verified).await;

    ledger.cast_vote(voter, report).await.unwrap();

    assert_eq!(store.get(report).await.unwrap().vote_count, 1);
    assert_eq!(ledger.tally(report).await.unwrap(), 1);
    assert!(ledger.has_voted(voter, report).await.unwrap());
}

#[tokio::test]
async fn duplicate_vote_is_conflict_and_count_stays_put() {
    let (_pg, pool) = postgres_container().await;
    let ledger = VoteLedger::new(pool.clone());
    let store = ReportStore::new(pool.clone());
    let report = seed_report(&pool).await;
    let voter = seed_user(&pool, "Neema", UserStatus::Verified).await;

    ledger.cast_vote(voter, report).await.unwrap();
    let err = ledger.cast_vote(voter, report).await.unwrap_err();

    assert!(matches!(err, JamiiError::Conflict(_)));
    assert_eq!(store.get(report).await.unwrap().vote_count, 1);
    assert_eq!(ledger.tally(report).await.unwrap(), 1);
}

#[tokio::test]
async fn vote_requires_present_ids() {
    let (_pg, pool) = postgres_container().await;
    let ledger = VoteLedger::new(pool);

    let err = ledger.cast_vote(0, 1).await.unwrap_err();
    assert!(matches!(err, JamiiError::Validation(_)));
    let err = ledger.cast_vote(1, 0).await.unwrap_err();
    assert!(matches!(err, JamiiError::Validation(_)));
}

#[tokio::test]
async fn suspended_account_cannot_vote() {
    let (_pg, pool) = postgres_container().await;
    let ledger = VoteLedger::new(pool.clone());
    let report = seed_report(&pool).await;
    let suspended = seed_user(&pool, "Juma", UserStatus::Suspended).await;

    let err = ledger.cast_vote(suspended, report).await.unwrap_err();
    assert!(matches!(err, JamiiError::Forbidden(_)));
    assert_eq!(ledger.tally(report).await.unwrap(), 0);
}

#[tokio::test]
async fn unverified_account_cannot_vote() {
    let (_pg, pool) = postgres_container().await;
    let ledger = VoteLedger::new(pool.clone());
    let report = seed_report(&pool).await;
    let pending = seed_user(&pool, "Zawadi", UserStatus::Pending).await;

    let err = ledger.cast_vote(pending, report).await.unwrap_err();
    assert!(matches!(err, JamiiError::Forbidden(_)));
}

#[tokio::test]
async fn vote_on_missing_report_is_not_found() {
    let (_pg, pool) = postgres_container().await;
    let ledger = VoteLedger::new(pool.clone());
    let voter = seed_user(&pool, "Neema", UserStatus::Verified).await;

    let err = ledger.cast_vote(voter, 9999).await.unwrap_err();
    assert!(matches!(err, JamiiError::NotFound(_)));
}

#[tokio::test]
async fn fifty_concurrent_voters_each_land_exactly_once() {
    let (_pg, pool) = postgres_container().await;
    let store = ReportStore::new(pool.clone());
    let report = seed_report(&pool).await;

    let mut voters = Vec::new();
    for i in 0..50 {
        voters.push(seed_user(&pool, &format!("voter-{i}"), UserStatus::Verified).await);
    }

    let handles: Vec<_> = voters
        .into_iter()
        .map(|voter| {
            let ledger = VoteLedger::new(pool.clone());
            tokio::spawn(async move { ledger.cast_vote(voter, report).await })
        })
        .collect();

    for outcome in join_all(handles).await {
        outcome.unwrap().unwrap();
    }

    let ledger = VoteLedger::new(pool.clone());
    assert_eq!(store.get(report).await.unwrap().vote_count, 50);
    assert_eq!(ledger.tally(report).await.unwrap(), 50);
}

#[tokio::test]
async fn concurrent_duplicates_from_one_voter_land_once() {
    let (_pg, pool) = postgres_container().await;
    let store = ReportStore::new(pool.clone());
    let report = seed_report(&pool).await;
    let voter = seed_user(&pool, "Neema", UserStatus::Verified).await;

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let ledger = VoteLedger::new(pool.clone());
            tokio::spawn(async move { ledger.cast_vote(voter, report).await })
        })
        .collect();

    let mut wins = 0;
    let mut conflicts = 0;
    for outcome in join_all(handles).await {
        match outcome.unwrap() {
            Ok(()) => wins += 1,
            Err(JamiiError::Conflict(_)) => conflicts += 1,
            Err(e) => panic!("unexpected failure: {e}"),
        }
    }

    assert_eq!(wins, 1);
    assert_eq!(conflicts, 9);
    assert_eq!(store.get(report).await.unwrap().vote_count, 1);
}
