//! Tests for the conditional ledger updates.
//!
//! Confirm, dispute, edit, and delete are all single conditional updates
//! filtered on the current status, so the loser of a concurrent race matches
//! zero rows. A mock database stands in for Postgres and scripts how many
//! rows each statement matches; no running server or database is needed.
//!
//! Run with: `cargo test --test pending_window_test`
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use uuid::Uuid;

use siteledger_backend::db::contracts as contract_db;
use siteledger_backend::db::payments as payment_db;
use siteledger_backend::models::contracts::Status;
use siteledger_backend::models::payments::UpdatePayment;
use siteledger_backend::ApiError;

/// A connection whose next statement reports matching `rows` rows.
fn connection_matching(rows: u64) -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: rows,
        }])
        .into_connection()
}

#[tokio::test]
async fn test_confirm_succeeds_while_pending() {
    let db = connection_matching(1);

    let result = payment_db::confirm_payment(&db, Uuid::new_v4(), Uuid::new_v4()).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_confirm_race_loser_gets_invalid_state() {
    // The other device's confirm or dispute landed first: nothing matches.
    let db = connection_matching(0);

    let err = payment_db::confirm_payment(&db, Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidState(_)));
    assert_eq!(err.kind(), "invalid_state");
}

#[tokio::test]
async fn test_dispute_race_loser_gets_invalid_state() {
    let db = connection_matching(0);

    let err = payment_db::dispute_payment(&db, Uuid::new_v4(), "amount mismatch")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidState(_)));
}

#[tokio::test]
async fn test_update_after_acknowledgement_gets_invalid_state() {
    let db = connection_matching(0);
    let patch = UpdatePayment {
        amount: Some(Decimal::new(25000, 2)),
        payment_method: None,
        payment_date: None,
        notes: None,
        screenshot_url: None,
    };

    let err = payment_db::update_pending_payment(&db, Uuid::new_v4(), patch)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidState(_)));
}

#[tokio::test]
async fn test_delete_after_acknowledgement_gets_invalid_state() {
    let db = connection_matching(0);

    let err = payment_db::delete_pending_payment(&db, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidState(_)));
}

#[tokio::test]
async fn test_conclude_contract_succeeds_while_active() {
    let db = connection_matching(1);
    let end_date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();

    let result =
        contract_db::conclude_contract(&db, Uuid::new_v4(), Status::Completed, end_date).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_conclude_concluded_contract_gets_invalid_transition() {
    let db = connection_matching(0);
    let end_date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();

    let err = contract_db::conclude_contract(&db, Uuid::new_v4(), Status::Terminated, end_date)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidTransition(_)));
    assert_eq!(err.kind(), "invalid_transition");
}
