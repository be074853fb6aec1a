//! Tests for the attribution & summary engine.
//!
//! The summary functions are pure computations over ledger snapshots, so no
//! database or running server is needed.
//!
//! Run with: `cargo test --test summary_test`
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use siteledger_backend::models::expenses::{self, Category, PaidBy};
use siteledger_backend::models::payments::{self, PaymentMethod, PaymentStatus};
use siteledger_backend::summary::{expense_summary, payment_summary};

fn dollars(amount: i64) -> Decimal {
    Decimal::new(amount * 100, 2)
}

fn expense(amount: i64, paid_by: PaidBy, category: Category) -> expenses::Model {
    expenses::Model {
        id: Uuid::new_v4(),
        project_id: Uuid::new_v4(),
        contract_id: None,
        amount: dollars(amount),
        vendor: None,
        date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
        category,
        description: None,
        paid_by,
        receipt_photo_url: None,
        added_by: Uuid::new_v4(),
        created_at: Utc::now(),
    }
}

fn payment(amount: i64, status: PaymentStatus) -> payments::Model {
    payments::Model {
        id: Uuid::new_v4(),
        project_id: Uuid::new_v4(),
        contract_id: Uuid::new_v4(),
        amount: dollars(amount),
        payment_method: PaymentMethod::BankTransfer,
        payment_date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
        notes: None,
        screenshot_url: None,
        status,
        dispute_reason: None,
        added_by: Uuid::new_v4(),
        confirmed_by: None,
        confirmed_at: None,
        disputed_at: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

#[test]
fn test_single_owner_expense() {
    let expenses = vec![expense(500, PaidBy::Owner, Category::Materials)];

    let summary = expense_summary(&expenses);

    assert_eq!(summary.total_spent, dollars(500));
    assert_eq!(summary.total_by_owner, dollars(500));
    assert_eq!(summary.total_by_contractor, Decimal::ZERO);
    assert_eq!(summary.by_category.get("materials"), Some(&dollars(500)));
}

#[test]
fn test_totals_are_additive_across_payer_sides() {
    let expenses = vec![
        expense(500, PaidBy::Owner, Category::Materials),
        expense(250, PaidBy::Contractor, Category::Labor),
        expense(125, PaidBy::Owner, Category::Equipment),
        expense(75, PaidBy::Contractor, Category::Other),
    ];

    let summary = expense_summary(&expenses);

    assert_eq!(
        summary.total_spent,
        summary.total_by_owner + summary.total_by_contractor
    );
    assert_eq!(summary.total_by_owner, dollars(625));
    assert_eq!(summary.total_by_contractor, dollars(325));
}

#[test]
fn test_category_breakdown_sums_per_category() {
    let expenses = vec![
        expense(100, PaidBy::Owner, Category::Materials),
        expense(200, PaidBy::Contractor, Category::Materials),
        expense(50, PaidBy::Owner, Category::Labor),
    ];

    let summary = expense_summary(&expenses);

    assert_eq!(summary.by_category.get("materials"), Some(&dollars(300)));
    assert_eq!(summary.by_category.get("labor"), Some(&dollars(50)));
    assert_eq!(summary.by_category.get("equipment"), None);
}

#[test]
fn test_empty_expense_set_is_all_zero() {
    let summary = expense_summary(&[]);

    assert_eq!(summary.total_spent, Decimal::ZERO);
    assert_eq!(summary.total_by_owner, Decimal::ZERO);
    assert_eq!(summary.total_by_contractor, Decimal::ZERO);
    assert!(summary.by_category.is_empty());
}

#[test]
fn test_fractional_amounts_accumulate_exactly() {
    // 0.10 + 0.20 must be exactly 0.30 — decimals, not floats.
    let mut a = expense(0, PaidBy::Owner, Category::Other);
    a.amount = Decimal::new(10, 2);
    let mut b = expense(0, PaidBy::Owner, Category::Other);
    b.amount = Decimal::new(20, 2);

    let summary = expense_summary(&[a, b]);

    assert_eq!(summary.total_spent, Decimal::new(30, 2));
}

#[test]
fn test_payment_summary_splits_by_status() {
    let payments = vec![
        payment(1000, PaymentStatus::Confirmed),
        payment(400, PaymentStatus::Pending),
        payment(600, PaymentStatus::Pending),
    ];

    let summary = payment_summary(&payments);

    assert_eq!(summary.total_confirmed, dollars(1000));
    assert_eq!(summary.total_pending, dollars(1000));
    assert_eq!(summary.total_disputed, Decimal::ZERO);
}

#[test]
fn test_disputed_amounts_excluded_from_confirmed_and_pending() {
    let payments = vec![
        payment(1000, PaymentStatus::Confirmed),
        payment(500, PaymentStatus::Disputed),
        payment(200, PaymentStatus::Pending),
    ];

    let summary = payment_summary(&payments);

    assert_eq!(summary.total_confirmed, dollars(1000));
    assert_eq!(summary.total_pending, dollars(200));
    assert_eq!(summary.total_disputed, dollars(500));
}
