//! Tests for the contract and payment state machines plus request-body
//! validation. Pure logic, no database or running server needed.
//!
//! Run with: `cargo test --test state_machine_test`
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use siteledger_backend::models::contracts::{CreateContract, Status};
use siteledger_backend::models::none_if_blank;
use siteledger_backend::models::payments::{
    CreatePayment, DisputePayment, PaymentMethod, PaymentStatus, UpdatePayment,
};
use siteledger_backend::ApiError;

#[test]
fn test_contract_transitions_leave_active_only() {
    assert!(Status::Active.can_transition_to(Status::Completed));
    assert!(Status::Active.can_transition_to(Status::Terminated));

    assert!(!Status::Active.can_transition_to(Status::Active));
    assert!(!Status::Active.can_transition_to(Status::Pending));
    assert!(!Status::Pending.can_transition_to(Status::Completed));
    assert!(!Status::Completed.can_transition_to(Status::Active));
    assert!(!Status::Completed.can_transition_to(Status::Terminated));
    assert!(!Status::Terminated.can_transition_to(Status::Completed));
}

#[test]
fn test_contract_terminal_states() {
    assert!(Status::Completed.is_terminal());
    assert!(Status::Terminated.is_terminal());
    assert!(!Status::Active.is_terminal());
    assert!(!Status::Pending.is_terminal());
}

#[test]
fn test_payment_transitions_leave_pending_only() {
    assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Confirmed));
    assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Disputed));

    assert!(!PaymentStatus::Pending.can_transition_to(PaymentStatus::Pending));
    assert!(!PaymentStatus::Confirmed.can_transition_to(PaymentStatus::Disputed));
    assert!(!PaymentStatus::Confirmed.can_transition_to(PaymentStatus::Pending));
    // Disputed is terminal: no un-dispute, no confirm-after-dispute.
    assert!(!PaymentStatus::Disputed.can_transition_to(PaymentStatus::Confirmed));
    assert!(!PaymentStatus::Disputed.can_transition_to(PaymentStatus::Pending));
}

#[test]
fn test_payment_terminal_states() {
    assert!(PaymentStatus::Confirmed.is_terminal());
    assert!(PaymentStatus::Disputed.is_terminal());
    assert!(!PaymentStatus::Pending.is_terminal());
}

fn create_payment(amount: Decimal) -> CreatePayment {
    CreatePayment {
        contract_id: Uuid::new_v4(),
        amount,
        payment_method: PaymentMethod::Zelle,
        payment_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        notes: None,
        screenshot_url: None,
    }
}

#[test]
fn test_payment_amount_must_be_positive() {
    assert!(create_payment(Decimal::new(100, 2)).validate().is_ok());

    let err = create_payment(Decimal::ZERO).validate().unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(err.kind(), "validation_error");

    assert!(create_payment(Decimal::new(-500, 2)).validate().is_err());
}

#[test]
fn test_payment_update_validates_amount_when_present() {
    let unchanged = UpdatePayment {
        amount: None,
        payment_method: None,
        payment_date: None,
        notes: Some("wired friday".into()),
        screenshot_url: None,
    };
    assert!(unchanged.validate().is_ok());

    let negative = UpdatePayment {
        amount: Some(Decimal::new(-1, 0)),
        ..unchanged
    };
    assert!(matches!(negative.validate(), Err(ApiError::Validation(_))));
}

#[test]
fn test_dispute_reason_must_not_be_blank() {
    let ok = DisputePayment {
        reason: "Amount does not match the invoice".into(),
    };
    assert!(ok.validate().is_ok());

    for reason in ["", "   ", "\n\t"] {
        let body = DisputePayment {
            reason: reason.into(),
        };
        assert!(
            matches!(body.validate(), Err(ApiError::Validation(_))),
            "blank reason {reason:?} should be rejected"
        );
    }
}

#[test]
fn test_empty_string_clears_optional_text_fields() {
    // Absent field = unchanged; empty string = clear.
    assert_eq!(none_if_blank(String::new()), None);
    assert_eq!(none_if_blank("   ".into()), None);
    assert_eq!(
        none_if_blank("Ace Hardware".into()),
        Some("Ace Hardware".to_string())
    );
}

#[test]
fn test_create_contract_body_deserializes_with_defaults() {
    let json = format!(
        r#"{{"project_id":"{}","contractor_id":"{}"}}"#,
        Uuid::new_v4(),
        Uuid::new_v4()
    );
    let body: CreateContract = serde_json::from_str(&json).unwrap();
    assert!(body.start_date.is_none());
    assert!(body.terms.is_none());
}
