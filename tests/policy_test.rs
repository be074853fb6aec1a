//! Tests for the access policy guard.
//!
//! `can_perform` is a pure function over the actor and resource context, so
//! the whole capability table can be exercised without a database.
//!
//! Run with: `cargo test --test policy_test`
use uuid::Uuid;

use siteledger_backend::models::users::UserType;
use siteledger_backend::policy::{can_perform, require, Action, Actor, ResourceContext};
use siteledger_backend::ApiError;

fn owner(id: Uuid) -> Actor {
    Actor {
        id,
        user_type: UserType::HouseOwner,
    }
}

fn contractor(id: Uuid) -> Actor {
    Actor {
        id,
        user_type: UserType::Contractor,
    }
}

fn employee(id: Uuid) -> Actor {
    Actor {
        id,
        user_type: UserType::Employee,
    }
}

#[test]
fn test_employee_can_do_nothing() {
    let actor_id = Uuid::new_v4();
    // Even with every grant in the context pointing at the employee.
    let resource = ResourceContext::project(actor_id)
        .with_membership(true)
        .with_record(actor_id);
    let actions = [
        Action::CreateExpense,
        Action::EditExpense,
        Action::DeleteExpense,
        Action::CreatePayment,
        Action::ConfirmPayment,
        Action::DisputePayment,
        Action::EditPayment,
        Action::DeletePayment,
    ];

    for action in actions {
        assert!(
            !can_perform(employee(actor_id), action, &resource),
            "employee should be denied {action:?}"
        );
    }
}

#[test]
fn test_project_owner_can_add_expense_only_to_own_project() {
    let owner_id = Uuid::new_v4();
    let own_project = ResourceContext::project(owner_id);
    let other_project = ResourceContext::project(Uuid::new_v4());

    assert!(can_perform(owner(owner_id), Action::CreateExpense, &own_project));
    assert!(!can_perform(owner(owner_id), Action::CreateExpense, &other_project));
}

#[test]
fn test_contractor_needs_a_contract_to_add_expense() {
    let contractor_id = Uuid::new_v4();
    let project_owner = Uuid::new_v4();

    let with_contract = ResourceContext::project(project_owner).with_membership(true);
    let without_contract = ResourceContext::project(project_owner);

    assert!(can_perform(contractor(contractor_id), Action::CreateExpense, &with_contract));
    assert!(!can_perform(contractor(contractor_id), Action::CreateExpense, &without_contract));
}

#[test]
fn test_expense_edit_is_creator_or_project_owner() {
    let owner_id = Uuid::new_v4();
    let contractor_id = Uuid::new_v4();
    let stranger_id = Uuid::new_v4();

    // Expense recorded by the contractor on the owner's project.
    let resource = ResourceContext::project(owner_id)
        .with_membership(true)
        .with_record(contractor_id);

    assert!(can_perform(contractor(contractor_id), Action::EditExpense, &resource));
    assert!(can_perform(owner(owner_id), Action::EditExpense, &resource));
    assert!(!can_perform(contractor(stranger_id), Action::DeleteExpense, &resource));
}

#[test]
fn test_only_contract_owner_records_payments() {
    let owner_id = Uuid::new_v4();
    let contractor_id = Uuid::new_v4();
    let resource = ResourceContext {
        project_owner_id: owner_id,
        actor_is_project_contractor: false,
        contract_owner_id: Some(owner_id),
        contract_contractor_id: Some(contractor_id),
        record_added_by: None,
    };

    assert!(can_perform(owner(owner_id), Action::CreatePayment, &resource));
    assert!(!can_perform(contractor(contractor_id), Action::CreatePayment, &resource));
    assert!(!can_perform(owner(Uuid::new_v4()), Action::CreatePayment, &resource));
}

#[test]
fn test_only_contract_contractor_acknowledges_payments() {
    let owner_id = Uuid::new_v4();
    let contractor_id = Uuid::new_v4();
    let resource = ResourceContext {
        project_owner_id: owner_id,
        actor_is_project_contractor: false,
        contract_owner_id: Some(owner_id),
        contract_contractor_id: Some(contractor_id),
        record_added_by: Some(owner_id),
    };

    assert!(can_perform(contractor(contractor_id), Action::ConfirmPayment, &resource));
    assert!(can_perform(contractor(contractor_id), Action::DisputePayment, &resource));
    // The paying owner cannot acknowledge their own payment.
    assert!(!can_perform(owner(owner_id), Action::ConfirmPayment, &resource));
    // Neither can a contractor from a different contract.
    assert!(!can_perform(contractor(Uuid::new_v4()), Action::DisputePayment, &resource));
}

#[test]
fn test_payment_edit_and_delete_are_creator_only() {
    let owner_id = Uuid::new_v4();
    let other_owner_id = Uuid::new_v4();
    let resource = ResourceContext {
        project_owner_id: owner_id,
        actor_is_project_contractor: false,
        contract_owner_id: Some(owner_id),
        contract_contractor_id: Some(Uuid::new_v4()),
        record_added_by: Some(owner_id),
    };

    assert!(can_perform(owner(owner_id), Action::EditPayment, &resource));
    assert!(can_perform(owner(owner_id), Action::DeletePayment, &resource));
    assert!(!can_perform(owner(other_owner_id), Action::EditPayment, &resource));
    assert!(!can_perform(owner(other_owner_id), Action::DeletePayment, &resource));
}

#[test]
fn test_require_surfaces_forbidden() {
    let resource = ResourceContext::project(Uuid::new_v4());
    let actor = contractor(Uuid::new_v4());

    let err = require(actor, Action::CreateExpense, &resource).unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
    assert_eq!(err.kind(), "forbidden");

    let granted = ResourceContext::project(actor.id);
    assert!(require(owner(actor.id), Action::CreateExpense, &granted).is_ok());
}
