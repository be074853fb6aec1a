//! Access Policy Guard.
//!
//! Every mutating ledger operation consults `can_perform` before touching
//! storage. The capability table lives here and nowhere else; handlers and
//! clients may call it to decide what to render, but only this module
//! decides what is allowed.

use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::db::contracts as contract_db;
use crate::db::projects as project_db;
use crate::error::ApiError;
use crate::models::contracts;
use crate::models::expenses::PaidBy;
use crate::models::projects;
use crate::models::users::{self, UserType};

/// A ledger operation subject to the capability table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    CreateExpense,
    EditExpense,
    DeleteExpense,
    CreatePayment,
    ConfirmPayment,
    DisputePayment,
    EditPayment,
    DeletePayment,
}

/// The authenticated actor, reduced to what the guard needs.
#[derive(Debug, Copy, Clone)]
pub struct Actor {
    pub id: Uuid,
    pub user_type: UserType,
}

impl From<&users::Model> for Actor {
    fn from(user: &users::Model) -> Self {
        Actor {
            id: user.id,
            user_type: user.user_type,
        }
    }
}

/// Everything about the target resource the capability table depends on.
/// Built by handlers from loaded rows so the check itself stays pure.
#[derive(Debug, Copy, Clone)]
pub struct ResourceContext {
    pub project_owner_id: Uuid,
    /// Whether the actor holds a contract on the project.
    pub actor_is_project_contractor: bool,
    pub contract_owner_id: Option<Uuid>,
    pub contract_contractor_id: Option<Uuid>,
    /// Creator of the expense/payment being edited or deleted.
    pub record_added_by: Option<Uuid>,
}

impl ResourceContext {
    pub fn project(project_owner_id: Uuid) -> Self {
        ResourceContext {
            project_owner_id,
            actor_is_project_contractor: false,
            contract_owner_id: None,
            contract_contractor_id: None,
            record_added_by: None,
        }
    }

    pub fn with_contract(mut self, contract: &contracts::Model) -> Self {
        self.contract_owner_id = Some(contract.owner_id);
        self.contract_contractor_id = Some(contract.contractor_id);
        self
    }

    pub fn with_membership(mut self, is_project_contractor: bool) -> Self {
        self.actor_is_project_contractor = is_project_contractor;
        self
    }

    pub fn with_record(mut self, added_by: Uuid) -> Self {
        self.record_added_by = Some(added_by);
        self
    }
}

/// The capability table.
///
/// Owners record expenses and payments on their own projects and may edit
/// any expense there; contractors record their own expenses and acknowledge
/// payments on their own contracts; employees mutate nothing.
pub fn can_perform(actor: Actor, action: Action, resource: &ResourceContext) -> bool {
    if actor.user_type == UserType::Employee {
        return false;
    }

    let is_project_owner = actor.id == resource.project_owner_id;

    match action {
        Action::CreateExpense => match actor.user_type {
            UserType::HouseOwner => is_project_owner,
            UserType::Contractor => resource.actor_is_project_contractor,
            UserType::Employee => false,
        },
        // Creator always; the project owner may also touch any expense on
        // their project.
        Action::EditExpense | Action::DeleteExpense => {
            resource.record_added_by == Some(actor.id) || is_project_owner
        }
        Action::CreatePayment => resource.contract_owner_id == Some(actor.id),
        Action::ConfirmPayment | Action::DisputePayment => {
            resource.contract_contractor_id == Some(actor.id)
        }
        // Only the owner who recorded a payment may edit or remove it, and
        // the pending-window check happens separately as an InvalidState.
        Action::EditPayment | Action::DeletePayment => {
            resource.record_added_by == Some(actor.id)
        }
    }
}

/// Run the capability check and surface a `ForbiddenError` on denial.
pub fn require(actor: Actor, action: Action, resource: &ResourceContext) -> Result<(), ApiError> {
    if can_perform(actor, action, resource) {
        Ok(())
    } else {
        let message = match action {
            Action::CreateExpense => "You cannot add expenses to this project",
            Action::EditExpense => "Only the creator or project owner can update this expense",
            Action::DeleteExpense => "Only the creator or project owner can delete this expense",
            Action::CreatePayment => "Only the contract's owner can record payments",
            Action::ConfirmPayment => "Only the contract's contractor can confirm this payment",
            Action::DisputePayment => "Only the contract's contractor can dispute this payment",
            Action::EditPayment => "Only the owner who recorded this payment can update it",
            Action::DeletePayment => "Only the owner who recorded this payment can delete it",
        };
        Err(ApiError::Forbidden(message.into()))
    }
}

// ── Async loaders shared by handlers ──

/// Fetch a project or fail with `NotFoundError`.
pub async fn load_project(
    db: &DatabaseConnection,
    project_id: Uuid,
) -> Result<projects::Model, ApiError> {
    project_db::get_project_by_id(db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project {project_id} not found")))
}

/// Fetch a contract or fail with `NotFoundError`.
pub async fn load_contract(
    db: &DatabaseConnection,
    contract_id: Uuid,
) -> Result<contracts::Model, ApiError> {
    contract_db::get_contract_by_id(db, contract_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Contract {contract_id} not found")))
}

/// Which side of the project the actor is on, if any.
///
/// The project owner is the owner side; a contractor-type user holding a
/// contract on the project is the contractor side. This doubles as the
/// derivation of `paid_by` for new expenses.
pub async fn project_party(
    db: &DatabaseConnection,
    project: &projects::Model,
    user: &users::Model,
) -> Result<Option<PaidBy>, ApiError> {
    if project.owner_id == user.id {
        return Ok(Some(PaidBy::Owner));
    }
    if user.user_type == UserType::Contractor
        && contract_db::is_project_contractor(db, project.id, user.id).await?
    {
        return Ok(Some(PaidBy::Contractor));
    }
    Ok(None)
}

/// Read access to a project's ledgers: parties only.
pub async fn require_project_party(
    db: &DatabaseConnection,
    project: &projects::Model,
    user: &users::Model,
) -> Result<PaidBy, ApiError> {
    project_party(db, project, user)
        .await?
        .ok_or_else(|| ApiError::Forbidden("You do not have access to this project".into()))
}
