use actix_web::{HttpResponse, web};
use sea_orm::{ActiveEnum, DatabaseConnection};
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::contracts as contract_db;
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::models::contracts::{CreateContract, UpdateContractStatus};
use crate::models::users::UserType;
use crate::policy;

/// POST /api/contracts — the project owner assigns a contractor.
///
/// The owner side is always the authenticated actor; at most one active
/// contract may exist per (project, contractor) pair.
pub async fn create_contract(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateContract>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();

    // 1. The project must exist and the actor must be its owner.
    let project = policy::load_project(db.get_ref(), input.project_id).await?;
    if project.owner_id != user.0.id || user.0.user_type != UserType::HouseOwner {
        return Err(ApiError::Forbidden(
            "Only the project owner can assign a contractor".into(),
        ));
    }

    // 2. The assignee must be a contractor-type user.
    let contractor = user_db::get_user_by_id(db.get_ref(), input.contractor_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", input.contractor_id)))?;
    if contractor.user_type != UserType::Contractor {
        return Err(ApiError::Validation(format!(
            "User {} is not a contractor",
            contractor.id
        )));
    }

    // 3. Reject a second active contract for the same pair.
    if contract_db::find_active_contract(db.get_ref(), input.project_id, input.contractor_id)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "An active contract already exists for this contractor on this project".into(),
        ));
    }

    // 4. Create the contract.
    let contract = contract_db::insert_contract(db.get_ref(), input, project.owner_id).await?;
    Ok(HttpResponse::Created().json(contract))
}

/// GET /api/contracts/{id} — parties only.
pub async fn get_contract(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let contract = policy::load_contract(db.get_ref(), path.into_inner()).await?;

    if !contract.is_party(user.0.id) {
        return Err(ApiError::Forbidden(
            "You can only view contracts you are involved in".into(),
        ));
    }

    Ok(HttpResponse::Ok().json(contract))
}

/// PUT /api/contracts/{id}/status — the owner concludes a contract.
///
/// Only active → completed and active → terminated are legal, and both
/// require an end date. The update is conditional on the row still being
/// active, so a concluded contract can never be concluded twice.
pub async fn update_status(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateContractStatus>,
) -> Result<HttpResponse, ApiError> {
    let contract_id = path.into_inner();
    let input = body.into_inner();

    // 1. Fetch the contract and verify the actor is the owner side.
    let contract = policy::load_contract(db.get_ref(), contract_id).await?;
    if contract.owner_id != user.0.id {
        return Err(ApiError::Forbidden(
            "Only the project owner can change a contract's status".into(),
        ));
    }

    // 2. Check the transition against the state machine.
    if !contract.status.can_transition_to(input.status) {
        return Err(ApiError::InvalidTransition(format!(
            "Cannot move a contract from '{}' to '{}'",
            contract.status.to_value(),
            input.status.to_value(),
        )));
    }

    let end_date = input.end_date.ok_or_else(|| {
        ApiError::Validation("end_date is required when concluding a contract".into())
    })?;

    // 3. Conditional update — a concurrent conclusion loses here.
    contract_db::conclude_contract(db.get_ref(), contract_id, input.status, end_date).await?;

    let updated = policy::load_contract(db.get_ref(), contract_id).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// GET /api/projects/{id}/contracts — parties of the project.
pub async fn get_contracts_by_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let project = policy::load_project(db.get_ref(), path.into_inner()).await?;
    policy::require_project_party(db.get_ref(), &project, &user.0).await?;

    let contracts = contract_db::get_contracts_by_project(db.get_ref(), project.id).await?;
    Ok(HttpResponse::Ok().json(contracts))
}
