use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::contracts::{self, CreateContract, Status};

/// Insert a new contract. An owner assigning a contractor puts the contract
/// straight into `active`; `start_date` defaults to today when omitted.
pub async fn insert_contract(
    db: &DatabaseConnection,
    input: CreateContract,
    owner_id: Uuid,
) -> Result<contracts::Model, DbErr> {
    let new_contract = contracts::ActiveModel {
        id: Set(Uuid::new_v4()),
        project_id: Set(input.project_id),
        contractor_id: Set(input.contractor_id),
        owner_id: Set(owner_id),
        status: Set(Status::Active),
        start_date: Set(Some(
            input
                .start_date
                .unwrap_or_else(|| chrono::Utc::now().date_naive()),
        )),
        end_date: Set(None),
        terms: Set(input.terms),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_contract.insert(db).await
}

/// Fetch a single contract by ID.
pub async fn get_contract_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<contracts::Model>, DbErr> {
    contracts::Entity::find_by_id(id).one(db).await
}

/// All contracts on a project, newest first.
pub async fn get_contracts_by_project(
    db: &DatabaseConnection,
    project_id: Uuid,
) -> Result<Vec<contracts::Model>, DbErr> {
    contracts::Entity::find()
        .filter(contracts::Column::ProjectId.eq(project_id))
        .order_by_desc(contracts::Column::CreatedAt)
        .all(db)
        .await
}

/// The active contract for a (project, contractor) pair, if one exists.
/// At most one can exist at a time; creation checks this before inserting.
pub async fn find_active_contract(
    db: &DatabaseConnection,
    project_id: Uuid,
    contractor_id: Uuid,
) -> Result<Option<contracts::Model>, DbErr> {
    contracts::Entity::find()
        .filter(contracts::Column::ProjectId.eq(project_id))
        .filter(contracts::Column::ContractorId.eq(contractor_id))
        .filter(contracts::Column::Status.eq(Status::Active))
        .one(db)
        .await
}

/// Whether `contractor_id` holds any contract on the project. Used by the
/// policy guard to establish contract membership.
pub async fn is_project_contractor(
    db: &DatabaseConnection,
    project_id: Uuid,
    contractor_id: Uuid,
) -> Result<bool, DbErr> {
    let count = contracts::Entity::find()
        .filter(contracts::Column::ProjectId.eq(project_id))
        .filter(contracts::Column::ContractorId.eq(contractor_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Conclude a contract: a conditional single-statement update that only
/// fires while the row is still `active`, so a terminal contract can never
/// be rewritten by a concurrent request. The loser of a concurrent
/// conclusion observes zero matched rows and gets `InvalidTransitionError`.
pub async fn conclude_contract(
    db: &DatabaseConnection,
    id: Uuid,
    new_status: Status,
    end_date: chrono::NaiveDate,
) -> Result<(), ApiError> {
    let result = contracts::Entity::update_many()
        .col_expr(contracts::Column::Status, Expr::value(new_status))
        .col_expr(contracts::Column::EndDate, Expr::value(end_date))
        .col_expr(contracts::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(contracts::Column::Id.eq(id))
        .filter(contracts::Column::Status.eq(Status::Active))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(ApiError::InvalidTransition(
            "Contract is no longer active. Refresh to see its current status".into(),
        ));
    }
    Ok(())
}
