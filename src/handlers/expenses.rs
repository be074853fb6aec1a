use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::RedisCache;
use crate::db::expenses as expense_db;
use crate::error::ApiError;
use crate::handlers::invalidate_project_summaries;
use crate::models::expenses::{CreateExpense, ExpenseFilters, PaidBy, UpdateExpense};
use crate::policy::{self, Action, Actor, ResourceContext};
use crate::summary;

/// POST /api/expenses — record a cost against a project.
///
/// `paid_by` is derived from which side of the project the actor is on,
/// never taken from the request. If the expense is scoped to a contract,
/// the contract must belong to the project and the actor must be a party.
pub async fn add_expense(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    body: web::Json<CreateExpense>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    input.validate()?;

    // 1. Resolve the project and the actor's side of it.
    let project = policy::load_project(db.get_ref(), input.project_id).await?;
    let party = policy::project_party(db.get_ref(), &project, &user.0).await?;

    // 2. Consult the guard.
    let resource = ResourceContext::project(project.owner_id)
        .with_membership(party == Some(PaidBy::Contractor));
    policy::require(Actor::from(&user.0), Action::CreateExpense, &resource)?;

    let paid_by = party.ok_or_else(|| {
        ApiError::Forbidden("You cannot add expenses to this project".into())
    })?;

    // 3. Validate the contract scope, when supplied.
    if let Some(contract_id) = input.contract_id {
        let contract = policy::load_contract(db.get_ref(), contract_id).await?;
        if contract.project_id != project.id {
            return Err(ApiError::Validation(
                "Contract does not belong to this project".into(),
            ));
        }
        if !contract.is_party(user.0.id) {
            return Err(ApiError::Forbidden(
                "You are not a party to this contract".into(),
            ));
        }
    }

    // 4. Append to the ledger and drop stale summaries.
    let expense = expense_db::insert_expense(db.get_ref(), input, paid_by, user.0.id).await?;
    invalidate_project_summaries(cache.get_ref(), project.id).await;

    Ok(HttpResponse::Created().json(expense))
}

/// GET /api/projects/{id}/expenses — filtered list plus recomputed summary.
pub async fn list_expenses(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    query: web::Query<ExpenseFilters>,
) -> Result<HttpResponse, ApiError> {
    let project = policy::load_project(db.get_ref(), path.into_inner()).await?;
    policy::require_project_party(db.get_ref(), &project, &user.0).await?;

    let expenses = expense_db::list_expenses(db.get_ref(), project.id, &query).await?;
    let summary = summary::expense_summary(&expenses);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "expenses": expenses,
        "summary": summary,
    })))
}

/// GET /api/expenses/{id} — parties of the expense's project.
pub async fn get_expense(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let expense = expense_db::get_expense_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Expense {id} not found")))?;

    let project = policy::load_project(db.get_ref(), expense.project_id).await?;
    policy::require_project_party(db.get_ref(), &project, &user.0).await?;

    Ok(HttpResponse::Ok().json(expense))
}

/// PUT /api/expenses/{id} — creator or project owner; `paid_by` is fixed.
pub async fn update_expense(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateExpense>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let patch = body.into_inner();
    patch.validate()?;

    let expense = expense_db::get_expense_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Expense {id} not found")))?;
    let project = policy::load_project(db.get_ref(), expense.project_id).await?;

    let resource = ResourceContext::project(project.owner_id).with_record(expense.added_by);
    policy::require(Actor::from(&user.0), Action::EditExpense, &resource)?;

    let updated = expense_db::update_expense(db.get_ref(), expense, patch).await?;
    invalidate_project_summaries(cache.get_ref(), project.id).await;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/expenses/{id} — creator or project owner.
pub async fn delete_expense(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let expense = expense_db::get_expense_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Expense {id} not found")))?;
    let project = policy::load_project(db.get_ref(), expense.project_id).await?;

    let resource = ResourceContext::project(project.owner_id).with_record(expense.added_by);
    policy::require(Actor::from(&user.0), Action::DeleteExpense, &resource)?;

    let result = expense_db::delete_expense(db.get_ref(), id).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!("Expense {id} not found")));
    }
    invalidate_project_summaries(cache.get_ref(), project.id).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Expense {id} deleted"),
    })))
}
