use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::RedisCache;
use crate::db::payments as payment_db;
use crate::error::ApiError;
use crate::handlers::invalidate_project_summaries;
use crate::models::payments::{CreatePayment, DisputePayment, PaymentFilters, UpdatePayment};
use crate::policy::{self, Action, Actor, ResourceContext};

/// POST /api/payments — the contract's owner records money sent.
///
/// Unlike expenses, a payment is always scoped to a contract; the project
/// is derived from the contract so the two can never disagree.
pub async fn add_payment(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    body: web::Json<CreatePayment>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    input.validate()?;

    let contract = policy::load_contract(db.get_ref(), input.contract_id).await?;

    let resource = ResourceContext::project(contract.owner_id).with_contract(&contract);
    policy::require(Actor::from(&user.0), Action::CreatePayment, &resource)?;

    let payment =
        payment_db::insert_payment(db.get_ref(), input, contract.project_id, user.0.id).await?;
    invalidate_project_summaries(cache.get_ref(), contract.project_id).await;

    Ok(HttpResponse::Created().json(payment))
}

/// POST /api/payments/{id}/confirm — the contractor acknowledges receipt.
///
/// The status flip is a compare-and-swap on `pending`; of two concurrent
/// contractor actions exactly one lands, and the other is told the record
/// has changed.
pub async fn confirm_payment(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let payment = payment_db::get_payment_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Payment {id} not found")))?;
    let contract = policy::load_contract(db.get_ref(), payment.contract_id).await?;

    let resource = ResourceContext::project(contract.owner_id).with_contract(&contract);
    policy::require(Actor::from(&user.0), Action::ConfirmPayment, &resource)?;

    payment_db::confirm_payment(db.get_ref(), id, user.0.id).await?;
    invalidate_project_summaries(cache.get_ref(), payment.project_id).await;

    let confirmed = payment_db::get_payment_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Payment {id} not found")))?;
    Ok(HttpResponse::Ok().json(confirmed))
}

/// POST /api/payments/{id}/dispute — the contractor contests the record.
///
/// Requires a non-blank reason. Disputed is terminal: resolution happens by
/// adding corrective records, never by rewriting this one.
pub async fn dispute_payment(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
    body: web::Json<DisputePayment>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let input = body.into_inner();
    input.validate()?;

    let payment = payment_db::get_payment_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Payment {id} not found")))?;
    let contract = policy::load_contract(db.get_ref(), payment.contract_id).await?;

    let resource = ResourceContext::project(contract.owner_id).with_contract(&contract);
    policy::require(Actor::from(&user.0), Action::DisputePayment, &resource)?;

    payment_db::dispute_payment(db.get_ref(), id, input.reason.trim()).await?;
    invalidate_project_summaries(cache.get_ref(), payment.project_id).await;

    let disputed = payment_db::get_payment_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Payment {id} not found")))?;
    Ok(HttpResponse::Ok().json(disputed))
}

/// PUT /api/payments/{id} — creator only, and only while pending.
pub async fn update_payment(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePayment>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let patch = body.into_inner();
    patch.validate()?;

    let payment = payment_db::get_payment_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Payment {id} not found")))?;
    let contract = policy::load_contract(db.get_ref(), payment.contract_id).await?;

    let resource = ResourceContext::project(contract.owner_id)
        .with_contract(&contract)
        .with_record(payment.added_by);
    policy::require(Actor::from(&user.0), Action::EditPayment, &resource)?;

    // The pending filter doubles as the terminal-state check: once the
    // contractor has confirmed or disputed, nothing matches.
    payment_db::update_pending_payment(db.get_ref(), id, patch).await?;
    invalidate_project_summaries(cache.get_ref(), payment.project_id).await;

    let updated = payment_db::get_payment_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Payment {id} not found")))?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/payments/{id} — creator only, and only while pending.
pub async fn delete_payment(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let payment = payment_db::get_payment_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Payment {id} not found")))?;
    let contract = policy::load_contract(db.get_ref(), payment.contract_id).await?;

    let resource = ResourceContext::project(contract.owner_id)
        .with_contract(&contract)
        .with_record(payment.added_by);
    policy::require(Actor::from(&user.0), Action::DeletePayment, &resource)?;

    payment_db::delete_pending_payment(db.get_ref(), id).await?;
    invalidate_project_summaries(cache.get_ref(), payment.project_id).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Payment {id} deleted"),
    })))
}

/// GET /api/projects/{id}/payments — parties of the project, optionally
/// filtered to one contract.
pub async fn list_payments(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    query: web::Query<PaymentFilters>,
) -> Result<HttpResponse, ApiError> {
    let project = policy::load_project(db.get_ref(), path.into_inner()).await?;
    policy::require_project_party(db.get_ref(), &project, &user.0).await?;

    let payments = payment_db::list_payments(db.get_ref(), project.id, query.contract_id).await?;
    Ok(HttpResponse::Ok().json(payments))
}
