use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{self, RedisCache, SUMMARY_TTL_SECONDS};
use crate::db::expenses as expense_db;
use crate::db::payments as payment_db;
use crate::error::ApiError;
use crate::models::expenses::ExpenseFilters;
use crate::models::payments::PaymentFilters;
use crate::policy;
use crate::summary::{self, ExpenseSummary, PaymentSummary};

/// GET /api/projects/{id}/expenses/summary
///
/// Recomputed from the ledger on every read; the Redis layer is a short-TTL
/// convenience that every mutation for the project invalidates. A cache
/// error is a miss, never a failure.
pub async fn get_expense_summary(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
    query: web::Query<ExpenseFilters>,
) -> Result<HttpResponse, ApiError> {
    let project = policy::load_project(db.get_ref(), path.into_inner()).await?;
    policy::require_project_party(db.get_ref(), &project, &user.0).await?;

    let key = cache::keys::expense_summary(project.id, &query.cache_key());
    match cache.get::<ExpenseSummary>(&key).await {
        Ok(Some(cached)) => return Ok(HttpResponse::Ok().json(cached)),
        Ok(None) => {}
        Err(e) => tracing::warn!("summary cache read failed: {e}"),
    }

    let expenses = expense_db::list_expenses(db.get_ref(), project.id, &query).await?;
    let summary = summary::expense_summary(&expenses);

    if let Err(e) = cache.set(&key, &summary, SUMMARY_TTL_SECONDS).await {
        tracing::warn!("summary cache write failed: {e}");
    }

    Ok(HttpResponse::Ok().json(summary))
}

/// GET /api/projects/{id}/payments/summary
pub async fn get_payment_summary(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
    query: web::Query<PaymentFilters>,
) -> Result<HttpResponse, ApiError> {
    let project = policy::load_project(db.get_ref(), path.into_inner()).await?;
    policy::require_project_party(db.get_ref(), &project, &user.0).await?;

    let key = cache::keys::payment_summary(project.id, &query.cache_key());
    match cache.get::<PaymentSummary>(&key).await {
        Ok(Some(cached)) => return Ok(HttpResponse::Ok().json(cached)),
        Ok(None) => {}
        Err(e) => tracing::warn!("summary cache read failed: {e}"),
    }

    let payments = payment_db::list_payments(db.get_ref(), project.id, query.contract_id).await?;
    let summary = summary::payment_summary(&payments);

    if let Err(e) = cache.set(&key, &summary, SUMMARY_TTL_SECONDS).await {
        tracing::warn!("summary cache write failed: {e}");
    }

    Ok(HttpResponse::Ok().json(summary))
}
