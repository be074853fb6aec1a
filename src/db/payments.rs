use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::none_if_blank;
use crate::models::payments::{self, CreatePayment, PaymentStatus, UpdatePayment};

/// Insert a new payment in `pending` status. `project_id` is derived from
/// the contract, never taken from the client.
pub async fn insert_payment(
    db: &DatabaseConnection,
    input: CreatePayment,
    project_id: Uuid,
    added_by: Uuid,
) -> Result<payments::Model, DbErr> {
    let new_payment = payments::ActiveModel {
        id: Set(Uuid::new_v4()),
        project_id: Set(project_id),
        contract_id: Set(input.contract_id),
        amount: Set(input.amount),
        payment_method: Set(input.payment_method),
        payment_date: Set(input.payment_date),
        notes: Set(input.notes),
        screenshot_url: Set(input.screenshot_url),
        status: Set(PaymentStatus::Pending),
        dispute_reason: Set(None),
        added_by: Set(added_by),
        confirmed_by: Set(None),
        confirmed_at: Set(None),
        disputed_at: Set(None),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_payment.insert(db).await
}

/// Fetch a single payment by ID.
pub async fn get_payment_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<payments::Model>, DbErr> {
    payments::Entity::find_by_id(id).one(db).await
}

/// List a project's payments, newest payment date first, optionally scoped
/// to one contract.
pub async fn list_payments(
    db: &DatabaseConnection,
    project_id: Uuid,
    contract_id: Option<Uuid>,
) -> Result<Vec<payments::Model>, DbErr> {
    let mut query = payments::Entity::find().filter(payments::Column::ProjectId.eq(project_id));

    if let Some(contract_id) = contract_id {
        query = query.filter(payments::Column::ContractId.eq(contract_id));
    }

    query
        .order_by_desc(payments::Column::PaymentDate)
        .order_by_desc(payments::Column::CreatedAt)
        .all(db)
        .await
}

/// Confirm a pending payment with a compare-and-swap on status.
///
/// The `status = 'pending'` filter makes this a single conditional update:
/// of two concurrent confirm/dispute attempts exactly one can match, and the
/// loser observes zero matched rows and gets `InvalidStateError`.
pub async fn confirm_payment(
    db: &DatabaseConnection,
    id: Uuid,
    contractor_id: Uuid,
) -> Result<(), ApiError> {
    let now = chrono::Utc::now();
    let result = payments::Entity::update_many()
        .col_expr(
            payments::Column::Status,
            Expr::value(PaymentStatus::Confirmed),
        )
        .col_expr(payments::Column::ConfirmedBy, Expr::value(contractor_id))
        .col_expr(payments::Column::ConfirmedAt, Expr::value(now))
        .col_expr(payments::Column::UpdatedAt, Expr::value(now))
        .filter(payments::Column::Id.eq(id))
        .filter(payments::Column::Status.eq(PaymentStatus::Pending))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(ApiError::InvalidState(
            "Payment is no longer pending. Refresh to see its current status".into(),
        ));
    }
    Ok(())
}

/// Dispute a pending payment. Same compare-and-swap shape as confirm.
pub async fn dispute_payment(db: &DatabaseConnection, id: Uuid, reason: &str) -> Result<(), ApiError> {
    let now = chrono::Utc::now();
    let result = payments::Entity::update_many()
        .col_expr(
            payments::Column::Status,
            Expr::value(PaymentStatus::Disputed),
        )
        .col_expr(payments::Column::DisputeReason, Expr::value(reason))
        .col_expr(payments::Column::DisputedAt, Expr::value(now))
        .col_expr(payments::Column::UpdatedAt, Expr::value(now))
        .filter(payments::Column::Id.eq(id))
        .filter(payments::Column::Status.eq(PaymentStatus::Pending))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(ApiError::InvalidState(
            "Payment is no longer pending. Refresh to see its current status".into(),
        ));
    }
    Ok(())
}

/// Edit a payment while it is still pending. The pending filter keeps the
/// edit from landing on a record a contractor confirmed or disputed in the
/// meantime. An empty string on a text field clears it.
pub async fn update_pending_payment(
    db: &DatabaseConnection,
    id: Uuid,
    patch: UpdatePayment,
) -> Result<(), ApiError> {
    let mut update = payments::Entity::update_many()
        .col_expr(payments::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(payments::Column::Id.eq(id))
        .filter(payments::Column::Status.eq(PaymentStatus::Pending));

    if let Some(amount) = patch.amount {
        update = update.col_expr(payments::Column::Amount, Expr::value(amount));
    }
    if let Some(method) = patch.payment_method {
        update = update.col_expr(payments::Column::PaymentMethod, Expr::value(method));
    }
    if let Some(payment_date) = patch.payment_date {
        update = update.col_expr(payments::Column::PaymentDate, Expr::value(payment_date));
    }
    if let Some(notes) = patch.notes {
        update = update.col_expr(payments::Column::Notes, Expr::value(none_if_blank(notes)));
    }
    if let Some(screenshot_url) = patch.screenshot_url {
        update = update.col_expr(
            payments::Column::ScreenshotUrl,
            Expr::value(none_if_blank(screenshot_url)),
        );
    }

    let result = update.exec(db).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::InvalidState(
            "Only pending payments can be updated".into(),
        ));
    }
    Ok(())
}

/// Delete a payment, but only while it is still pending.
pub async fn delete_pending_payment(db: &DatabaseConnection, id: Uuid) -> Result<(), ApiError> {
    let result = payments::Entity::delete_many()
        .filter(payments::Column::Id.eq(id))
        .filter(payments::Column::Status.eq(PaymentStatus::Pending))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(ApiError::InvalidState(
            "Only pending payments can be deleted".into(),
        ));
    }
    Ok(())
}
