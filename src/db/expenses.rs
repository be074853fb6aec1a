use sea_orm::*;
use uuid::Uuid;

use crate::models::expenses::{self, CreateExpense, ExpenseFilters, PaidBy, UpdateExpense};
use crate::models::none_if_blank;

/// Insert a new expense. `paid_by` arrives pre-derived from the actor's role
/// relative to the project.
pub async fn insert_expense(
    db: &DatabaseConnection,
    input: CreateExpense,
    paid_by: PaidBy,
    added_by: Uuid,
) -> Result<expenses::Model, DbErr> {
    let new_expense = expenses::ActiveModel {
        id: Set(Uuid::new_v4()),
        project_id: Set(input.project_id),
        contract_id: Set(input.contract_id),
        amount: Set(input.amount),
        vendor: Set(input.vendor),
        date: Set(input.date),
        category: Set(input.category),
        description: Set(input.description),
        paid_by: Set(paid_by),
        receipt_photo_url: Set(input.receipt_photo_url),
        added_by: Set(added_by),
        created_at: Set(chrono::Utc::now()),
    };

    new_expense.insert(db).await
}

/// Fetch a single expense by ID.
pub async fn get_expense_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<expenses::Model>, DbErr> {
    expenses::Entity::find_by_id(id).one(db).await
}

/// List a project's expenses with optional filters.
///
/// Date-descending order (ties broken by created_at) is the display contract
/// for dashboards, not a storage invariant.
pub async fn list_expenses(
    db: &DatabaseConnection,
    project_id: Uuid,
    filters: &ExpenseFilters,
) -> Result<Vec<expenses::Model>, DbErr> {
    let mut query = expenses::Entity::find().filter(expenses::Column::ProjectId.eq(project_id));

    if let Some(paid_by) = filters.paid_by {
        query = query.filter(expenses::Column::PaidBy.eq(paid_by));
    }
    if let Some(category) = filters.category {
        query = query.filter(expenses::Column::Category.eq(category));
    }
    if let Some(contract_id) = filters.contract_id {
        query = query.filter(expenses::Column::ContractId.eq(contract_id));
    }
    if let Some(start_date) = filters.start_date {
        query = query.filter(expenses::Column::Date.gte(start_date));
    }
    if let Some(end_date) = filters.end_date {
        query = query.filter(expenses::Column::Date.lte(end_date));
    }

    query
        .order_by_desc(expenses::Column::Date)
        .order_by_desc(expenses::Column::CreatedAt)
        .all(db)
        .await
}

/// Apply a partial update to an expense. Validation and authorization happen
/// at the handler boundary before this is called. An empty string on a text
/// field clears it.
pub async fn update_expense(
    db: &DatabaseConnection,
    expense: expenses::Model,
    patch: UpdateExpense,
) -> Result<expenses::Model, DbErr> {
    let mut active: expenses::ActiveModel = expense.into();

    if let Some(amount) = patch.amount {
        active.amount = Set(amount);
    }
    if let Some(vendor) = patch.vendor {
        active.vendor = Set(none_if_blank(vendor));
    }
    if let Some(date) = patch.date {
        active.date = Set(date);
    }
    if let Some(category) = patch.category {
        active.category = Set(category);
    }
    if let Some(description) = patch.description {
        active.description = Set(none_if_blank(description));
    }
    if let Some(receipt_photo_url) = patch.receipt_photo_url {
        active.receipt_photo_url = Set(none_if_blank(receipt_photo_url));
    }

    active.update(db).await
}

/// Delete an expense by ID.
pub async fn delete_expense(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    expenses::Entity::delete_by_id(id).exec(db).await
}
