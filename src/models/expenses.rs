use sea_orm::ActiveEnum;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Expense category — a closed enum, stored as a lowercase string.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[sea_orm(string_value = "materials")]
    Materials,
    #[sea_orm(string_value = "labor")]
    Labor,
    #[sea_orm(string_value = "equipment")]
    Equipment,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Which side of the project paid. Derived from the submitting actor's role,
/// fixed at creation, never independently editable.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum PaidBy {
    #[sea_orm(string_value = "owner")]
    Owner,
    #[sea_orm(string_value = "contractor")]
    Contractor,
}

/// SeaORM entity for the `expenses` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    /// None means an unscoped/legacy expense not tied to any contract.
    pub contract_id: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,
    pub vendor: Option<String>,
    pub date: Date,
    pub category: Category,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub paid_by: PaidBy,
    pub receipt_photo_url: Option<String>,
    pub added_by: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Project,
    #[sea_orm(
        belongs_to = "super::contracts::Entity",
        from = "Column::ContractId",
        to = "super::contracts::Column::Id"
    )]
    Contract,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AddedBy",
        to = "super::users::Column::Id"
    )]
    AddedBy,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::contracts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Request body for POST /api/expenses.
/// `paid_by` and `added_by` are derived server-side from the actor.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExpense {
    pub project_id: Uuid,
    pub contract_id: Option<Uuid>,
    pub amount: Decimal,
    pub vendor: Option<String>,
    pub date: Date,
    pub category: Category,
    pub description: Option<String>,
    pub receipt_photo_url: Option<String>,
}

impl CreateExpense {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.amount <= Decimal::ZERO {
            return Err(ApiError::Validation("Amount must be positive".into()));
        }
        Ok(())
    }
}

/// Request body for PUT /api/expenses/{id}. Absent fields are left
/// unchanged; an empty string clears an optional text field. `paid_by` is
/// deliberately not patchable.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateExpense {
    pub amount: Option<Decimal>,
    pub vendor: Option<String>,
    pub date: Option<Date>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub receipt_photo_url: Option<String>,
}

impl UpdateExpense {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(amount) = self.amount {
            if amount <= Decimal::ZERO {
                return Err(ApiError::Validation("Amount must be positive".into()));
            }
        }
        Ok(())
    }
}

/// Query-string filters for the expense list and expense summary endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseFilters {
    pub paid_by: Option<PaidBy>,
    pub category: Option<Category>,
    pub contract_id: Option<Uuid>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

impl ExpenseFilters {
    /// Stable representation of the filter set, used as part of a cache key.
    pub fn cache_key(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}",
            self.paid_by.map(|p| p.to_value()).unwrap_or_else(|| "all".into()),
            self.category.map(|c| c.to_value()).unwrap_or_else(|| "all".into()),
            self.contract_id.map(|c| c.to_string()).unwrap_or_else(|| "all".into()),
            self.start_date.map(|d| d.to_string()).unwrap_or_default(),
            self.end_date.map(|d| d.to_string()).unwrap_or_default(),
        )
    }
}
