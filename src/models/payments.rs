use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// How the owner says the money moved. Stored as a lowercase string.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    #[sea_orm(string_value = "zelle")]
    Zelle,
    #[sea_orm(string_value = "paypal")]
    Paypal,
    #[sea_orm(string_value = "cash_app")]
    CashApp,
    #[sea_orm(string_value = "venmo")]
    Venmo,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Payment acknowledgement state machine: `pending` is the only mutable
/// window; `confirmed` and `disputed` are terminal. A confirmed or disputed
/// record is never rewritten — corrections happen by adding new records.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "disputed")]
    Disputed,
}

impl PaymentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, PaymentStatus::Confirmed | PaymentStatus::Disputed)
    }

    pub fn can_transition_to(self, target: PaymentStatus) -> bool {
        matches!(
            (self, target),
            (PaymentStatus::Pending, PaymentStatus::Confirmed)
                | (PaymentStatus::Pending, PaymentStatus::Disputed)
        )
    }
}

/// SeaORM entity for the `payments` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub contract_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_date: Date,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub screenshot_url: Option<String>,
    pub status: PaymentStatus,
    /// Set iff status is `disputed`.
    pub dispute_reason: Option<String>,
    /// The owner side of the contract.
    pub added_by: Uuid,
    pub confirmed_by: Option<Uuid>,
    pub confirmed_at: Option<DateTimeUtc>,
    pub disputed_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
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

/// Request body for POST /api/payments.
/// The project is derived from the contract; `added_by` from the actor.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePayment {
    pub contract_id: Uuid,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_date: Date,
    pub notes: Option<String>,
    pub screenshot_url: Option<String>,
}

impl CreatePayment {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.amount <= Decimal::ZERO {
            return Err(ApiError::Validation("Amount must be positive".into()));
        }
        Ok(())
    }
}

/// Request body for PUT /api/payments/{id}. Only legal while pending.
/// Absent fields are left unchanged; an empty string clears a text field.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePayment {
    pub amount: Option<Decimal>,
    pub payment_method: Option<PaymentMethod>,
    pub payment_date: Option<Date>,
    pub notes: Option<String>,
    pub screenshot_url: Option<String>,
}

impl UpdatePayment {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(amount) = self.amount {
            if amount <= Decimal::ZERO {
                return Err(ApiError::Validation("Amount must be positive".into()));
            }
        }
        Ok(())
    }
}

/// Request body for POST /api/payments/{id}/dispute.
#[derive(Debug, Clone, Deserialize)]
pub struct DisputePayment {
    pub reason: String,
}

impl DisputePayment {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.reason.trim().is_empty() {
            return Err(ApiError::Validation("Dispute reason is required".into()));
        }
        Ok(())
    }
}

/// Query-string filter for the payment list and payment summary endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentFilters {
    pub contract_id: Option<Uuid>,
}

impl PaymentFilters {
    pub fn cache_key(&self) -> String {
        self.contract_id
            .map(|c| c.to_string())
            .unwrap_or_else(|| "all".into())
    }
}
