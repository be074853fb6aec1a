use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Contract status stored as a lowercase string in the database.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "terminated")]
    Terminated,
}

impl Status {
    /// The contract state machine: work can only conclude from `active`,
    /// and concluded contracts never move again.
    pub fn can_transition_to(self, target: Status) -> bool {
        matches!(
            (self, target),
            (Status::Active, Status::Completed) | (Status::Active, Status::Terminated)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Completed | Status::Terminated)
    }
}

/// SeaORM entity for the `contracts` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contracts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub contractor_id: Uuid,
    pub owner_id: Uuid,
    pub status: Status,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    #[sea_orm(column_type = "Text", nullable)]
    pub terms: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

impl Model {
    /// Whether `user_id` is one of the two parties bound by this contract.
    pub fn is_party(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id || self.contractor_id == user_id
    }
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
        belongs_to = "super::users::Entity",
        from = "Column::ContractorId",
        to = "super::users::Column::Id"
    )]
    Contractor,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contractor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Request body for POST /api/contracts.
/// `owner_id` comes from the authenticated actor, never from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContract {
    pub project_id: Uuid,
    pub contractor_id: Uuid,
    pub start_date: Option<Date>,
    pub terms: Option<String>,
}

/// Request body for PUT /api/contracts/{id}/status.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContractStatus {
    pub status: Status,
    pub end_date: Option<Date>,
}
