use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Contracts {
    Table,
    ProjectId,
    ContractorId,
}

#[derive(DeriveIden)]
enum Expenses {
    Table,
    ProjectId,
    Date,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    ProjectId,
    PaymentDate,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Active-contract lookups hit (project, contractor) on every
        // expense/payment authorization check.
        manager
            .create_index(
                Index::create()
                    .name("idx_contracts_project_contractor")
                    .table(Contracts::Table)
                    .col(Contracts::ProjectId)
                    .col(Contracts::ContractorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_expenses_project_date")
                    .table(Expenses::Table)
                    .col(Expenses::ProjectId)
                    .col(Expenses::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_project_date")
                    .table(Payments::Table)
                    .col(Payments::ProjectId)
                    .col(Payments::PaymentDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_contracts_project_contractor")
                    .table(Contracts::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_expenses_project_date")
                    .table(Expenses::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_payments_project_date")
                    .table(Payments::Table)
                    .to_owned(),
            )
            .await
    }
}
