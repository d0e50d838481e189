use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_identity_tables::Accounts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Categories::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Categories::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Categories::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Competencies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Competencies::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Competencies::CategoryId).string().not_null())
                    .col(ColumnDef::new(Competencies::Name).string().not_null())
                    .col(ColumnDef::new(Competencies::Description).string())
                    .col(ColumnDef::new(Competencies::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(Competencies::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_competencies_category_id")
                            .from(Competencies::Table, Competencies::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Interns::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Interns::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Interns::FullName).string().not_null())
                    .col(ColumnDef::new(Interns::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Interns::Institution).string().not_null())
                    .col(ColumnDef::new(Interns::Course).string().not_null())
                    .col(ColumnDef::new(Interns::SupervisorId).string())
                    .col(ColumnDef::new(Interns::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(Interns::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_interns_supervisor_id")
                            .from(Interns::Table, Interns::SupervisorId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Interns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Competencies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Competencies {
    Table,
    Id,
    CategoryId,
    Name,
    Description,
    Active,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Interns {
    Table,
    Id,
    FullName,
    Email,
    Institution,
    Course,
    SupervisorId,
    Active,
    CreatedAt,
}
