use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_identity_tables::Accounts;
use crate::m20250301_000002_create_program_tables::{Competencies, Interns};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // average_score is stored in hundredths (0..=500)
        manager
            .create_table(
                Table::create()
                    .table(Evaluations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Evaluations::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Evaluations::InternId).string().not_null())
                    .col(ColumnDef::new(Evaluations::EvaluatorId).string().not_null())
                    .col(ColumnDef::new(Evaluations::EvaluationDate).date().not_null())
                    .col(ColumnDef::new(Evaluations::GeneralComments).string_len(2000))
                    .col(ColumnDef::new(Evaluations::AverageScoreHundredths).integer().not_null())
                    .col(ColumnDef::new(Evaluations::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_evaluations_intern_id")
                            .from(Evaluations::Table, Evaluations::InternId)
                            .to(Interns::Table, Interns::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_evaluations_evaluator_id")
                            .from(Evaluations::Table, Evaluations::EvaluatorId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_evaluations_intern_id")
                    .table(Evaluations::Table)
                    .col(Evaluations::InternId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CompetencyScores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompetencyScores::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CompetencyScores::EvaluationId).string().not_null())
                    .col(ColumnDef::new(CompetencyScores::CompetencyId).string().not_null())
                    .col(ColumnDef::new(CompetencyScores::Score).integer().not_null())
                    .col(ColumnDef::new(CompetencyScores::Comment).string_len(500))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_competency_scores_evaluation_id")
                            .from(CompetencyScores::Table, CompetencyScores::EvaluationId)
                            .to(Evaluations::Table, Evaluations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_competency_scores_competency_id")
                            .from(CompetencyScores::Table, CompetencyScores::CompetencyId)
                            .to(Competencies::Table, Competencies::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_competency_scores_evaluation_competency")
                    .table(CompetencyScores::Table)
                    .col(CompetencyScores::EvaluationId)
                    .col(CompetencyScores::CompetencyId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CompetencyScores::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Evaluations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Evaluations {
    Table,
    Id,
    InternId,
    EvaluatorId,
    EvaluationDate,
    GeneralComments,
    AverageScoreHundredths,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CompetencyScores {
    Table,
    Id,
    EvaluationId,
    CompetencyId,
    Score,
    Comment,
}
