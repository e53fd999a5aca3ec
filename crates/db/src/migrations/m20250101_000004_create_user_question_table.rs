//! Create user_question table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserQuestion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserQuestion::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserQuestion::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserQuestion::QuestionId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserQuestion::Reaction)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserQuestion::TimeSpent)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(UserQuestion::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(UserQuestion::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_question_user")
                            .from(UserQuestion::Table, UserQuestion::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_question_question")
                            .from(UserQuestion::Table, UserQuestion::QuestionId)
                            .to(Question::Table, Question::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, question_id) - one interaction per pair
        manager
            .create_index(
                Index::create()
                    .name("idx_user_question_pair")
                    .table(UserQuestion::Table)
                    .col(UserQuestion::UserId)
                    .col(UserQuestion::QuestionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: question_id (for counting reactions on a question)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_question_question_id")
                    .table(UserQuestion::Table)
                    .col(UserQuestion::QuestionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserQuestion::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserQuestion {
    Table,
    Id,
    UserId,
    QuestionId,
    Reaction,
    TimeSpent,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Question {
    Table,
    Id,
}
