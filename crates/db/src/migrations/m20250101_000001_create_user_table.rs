//! Create user table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(User::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(User::FirebaseUid).string_len(128))
                    .col(ColumnDef::new(User::Email).string_len(256))
                    .col(ColumnDef::new(User::Name).string_len(256))
                    .col(ColumnDef::new(User::Image).string_len(1024))
                    .col(ColumnDef::new(User::Birthday).timestamp_with_time_zone())
                    .col(ColumnDef::new(User::IpAddress).string_len(64))
                    .col(ColumnDef::new(User::Location).string_len(256))
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(User::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Unique index: firebase_uid - one account per external identity
        manager
            .create_index(
                Index::create()
                    .name("idx_user_firebase_uid")
                    .table(User::Table)
                    .col(User::FirebaseUid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum User {
    Table,
    Id,
    FirebaseUid,
    Email,
    Name,
    Image,
    Birthday,
    IpAddress,
    Location,
    CreatedAt,
    UpdatedAt,
}
