use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VerificationCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VerificationCodes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VerificationCodes::UserId).uuid().not_null())
                    .col(ColumnDef::new(VerificationCodes::Code).string().not_null())
                    .col(
                        ColumnDef::new(VerificationCodes::Target)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VerificationCodes::Purpose)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VerificationCodes::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VerificationCodes::UsedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(VerificationCodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(VerificationCodes::Table, VerificationCodes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(VerificationCodes::Table)
                    .col(VerificationCodes::UserId)
                    .col(VerificationCodes::Purpose)
                    .name("idx_verification_codes_user_id_purpose")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VerificationCodes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum VerificationCodes {
    Table,
    Id,
    UserId,
    Code,
    Target,
    Purpose,
    ExpiresAt,
    UsedAt,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
