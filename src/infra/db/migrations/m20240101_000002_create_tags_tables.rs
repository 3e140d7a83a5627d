//! Migration: Create tags and the account/tag join table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tags::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tags::Title).string().not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccountTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AccountTags::AccountId).uuid().not_null())
                    .col(ColumnDef::new(AccountTags::TagId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_account_tags")
                            .col(AccountTags::AccountId)
                            .col(AccountTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_tags_account")
                            .from(AccountTags::Table, AccountTags::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_tags_tag")
                            .from(AccountTags::Table, AccountTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccountTags::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    Title,
}

#[derive(DeriveIden)]
enum AccountTags {
    Table,
    AccountId,
    TagId,
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
}
