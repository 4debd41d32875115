use sea_orm_migration::prelude::*;

use crate::m20260302_000001_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum LendingTransactions {
    Table,
    Id,
    Username,
    Kind,
    Person,
    AmountMinor,
    OccurredAt,
    Status,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LendingTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LendingTransactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LendingTransactions::Username)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LendingTransactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(LendingTransactions::Person)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LendingTransactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LendingTransactions::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LendingTransactions::Status)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-lending_transactions-username")
                            .from(LendingTransactions::Table, LendingTransactions::Username)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-lending_transactions-username-person")
                    .table(LendingTransactions::Table)
                    .col(LendingTransactions::Username)
                    .col(LendingTransactions::Person)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LendingTransactions::Table).to_owned())
            .await
    }
}
