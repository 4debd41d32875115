use sea_orm_migration::prelude::*;

use crate::m20260302_000001_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum RecurringPayments {
    Table,
    Id,
    Username,
    Title,
    AmountMinor,
    Category,
    Frequency,
    NextDueDate,
    IsActive,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RecurringPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecurringPayments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RecurringPayments::Username)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RecurringPayments::Title).string().not_null())
                    .col(
                        ColumnDef::new(RecurringPayments::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringPayments::Category)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringPayments::Frequency)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringPayments::NextDueDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringPayments::IsActive)
                            .boolean()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recurring_payments-username")
                            .from(RecurringPayments::Table, RecurringPayments::Username)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RecurringPayments::Table).to_owned())
            .await
    }
}
