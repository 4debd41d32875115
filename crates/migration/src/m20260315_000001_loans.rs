use sea_orm_migration::prelude::*;

use crate::m20260302_000001_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Loans {
    Table,
    Id,
    Username,
    Name,
    PrincipalMinor,
    InterestRatePct,
    TenureMonths,
    MonthlyEmiMinor,
    StartDate,
    Status,
}

#[derive(Iden)]
enum LoanPayments {
    Table,
    Id,
    LoanId,
    Username,
    AmountMinor,
    PaidAt,
    Note,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Loans::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Loans::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Loans::Username).string().not_null())
                    .col(ColumnDef::new(Loans::Name).string().not_null())
                    .col(
                        ColumnDef::new(Loans::PrincipalMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Loans::InterestRatePct).double().not_null())
                    .col(ColumnDef::new(Loans::TenureMonths).integer().not_null())
                    .col(
                        ColumnDef::new(Loans::MonthlyEmiMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Loans::StartDate).date().not_null())
                    .col(ColumnDef::new(Loans::Status).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-loans-username")
                            .from(Loans::Table, Loans::Username)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LoanPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LoanPayments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LoanPayments::LoanId).uuid().not_null())
                    .col(ColumnDef::new(LoanPayments::Username).string().not_null())
                    .col(
                        ColumnDef::new(LoanPayments::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LoanPayments::PaidAt).timestamp().not_null())
                    .col(ColumnDef::new(LoanPayments::Note).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-loan_payments-loan_id")
                            .from(LoanPayments::Table, LoanPayments::LoanId)
                            .to(Loans::Table, Loans::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-loan_payments-loan_id")
                    .table(LoanPayments::Table)
                    .col(LoanPayments::LoanId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LoanPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Loans::Table).to_owned())
            .await
    }
}
