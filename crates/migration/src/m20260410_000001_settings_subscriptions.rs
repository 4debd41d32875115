use sea_orm_migration::prelude::*;

use crate::m20260302_000001_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum UserSettings {
    Table,
    Username,
    Currency,
    Timezone,
    SpreadsheetUrl,
}

#[derive(Iden)]
enum Subscriptions {
    Table,
    Id,
    Username,
    Plan,
    Status,
    PeriodStart,
    PeriodEnd,
    TrialEndsAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserSettings::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserSettings::Currency).string().not_null())
                    .col(ColumnDef::new(UserSettings::Timezone).string().not_null())
                    .col(ColumnDef::new(UserSettings::SpreadsheetUrl).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_settings-username")
                            .from(UserSettings::Table, UserSettings::Username)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subscriptions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subscriptions::Username).string().not_null())
                    .col(ColumnDef::new(Subscriptions::Plan).string().not_null())
                    .col(ColumnDef::new(Subscriptions::Status).string().not_null())
                    .col(
                        ColumnDef::new(Subscriptions::PeriodStart)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::PeriodEnd)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Subscriptions::TrialEndsAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subscriptions-username")
                            .from(Subscriptions::Table, Subscriptions::Username)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-subscriptions-username-period_start")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::Username)
                    .col(Subscriptions::PeriodStart)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subscriptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserSettings::Table).to_owned())
            .await
    }
}
