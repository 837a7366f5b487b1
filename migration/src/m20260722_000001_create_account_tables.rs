use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create orders table (fulfilment history shown on account pages)
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(Orders::OrderId)
                            .string_len(30)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Orders::TotalPrice)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_user_id")
                    .table(Orders::Table)
                    .col(Orders::UserId)
                    .to_owned(),
            )
            .await?;

        // Create prescriptions table
        manager
            .create_table(
                Table::create()
                    .table(Prescriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Prescriptions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Prescriptions::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(Prescriptions::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Prescriptions::PowerType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Prescriptions::RightSph)
                            .decimal_len(4, 2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Prescriptions::LeftSph)
                            .decimal_len(4, 2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Prescriptions::RightCyl)
                            .decimal_len(4, 2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Prescriptions::LeftCyl)
                            .decimal_len(4, 2)
                            .null(),
                    )
                    .col(ColumnDef::new(Prescriptions::Axis).integer().null())
                    .col(ColumnDef::new(Prescriptions::Pd).decimal_len(4, 1).null())
                    .col(
                        ColumnDef::new(Prescriptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_prescriptions_user_id")
                    .table(Prescriptions::Table)
                    .col(Prescriptions::UserId)
                    .to_owned(),
            )
            .await?;

        // Create store_credits table
        manager
            .create_table(
                Table::create()
                    .table(StoreCredits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StoreCredits::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StoreCredits::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(StoreCredits::Code)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(StoreCredits::Balance)
                            .decimal_len(10, 2)
                            .not_null()
                            .default("0"),
                    )
                    .col(
                        ColumnDef::new(StoreCredits::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_store_credits_user_id")
                    .table(StoreCredits::Table)
                    .col(StoreCredits::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StoreCredits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Prescriptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Orders {
    Table,
    Id,
    UserId,
    OrderId,
    TotalPrice,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum Prescriptions {
    Table,
    Id,
    UserId,
    Name,
    PowerType,
    RightSph,
    LeftSph,
    RightCyl,
    LeftCyl,
    Axis,
    Pd,
    CreatedAt,
}

#[derive(Iden)]
enum StoreCredits {
    Table,
    Id,
    UserId,
    Code,
    Balance,
    UpdatedAt,
}
