use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create delivery_pincodes cache table
        manager
            .create_table(
                Table::create()
                    .table(DeliveryPincodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeliveryPincodes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DeliveryPincodes::Pincode)
                            .string_len(6)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(DeliveryPincodes::City)
                            .string_len(120)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(DeliveryPincodes::State)
                            .string_len(120)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(DeliveryPincodes::DeliveryDays)
                            .small_integer()
                            .not_null()
                            .default(3),
                    )
                    .col(
                        ColumnDef::new(DeliveryPincodes::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(DeliveryPincodes::Source)
                            .string_len(20)
                            .not_null()
                            .default("db"),
                    )
                    .col(
                        ColumnDef::new(DeliveryPincodes::LastChecked)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(DeliveryPincodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .col(
                        ColumnDef::new(DeliveryPincodes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeliveryPincodes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DeliveryPincodes {
    Table,
    Id,
    Pincode,
    City,
    State,
    DeliveryDays,
    Active,
    Source,
    LastChecked,
    CreatedAt,
    UpdatedAt,
}
