use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create checkout_addresses table
        manager
            .create_table(
                Table::create()
                    .table(CheckoutAddresses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CheckoutAddresses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CheckoutAddresses::UserId).integer().null())
                    .col(
                        ColumnDef::new(CheckoutAddresses::SessionKey)
                            .string_len(40)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(CheckoutAddresses::Label)
                            .string_len(20)
                            .not_null()
                            .default("home"),
                    )
                    .col(
                        ColumnDef::new(CheckoutAddresses::Name)
                            .string_len(120)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CheckoutAddresses::Phone)
                            .string_len(30)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CheckoutAddresses::Email)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(CheckoutAddresses::AddressLine1)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CheckoutAddresses::AddressLine2)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(CheckoutAddresses::City)
                            .string_len(120)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CheckoutAddresses::State)
                            .string_len(120)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CheckoutAddresses::Pincode)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CheckoutAddresses::IsDefault)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CheckoutAddresses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .col(
                        ColumnDef::new(CheckoutAddresses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await?;

        // Create indexes for owner-scoped lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_checkout_addresses_user_id")
                    .table(CheckoutAddresses::Table)
                    .col(CheckoutAddresses::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_checkout_addresses_session_key")
                    .table(CheckoutAddresses::Table)
                    .col(CheckoutAddresses::SessionKey)
                    .to_owned(),
            )
            .await?;

        // Create checkout_orders table
        manager
            .create_table(
                Table::create()
                    .table(CheckoutOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CheckoutOrders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CheckoutOrders::UserId).integer().null())
                    .col(
                        ColumnDef::new(CheckoutOrders::SessionKey)
                            .string_len(40)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(CheckoutOrders::AddressId).integer().null())
                    .col(
                        ColumnDef::new(CheckoutOrders::AmountPaise)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CheckoutOrders::Currency)
                            .string_len(10)
                            .not_null()
                            .default("INR"),
                    )
                    .col(
                        ColumnDef::new(CheckoutOrders::RazorpayOrderId)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CheckoutOrders::Status)
                            .string_len(20)
                            .not_null()
                            .default("created"),
                    )
                    .col(
                        ColumnDef::new(CheckoutOrders::Items)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CheckoutOrders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_checkout_orders_address")
                            .from(CheckoutOrders::Table, CheckoutOrders::AddressId)
                            .to(CheckoutAddresses::Table, CheckoutAddresses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_checkout_orders_user_id")
                    .table(CheckoutOrders::Table)
                    .col(CheckoutOrders::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_checkout_orders_session_key")
                    .table(CheckoutOrders::Table)
                    .col(CheckoutOrders::SessionKey)
                    .to_owned(),
            )
            .await?;

        // Create checkout_payments table
        manager
            .create_table(
                Table::create()
                    .table(CheckoutPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CheckoutPayments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CheckoutPayments::OrderId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CheckoutPayments::RazorpayPaymentId)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CheckoutPayments::RazorpaySignature)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CheckoutPayments::Status)
                            .string_len(20)
                            .not_null()
                            .default("captured"),
                    )
                    .col(
                        ColumnDef::new(CheckoutPayments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_checkout_payments_order")
                            .from(CheckoutPayments::Table, CheckoutPayments::OrderId)
                            .to(CheckoutOrders::Table, CheckoutOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CheckoutPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CheckoutOrders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CheckoutAddresses::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum CheckoutAddresses {
    Table,
    Id,
    UserId,
    SessionKey,
    Label,
    Name,
    Phone,
    Email,
    AddressLine1,
    AddressLine2,
    City,
    State,
    Pincode,
    IsDefault,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CheckoutOrders {
    Table,
    Id,
    UserId,
    SessionKey,
    AddressId,
    AmountPaise,
    Currency,
    RazorpayOrderId,
    Status,
    Items,
    CreatedAt,
}

#[derive(Iden)]
enum CheckoutPayments {
    Table,
    Id,
    OrderId,
    RazorpayPaymentId,
    RazorpaySignature,
    Status,
    CreatedAt,
}
