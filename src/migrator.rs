use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_orders_table::Migration),
            Box::new(m20240101_000002_create_withdrawals_table::Migration),
            Box::new(m20240101_000003_create_referrals_table::Migration),
        ]
    }
}

mod m20240101_000001_create_orders_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Mirrors the legacy checkout feed: dates and amounts arrive as
            // text and may be null; validation happens at ingestion.
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Orders::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Orders::SellerEmail).string().not_null())
                        .col(ColumnDef::new(Orders::Status).string().not_null())
                        .col(ColumnDef::new(Orders::OrderDate).string().null())
                        .col(ColumnDef::new(Orders::ItemsTotal).string().null())
                        .col(ColumnDef::new(Orders::GrandTotal).string().null())
                        .col(ColumnDef::new(Orders::SellerSalePrice).string().null())
                        .col(ColumnDef::new(Orders::DeliveryCharge).string().null())
                        .col(ColumnDef::new(Orders::PaidAmount).string().null())
                        .col(ColumnDef::new(Orders::DueAmount).string().null())
                        .col(
                            ColumnDef::new(Orders::IsCashOnDelivery)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Orders::CreatedAt).timestamp_with_time_zone().not_null())
                        .col(ColumnDef::new(Orders::UpdatedAt).timestamp_with_time_zone().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_orders_seller_email")
                        .table(Orders::Table)
                        .col(Orders::SellerEmail)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Orders {
        Table,
        Id,
        SellerEmail,
        Status,
        OrderDate,
        ItemsTotal,
        GrandTotal,
        SellerSalePrice,
        DeliveryCharge,
        PaidAmount,
        DueAmount,
        IsCashOnDelivery,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_withdrawals_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_withdrawals_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Withdrawals::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Withdrawals::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Withdrawals::SellerEmail).string().not_null())
                        .col(ColumnDef::new(Withdrawals::Amount).decimal().not_null())
                        .col(ColumnDef::new(Withdrawals::Status).string().not_null())
                        .col(
                            ColumnDef::new(Withdrawals::RequestDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Withdrawals::ApprovalDate).timestamp_with_time_zone().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_withdrawals_seller_email")
                        .table(Withdrawals::Table)
                        .col(Withdrawals::SellerEmail)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Withdrawals::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Withdrawals {
        Table,
        Id,
        SellerEmail,
        Amount,
        Status,
        RequestDate,
        ApprovalDate,
    }
}

mod m20240101_000003_create_referrals_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_referrals_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Referrals::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Referrals::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Referrals::InviterEmail).string().not_null())
                        .col(
                            ColumnDef::new(Referrals::InvitedEmail)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Referrals::Amount).decimal().not_null())
                        .col(ColumnDef::new(Referrals::CreatedAt).timestamp_with_time_zone().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_referrals_inviter_email")
                        .table(Referrals::Table)
                        .col(Referrals::InviterEmail)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Referrals::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Referrals {
        Table,
        Id,
        InviterEmail,
        InvitedEmail,
        Amount,
        CreatedAt,
    }
}
