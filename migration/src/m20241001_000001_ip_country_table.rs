//! ip_country 表迁移
//!
//! 区间以 BIGINT 存储，兼容 PostgreSQL（无无符号整数类型）。
//! (first_ip, last_ip) 唯一索引同时服务于 upsert 冲突检测和区间包含查询。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IpCountry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IpCountry::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(IpCountry::FirstIp).big_integer().not_null())
                    .col(ColumnDef::new(IpCountry::LastIp).big_integer().not_null())
                    .col(ColumnDef::new(IpCountry::Country).string_len(8).not_null())
                    .col(ColumnDef::new(IpCountry::Region).string_len(255).null())
                    .col(ColumnDef::new(IpCountry::Subregion).string_len(255).null())
                    .col(ColumnDef::new(IpCountry::City).string_len(255).null())
                    .col(ColumnDef::new(IpCountry::Timezone).string_len(64).null())
                    .col(ColumnDef::new(IpCountry::Latitude).double().null())
                    .col(ColumnDef::new(IpCountry::Longitude).double().null())
                    .col(
                        ColumnDef::new(IpCountry::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IpCountry::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一索引：first_ip + last_ip（自然键）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ip_country_range")
                    .table(IpCountry::Table)
                    .col(IpCountry::FirstIp)
                    .col(IpCountry::LastIp)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // last_ip 单列索引，配合 first_ip <= x AND last_ip >= x
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ip_country_last_ip")
                    .table(IpCountry::Table)
                    .col(IpCountry::LastIp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_ip_country_last_ip")
                    .table(IpCountry::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_ip_country_range")
                    .table(IpCountry::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(IpCountry::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum IpCountry {
    #[sea_orm(iden = "ip_country")]
    Table,
    Id,
    FirstIp,
    LastIp,
    Country,
    Region,
    Subregion,
    City,
    Timezone,
    Latitude,
    Longitude,
    CreatedAt,
    UpdatedAt,
}
