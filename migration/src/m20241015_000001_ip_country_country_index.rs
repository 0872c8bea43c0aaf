//! country 索引
//!
//! 种子数据按国家排序写入，运维排查时也常按国家统计。

use sea_orm_migration::prelude::*;

use crate::m20241001_000001_ip_country_table::IpCountry;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ip_country_country")
                    .table(IpCountry::Table)
                    .col(IpCountry::Country)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_ip_country_country")
                    .table(IpCountry::Table)
                    .to_owned(),
            )
            .await
    }
}
