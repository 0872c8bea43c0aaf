//! IP 段 → 国家/地区 映射实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ip_country")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// 数值形式的起始 IPv4 地址（闭区间）
    pub first_ip: i64,
    /// 数值形式的结束 IPv4 地址（闭区间）
    pub last_ip: i64,
    pub country: String,
    #[sea_orm(nullable)]
    pub region: Option<String>,
    #[sea_orm(nullable)]
    pub subregion: Option<String>,
    #[sea_orm(nullable)]
    pub city: Option<String>,
    #[sea_orm(nullable)]
    pub timezone: Option<String>,
    #[sea_orm(nullable)]
    pub latitude: Option<f64>,
    #[sea_orm(nullable)]
    pub longitude: Option<f64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
