//! Query operations for SeaOrmRangeStore
//!
//! This module contains all read-only database operations.

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use tracing::{error, trace};

use super::converters::model_to_record;
use super::{SeaOrmRangeStore, retry};
use crate::errors::{IpCountryError, Result};
use crate::storage::RangeRecord;
use crate::utils::ip::numeric_to_ip;

use migration::entities::ip_country;

impl SeaOrmRangeStore {
    /// `first_ip <= ip AND last_ip >= ip`，取 first_ip 最大的一条
    pub async fn find_containing_record(&self, ip: u32) -> Result<Option<RangeRecord>> {
        let db = &self.db;
        let ip_value = i64::from(ip);

        let result = retry::with_retry(
            &format!("find_containing({})", ip),
            self.retry_policy,
            || async {
                ip_country::Entity::find()
                    .filter(ip_country::Column::FirstIp.lte(ip_value))
                    .filter(ip_country::Column::LastIp.gte(ip_value))
                    .order_by_desc(ip_country::Column::FirstIp)
                    .one(db)
                    .await
            },
        )
        .await;

        match result {
            Ok(Some(model)) => {
                trace!(
                    "Range hit for {}: {}-{}",
                    numeric_to_ip(ip),
                    model.first_ip,
                    model.last_ip
                );
                model_to_record(model).map(Some)
            }
            Ok(None) => Ok(None),
            Err(e) => {
                error!("Range lookup failed after retries: {}", e);
                Err(IpCountryError::store_failure(format!(
                    "Range lookup for {} failed: {}",
                    ip, e
                )))
            }
        }
    }

    pub async fn count_records(&self) -> Result<u64> {
        let db = &self.db;
        retry::with_retry("count", self.retry_policy, || async {
            ip_country::Entity::find().count(db).await
        })
        .await
        .map_err(|e| IpCountryError::store_failure(format!("Count failed: {}", e)))
    }

    /// 按 (first_ip, last_ip) 顺序加载全部记录
    pub async fn load_all(&self) -> Result<Vec<RangeRecord>> {
        let models = ip_country::Entity::find()
            .order_by_asc(ip_country::Column::FirstIp)
            .order_by_asc(ip_country::Column::LastIp)
            .all(&self.db)
            .await?;
        models.into_iter().map(model_to_record).collect()
    }
}
