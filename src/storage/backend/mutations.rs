//! Mutation operations for SeaOrmRangeStore
//!
//! 整个批次在一个事务内完成：replace 模式下的清空与插入对读者原子可见，
//! 任意一步失败时事务随 drop 回滚，表保持写入前的状态。

use chrono::Utc;
use sea_orm::{
    DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait, TransactionTrait,
    sea_query::OnConflict,
};
use tracing::info;

use super::SeaOrmRangeStore;
use super::converters::record_to_active_model;
use crate::errors::{IpCountryError, Result};
use crate::storage::traits::RowProgress;
use crate::storage::{RangeRecord, WriteMode, WriteSummary};

use migration::entities::ip_country;

fn range_key_conflict() -> OnConflict {
    OnConflict::columns([ip_country::Column::FirstIp, ip_country::Column::LastIp])
}

impl SeaOrmRangeStore {
    pub async fn write_records(
        &self,
        records: &[RangeRecord],
        mode: WriteMode,
        progress: &RowProgress<'_>,
    ) -> Result<WriteSummary> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| IpCountryError::store_failure(format!("开始事务失败: {}", e)))?;

        match mode {
            WriteMode::Replace => self.replace_in(&txn, records, progress).await?,
            WriteMode::Update => self.upsert_in(&txn, records, progress).await?,
        }

        let records_after = ip_country::Entity::find()
            .count(&txn)
            .await
            .map_err(|e| IpCountryError::store_failure(format!("统计记录数失败: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| IpCountryError::store_failure(format!("提交事务失败: {}", e)))?;

        info!(
            "{} committed {} rows ({} records in table)",
            mode,
            records.len(),
            records_after
        );

        Ok(WriteSummary {
            mode,
            rows_applied: records.len(),
            records_after,
        })
    }

    /// 清空后分块插入；批内重复键由 ON CONFLICT DO NOTHING 保留首条
    async fn replace_in(
        &self,
        txn: &DatabaseTransaction,
        records: &[RangeRecord],
        progress: &RowProgress<'_>,
    ) -> Result<()> {
        ip_country::Entity::delete_many()
            .exec(txn)
            .await
            .map_err(|e| IpCountryError::store_failure(format!("清空 ip_country 失败: {}", e)))?;
        info!("Table 'ip_country' has been cleared.");

        let now = Utc::now();
        let batch_size = self.batch_size.max(1);

        for (chunk_idx, chunk) in records.chunks(batch_size).enumerate() {
            let models: Vec<ip_country::ActiveModel> = chunk
                .iter()
                .map(|record| record_to_active_model(record, now))
                .collect();

            let result = ip_country::Entity::insert_many(models)
                .on_conflict(range_key_conflict().do_nothing().to_owned())
                .exec(txn)
                .await;

            match result {
                // 整块都是重复键
                Ok(_) | Err(DbErr::RecordNotInserted) => {}
                Err(e) => {
                    let first_row = chunk_idx * batch_size;
                    return Err(IpCountryError::store_failure(format!(
                        "批量插入失败 (rows {}-{}): {}",
                        first_row + 1,
                        first_row + chunk.len(),
                        e
                    )));
                }
            }

            for offset in 0..chunk.len() {
                progress(chunk_idx * batch_size + offset);
            }
        }

        Ok(())
    }

    /// 逐行 upsert；批内重复键末条生效
    async fn upsert_in(
        &self,
        txn: &DatabaseTransaction,
        records: &[RangeRecord],
        progress: &RowProgress<'_>,
    ) -> Result<()> {
        let now = Utc::now();

        for (idx, record) in records.iter().enumerate() {
            // created_at 不在更新列中，已存在的行保留原值
            let active_model = record_to_active_model(record, now);

            ip_country::Entity::insert(active_model)
                .on_conflict(
                    range_key_conflict()
                        .update_columns([
                            ip_country::Column::Country,
                            ip_country::Column::Region,
                            ip_country::Column::Subregion,
                            ip_country::Column::City,
                            ip_country::Column::Timezone,
                            ip_country::Column::Latitude,
                            ip_country::Column::Longitude,
                            ip_country::Column::UpdatedAt,
                        ])
                        .to_owned(),
                )
                .exec(txn)
                .await
                .map_err(|e| {
                    IpCountryError::store_failure(format!(
                        "Upsert 区间 {}-{} 失败: {}",
                        record.first_ip, record.last_ip, e
                    ))
                })?;

            progress(idx);
        }

        Ok(())
    }
}
