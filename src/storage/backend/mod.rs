//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod connection;
mod converters;
mod mutations;
mod query;
pub mod retry;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::config::DatabaseConfig;
use crate::errors::{IpCountryError, Result};
use crate::storage::models::{RangeRecord, WriteMode, WriteSummary};
use crate::storage::traits::{RangeStore, RowProgress};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_record, record_to_active_model};
pub use retry::RetryPolicy;

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(IpCountryError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// 规范化 backend 名称
pub fn normalize_backend_name(backend: &str) -> String {
    match backend {
        "mariadb" => "mysql".to_string(),
        other => other.to_string(),
    }
}

/// SeaORM-based range store
#[derive(Clone)]
pub struct SeaOrmRangeStore {
    db: DatabaseConnection,
    backend_name: String,
    retry_policy: RetryPolicy,
    /// replace 模式每条 INSERT 的行数
    batch_size: usize,
}

impl SeaOrmRangeStore {
    pub async fn new(config: &DatabaseConfig, batch_size: usize) -> Result<Self> {
        let database_url = config.database_url.as_str();
        if database_url.is_empty() {
            return Err(IpCountryError::database_config(
                "database_url 未设置".to_string(),
            ));
        }

        let backend_name = normalize_backend_name(&infer_backend_from_url(database_url)?);

        // 根据不同数据库类型配置连接选项
        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, &backend_name, config.pool_size).await?
        };

        // 运行迁移
        run_migrations(&db).await?;

        let store = SeaOrmRangeStore {
            db,
            backend_name,
            retry_policy: RetryPolicy {
                max_retries: config.retry_count,
                base_delay_ms: config.retry_base_delay_ms,
                max_delay_ms: config.retry_max_delay_ms,
            },
            batch_size,
        };

        warn!("{} Storage initialized.", store.backend_name.to_uppercase());
        Ok(store)
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }
}

#[async_trait]
impl RangeStore for SeaOrmRangeStore {
    async fn find_containing(&self, ip: u32) -> Result<Option<RangeRecord>> {
        self.find_containing_record(ip).await
    }

    async fn write(
        &self,
        records: &[RangeRecord],
        mode: WriteMode,
        progress: &RowProgress<'_>,
    ) -> Result<WriteSummary> {
        self.write_records(records, mode, progress).await
    }

    async fn count(&self) -> Result<u64> {
        self.count_records().await
    }

    fn name(&self) -> &'static str {
        "sea-orm"
    }
}
