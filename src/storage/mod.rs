use std::sync::Arc;

use crate::config::StaticConfig;
use crate::errors::Result;

pub mod backend;
pub mod memory;
pub mod models;
pub mod traits;

pub use backend::SeaOrmRangeStore;
pub use memory::MemoryRangeStore;
pub use models::{RangeRecord, WriteMode, WriteSummary};
pub use traits::{RangeStore, RowProgress};

pub struct StorageFactory;

impl StorageFactory {
    /// 按配置创建持久化存储（数据库类型从 URL 推断，自动迁移）
    pub async fn create(config: &StaticConfig) -> Result<Arc<dyn RangeStore>> {
        let storage =
            SeaOrmRangeStore::new(&config.database, config.ingestion.batch_size).await?;
        Ok(Arc::new(storage))
    }
}
