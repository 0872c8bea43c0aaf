use async_trait::async_trait;

use crate::errors::Result;
use crate::storage::models::{RangeRecord, WriteMode, WriteSummary};

/// 逐行进度回调，参数为输入切片中的行下标
pub type RowProgress<'a> = dyn Fn(usize) + Send + Sync + 'a;

/// IP 段存储
///
/// 读操作无副作用；写操作对并发读者原子可见：
/// 读者只会看到写入前或写入后的完整数据集。
#[async_trait]
pub trait RangeStore: Send + Sync {
    /// 查找包含 `ip` 的记录
    async fn find_containing(&self, ip: u32) -> Result<Option<RangeRecord>>;

    /// 批量写入
    ///
    /// 每处理一行调用一次 `progress`。
    async fn write(
        &self,
        records: &[RangeRecord],
        mode: WriteMode,
        progress: &RowProgress<'_>,
    ) -> Result<WriteSummary>;

    /// 当前记录数
    async fn count(&self) -> Result<u64>;

    /// 存储名称（用于日志）
    fn name(&self) -> &'static str;
}
