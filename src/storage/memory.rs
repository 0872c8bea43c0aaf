//! 内存 IP 段存储
//!
//! 按 (first_ip, last_ip) 排序的 Vec，二分查找定位候选区间。
//! 写入时在副本上构建完整数据集后通过 ArcSwap 一次性替换，
//! 读路径无锁，且读者不会看到中间状态。

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::errors::Result;
use crate::storage::models::{RangeRecord, WriteMode, WriteSummary};
use crate::storage::traits::{RangeStore, RowProgress};

pub struct MemoryRangeStore {
    ranges: ArcSwap<Vec<RangeRecord>>,
    /// 串行化写者；读者不加锁
    write_lock: Mutex<()>,
}

impl Default for MemoryRangeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRangeStore {
    pub fn new() -> Self {
        Self {
            ranges: ArcSwap::from_pointee(Vec::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// 以给定记录初始化（重复键首条生效）
    pub fn from_records(records: Vec<RangeRecord>) -> Self {
        let store = Self::new();
        store.ranges.store(Arc::new(build_replacement(&records, &|_| {})));
        store
    }

    /// 当前数据集快照
    pub fn snapshot(&self) -> Arc<Vec<RangeRecord>> {
        self.ranges.load_full()
    }
}

/// 在按 first_ip 排序的区间表中查找包含 `ip` 的记录
pub fn lookup_sorted(ranges: &[RangeRecord], ip: u32) -> Option<&RangeRecord> {
    let idx = ranges.partition_point(|r| r.first_ip <= ip);
    if idx == 0 {
        return None;
    }
    let candidate = &ranges[idx - 1];
    candidate.contains(ip).then_some(candidate)
}

fn build_replacement(records: &[RangeRecord], progress: &RowProgress<'_>) -> Vec<RangeRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut next = Vec::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        if seen.insert(record.key()) {
            next.push(record.clone());
        }
        progress(idx);
    }
    next.sort_by_key(RangeRecord::key);
    next
}

fn build_merge(
    current: &[RangeRecord],
    records: &[RangeRecord],
    progress: &RowProgress<'_>,
) -> Vec<RangeRecord> {
    let mut merged: BTreeMap<(u32, u32), RangeRecord> =
        current.iter().map(|r| (r.key(), r.clone())).collect();
    for (idx, record) in records.iter().enumerate() {
        merged.insert(record.key(), record.clone());
        progress(idx);
    }
    merged.into_values().collect()
}

#[async_trait]
impl RangeStore for MemoryRangeStore {
    async fn find_containing(&self, ip: u32) -> Result<Option<RangeRecord>> {
        let ranges = self.ranges.load();
        Ok(lookup_sorted(&ranges, ip).cloned())
    }

    async fn write(
        &self,
        records: &[RangeRecord],
        mode: WriteMode,
        progress: &RowProgress<'_>,
    ) -> Result<WriteSummary> {
        let _guard = self.write_lock.lock();

        let next = match mode {
            WriteMode::Replace => build_replacement(records, progress),
            WriteMode::Update => build_merge(&self.ranges.load(), records, progress),
        };
        let records_after = next.len() as u64;
        self.ranges.store(Arc::new(next));

        debug!(
            "Memory store {} applied {} rows, {} records now",
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

    async fn count(&self) -> Result<u64> {
        Ok(self.ranges.load().len() as u64)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
