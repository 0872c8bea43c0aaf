//! CSV → IP 段存储的导入流水线
//!
//! 整个文件读入并验证后再按国家代码稳定排序，最后一次性交给存储写入。
//! 验证失败时存储不会被触碰。

mod progress;
mod validation;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{error, info};

use crate::errors::Result;
use crate::storage::{RangeRecord, RangeStore, WriteMode};
use crate::utils::csv_handler::{CsvSource, read_range_csv};

pub use progress::{
    ConsoleObserver, IngestEvent, IngestObserver, RowProgressEvent, TracingObserver,
    completion_line,
};
pub use validation::{PreparedRow, validate_range_row};

use progress::notify;

/// 导入结果
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub mode: WriteMode,
    /// CSV 数据行数（不含表头）
    pub total_rows: usize,
    /// 交给存储写入的行数
    pub written: usize,
    pub records_after: u64,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }
}

pub struct IngestionPipeline {
    store: Arc<dyn RangeStore>,
    observer: Arc<dyn IngestObserver>,
}

impl IngestionPipeline {
    pub fn new(store: Arc<dyn RangeStore>) -> Self {
        Self::with_observer(store, Arc::new(TracingObserver))
    }

    pub fn with_observer(store: Arc<dyn RangeStore>, observer: Arc<dyn IngestObserver>) -> Self {
        Self { store, observer }
    }

    /// 读取 `path` 并按 `mode` 写入存储
    pub async fn run(&self, path: &Path, mode: WriteMode) -> Result<IngestReport> {
        let result = match read_range_csv(path) {
            Ok(source) => self.apply(path, source, mode).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            error!(
                "Ingestion of {} aborted ({} mode): {}",
                path.display(),
                mode,
                e
            );
            notify(
                self.observer.as_ref(),
                &IngestEvent::Failed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                },
            );
        }

        result
    }

    /// 写入已读取的 CSV 数据
    pub async fn apply(
        &self,
        path: &Path,
        source: CsvSource,
        mode: WriteMode,
    ) -> Result<IngestReport> {
        let started = Instant::now();
        let layout = source.layout;

        let mut rows = source
            .rows
            .into_iter()
            .map(validate_range_row)
            .collect::<Result<Vec<PreparedRow>>>()?;

        sort_by_country(&mut rows);

        let total = rows.len();
        notify(
            self.observer.as_ref(),
            &IngestEvent::Started {
                path: PathBuf::from(path),
                mode,
                layout,
                total_rows: total,
            },
        );

        let records: Vec<RangeRecord> = rows.iter().map(|r| r.record.clone()).collect();
        let observer = self.observer.as_ref();
        let on_row = |idx: usize| {
            if let Some(row) = rows.get(idx) {
                notify(observer, &IngestEvent::Progress(progress_event(row, idx + 1, total)));
            }
        };

        let summary = self.store.write(&records, mode, &on_row).await?;

        let report = IngestReport {
            mode,
            total_rows: total,
            written: summary.rows_applied,
            records_after: summary.records_after,
            elapsed: started.elapsed(),
        };

        info!(
            "Ingested {} into {} store: {} rows, {} records",
            path.display(),
            self.store.name(),
            report.written,
            report.records_after
        );
        notify(self.observer.as_ref(), &IngestEvent::Completed(report.clone()));

        Ok(report)
    }
}

/// 按国家代码字节序稳定排序
pub fn sort_by_country(rows: &mut [PreparedRow]) {
    rows.sort_by(|a, b| a.record.country.as_bytes().cmp(b.record.country.as_bytes()));
}

fn progress_event(row: &PreparedRow, processed: usize, total: usize) -> RowProgressEvent {
    RowProgressEvent {
        processed,
        total,
        country: row.record.country.clone(),
        first_ip: row.first_literal.clone(),
        last_ip: row.last_literal.clone(),
        region: row.record.region.clone(),
        subregion: row.record.subregion.clone(),
        city: row.record.city.clone(),
    }
}
