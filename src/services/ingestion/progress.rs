//! 导入进度观察者
//!
//! 流水线不直接打日志，而是把事件交给注入的 `IngestObserver`。
//! 默认实现转发到 tracing；CLI 使用 `ConsoleObserver` 输出彩色进度行。

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;

use colored::Colorize;
use tracing::{debug, error, info, warn};

use super::IngestReport;
use crate::storage::WriteMode;
use crate::utils::csv_handler::CsvLayout;

/// 单行进度
#[derive(Debug, Clone, PartialEq)]
pub struct RowProgressEvent {
    /// 已处理行数（1-based）
    pub processed: usize,
    pub total: usize,
    pub country: String,
    pub first_ip: String,
    pub last_ip: String,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub city: Option<String>,
}

impl RowProgressEvent {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.processed as f64 / self.total as f64 * 100.0
    }

    /// `[ 42.5% |     17 /     40] - Country: [US] - IP Range: [..] - Region: [..] - Subregion: [..] - City: [..]`
    pub fn format_line(&self) -> String {
        format!(
            "[{:5.1}% | {:>6} / {:>6}] - Country: [{:>2}] - IP Range: [{:<15} - {:<15}] - Region: [{}] - Subregion: [{}] - City: [{}]",
            self.percentage(),
            self.processed,
            self.total,
            self.country,
            self.first_ip,
            self.last_ip,
            self.region.as_deref().unwrap_or(""),
            self.subregion.as_deref().unwrap_or(""),
            self.city.as_deref().unwrap_or(""),
        )
    }
}

#[derive(Debug, Clone)]
pub enum IngestEvent {
    /// CSV 已读入并通过验证，即将写入
    Started {
        path: PathBuf,
        mode: WriteMode,
        layout: CsvLayout,
        total_rows: usize,
    },
    Progress(RowProgressEvent),
    Completed(IngestReport),
    Failed { path: PathBuf, message: String },
}

pub trait IngestObserver: Send + Sync {
    fn on_event(&self, event: &IngestEvent);
}

/// 调用观察者；观察者 panic 不影响导入结果
pub(crate) fn notify(observer: &dyn IngestObserver, event: &IngestEvent) {
    if catch_unwind(AssertUnwindSafe(|| observer.on_event(event))).is_err() {
        warn!("Ingest observer panicked; event dropped");
    }
}

pub fn completion_line(total_rows: usize) -> String {
    format!("CSV file processed successfully. Total rows: {}", total_rows)
}

/// 转发到 tracing（默认）
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl IngestObserver for TracingObserver {
    fn on_event(&self, event: &IngestEvent) {
        match event {
            IngestEvent::Started {
                path,
                mode,
                layout,
                total_rows,
            } => info!(
                "Seeding {} rows from {} ({:?} layout, {} mode)",
                total_rows,
                path.display(),
                layout,
                mode
            ),
            IngestEvent::Progress(row) => debug!("{}", row.format_line()),
            IngestEvent::Completed(report) => {
                info!("{}", completion_line(report.total_rows));
                info!(
                    "{} records in store after {} ({} ms)",
                    report.records_after,
                    report.mode,
                    report.elapsed.as_millis()
                );
            }
            IngestEvent::Failed { path, message } => {
                error!("Failed to process CSV file {}: {}", path.display(), message)
            }
        }
    }
}

/// 终端彩色输出（CLI `seed`）
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleObserver;

impl IngestObserver for ConsoleObserver {
    fn on_event(&self, event: &IngestEvent) {
        match event {
            IngestEvent::Started {
                path,
                mode,
                total_rows,
                ..
            } => println!(
                "{} {} rows from {} ({} mode)",
                "Seeding".bold().blue(),
                total_rows.to_string().cyan(),
                path.display().to_string().cyan(),
                mode.to_string().yellow()
            ),
            IngestEvent::Progress(row) => println!("{}", row.format_line()),
            IngestEvent::Completed(report) => {
                println!(
                    "{} {}",
                    "✓".bold().green(),
                    completion_line(report.total_rows).green()
                );
                println!(
                    "  {} records in store ({} ms)",
                    report.records_after.to_string().green(),
                    report.elapsed.as_millis()
                );
            }
            IngestEvent::Failed { path, message } => eprintln!(
                "{} Failed to process CSV file {}: {}",
                "✗".bold().red(),
                path.display(),
                message.red()
            ),
        }
    }
}
