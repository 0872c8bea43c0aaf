//! IP 段 CSV 读取
//!
//! 两种布局：
//! - Modern: `firstIp,lastIp,country,region,subregion,city,<ignored>,latitude,longitude,timezone`，首行为表头
//! - Legacy: `firstIp,lastIp,country`，无表头
//!
//! 布局由首行字段数决定；缺失的尾部字段视为空。整个文件一次性读入内存。

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::warn;

use crate::errors::{IpCountryError, Result};
use crate::utils::ip::ip_to_numeric;

/// Legacy 布局的字段数
const LEGACY_FIELDS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    Modern,
    Legacy,
}

/// CSV 原始行（字符串字段，未做数值转换）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRangeRow {
    /// 源文件行号（1-based）
    pub line: u64,
    pub first_ip: String,
    pub last_ip: String,
    pub country: String,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub timezone: Option<String>,
}

/// 读取结果
#[derive(Debug, Clone)]
pub struct CsvSource {
    pub layout: CsvLayout,
    pub rows: Vec<RawRangeRow>,
}

/// 从文件读取 IP 段 CSV
pub fn read_range_csv<P: AsRef<Path>>(path: P) -> Result<CsvSource> {
    let file = File::open(path.as_ref()).map_err(|e| {
        IpCountryError::source_unavailable(format!(
            "Unable to open CSV file: {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    read_range_csv_from_reader(BufReader::new(file))
}

/// 从任意 reader 读取 IP 段 CSV
pub fn read_range_csv_from_reader<R: Read>(reader: R) -> Result<CsvSource> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut layout = None;
    let mut rows = Vec::new();

    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let current = match layout {
            Some(current) => current,
            None => {
                let detected = if record.len() > LEGACY_FIELDS {
                    CsvLayout::Modern
                } else {
                    CsvLayout::Legacy
                };
                layout = Some(detected);

                if detected == CsvLayout::Modern {
                    // 表头行
                    if record.get(0).is_some_and(|f| ip_to_numeric(f).is_ok()) {
                        warn!(
                            "CSV line {}: header row looks like data and is skipped: {:?}",
                            line,
                            record.get(0)
                        );
                    }
                    continue;
                }
                detected
            }
        };

        rows.push(parse_record(&record, line, current)?);
    }

    Ok(CsvSource {
        layout: layout.unwrap_or(CsvLayout::Legacy),
        rows,
    })
}

fn parse_record(record: &StringRecord, line: u64, layout: CsvLayout) -> Result<RawRangeRow> {
    if record.len() < LEGACY_FIELDS {
        return Err(IpCountryError::csv_format(format!(
            "Row {}: expected at least {} fields, got {}",
            line,
            LEGACY_FIELDS,
            record.len()
        )));
    }

    let field = |idx: usize| -> Option<String> {
        if layout == CsvLayout::Legacy {
            return None;
        }
        record
            .get(idx)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Ok(RawRangeRow {
        line,
        first_ip: record[0].to_string(),
        last_ip: record[1].to_string(),
        country: record[2].to_string(),
        region: field(3),
        subregion: field(4),
        city: field(5),
        latitude: field(7),
        longitude: field(8),
        timezone: field(9),
    })
}
