//! 导入行验证
//!
//! "raw string fields → RangeRecord" 的转换。任何一行失败即中止整个批次，
//! 在存储被触碰之前完成。

use tracing::warn;

use crate::errors::{IpCountryError, Result};
use crate::storage::RangeRecord;
use crate::utils::csv_handler::RawRangeRow;
use crate::utils::ip::ip_to_numeric;

/// 已验证的行，保留原始 IP 字面量用于进度输出
#[derive(Debug, Clone)]
pub struct PreparedRow {
    pub line: u64,
    pub first_literal: String,
    pub last_literal: String,
    pub record: RangeRecord,
}

/// 验证并转换单个导入行
///
/// 1. first_ip / last_ip 转数值（失败 → MalformedAddress，带行号）
/// 2. first_ip <= last_ip
/// 3. 坐标解析（失败视为缺失）
pub fn validate_range_row(raw: RawRangeRow) -> Result<PreparedRow> {
    let first_ip = convert_ip(&raw.first_ip, raw.line)?;
    let last_ip = convert_ip(&raw.last_ip, raw.line)?;

    if first_ip > last_ip {
        return Err(IpCountryError::validation(format!(
            "Row {}: first_ip {} is greater than last_ip {}",
            raw.line, raw.first_ip, raw.last_ip
        )));
    }

    let latitude = parse_coordinate(raw.latitude.as_deref(), "latitude", raw.line);
    let longitude = parse_coordinate(raw.longitude.as_deref(), "longitude", raw.line);

    Ok(PreparedRow {
        line: raw.line,
        first_literal: raw.first_ip,
        last_literal: raw.last_ip,
        record: RangeRecord {
            first_ip,
            last_ip,
            country: raw.country,
            region: raw.region,
            subregion: raw.subregion,
            city: raw.city,
            timezone: raw.timezone,
            latitude,
            longitude,
        },
    })
}

fn convert_ip(literal: &str, line: u64) -> Result<u32> {
    ip_to_numeric(literal).map_err(|e| {
        IpCountryError::malformed_address(format!("Row {}: {}", line, e.message()))
    })
}

fn parse_coordinate(value: Option<&str>, column: &str, line: u64) -> Option<f64> {
    let value = value?;
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            warn!("Row {}: ignoring invalid {} '{}'", line, column, value);
            None
        }
    }
}
