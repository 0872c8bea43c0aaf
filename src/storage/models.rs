use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// IP 段记录：闭区间 `[first_ip, last_ip]` → 国家/地区/城市
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeRecord {
    pub first_ip: u32,
    pub last_ip: u32,
    pub country: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl RangeRecord {
    /// 仅包含国家信息的记录（legacy CSV）
    pub fn new(first_ip: u32, last_ip: u32, country: impl Into<String>) -> Self {
        Self {
            first_ip,
            last_ip,
            country: country.into(),
            region: None,
            subregion: None,
            city: None,
            timezone: None,
            latitude: None,
            longitude: None,
        }
    }

    /// 自然键
    #[inline]
    pub fn key(&self) -> (u32, u32) {
        (self.first_ip, self.last_ip)
    }

    #[inline]
    pub fn contains(&self, ip: u32) -> bool {
        self.first_ip <= ip && ip <= self.last_ip
    }
}

/// 批量写入模式
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WriteMode {
    /// 清空后整体插入，批内重复键首条生效
    Replace,
    /// 按 (first_ip, last_ip) upsert，批内重复键末条生效
    Update,
}

/// 批量写入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub mode: WriteMode,
    /// 处理的输入行数
    pub rows_applied: usize,
    /// 提交后表内记录数
    pub records_after: u64,
}
