use chrono::{DateTime, Utc};

use crate::errors::{IpCountryError, Result};
use crate::storage::RangeRecord;
use migration::entities::ip_country;

/// BIGINT 列 → u32
fn column_to_ip(value: i64, column: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        IpCountryError::store_failure(format!("{} 超出 IPv4 数值范围: {}", column, value))
    })
}

/// 将 Sea-ORM Model 转换为 RangeRecord
pub fn model_to_record(model: ip_country::Model) -> Result<RangeRecord> {
    Ok(RangeRecord {
        first_ip: column_to_ip(model.first_ip, "first_ip")?,
        last_ip: column_to_ip(model.last_ip, "last_ip")?,
        country: model.country,
        region: model.region,
        subregion: model.subregion,
        city: model.city,
        timezone: model.timezone,
        latitude: model.latitude,
        longitude: model.longitude,
    })
}

/// 将 RangeRecord 转换为 ActiveModel（用于插入/upsert）
pub fn record_to_active_model(record: &RangeRecord, now: DateTime<Utc>) -> ip_country::ActiveModel {
    use sea_orm::ActiveValue::*;

    ip_country::ActiveModel {
        id: NotSet,
        first_ip: Set(i64::from(record.first_ip)),
        last_ip: Set(i64::from(record.last_ip)),
        country: Set(record.country.clone()),
        region: Set(record.region.clone()),
        subregion: Set(record.subregion.clone()),
        city: Set(record.city.clone()),
        timezone: Set(record.timezone.clone()),
        latitude: Set(record.latitude),
        longitude: Set(record.longitude),
        created_at: Set(now),
        updated_at: Set(now),
    }
}
