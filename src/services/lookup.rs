//! 查询门面
//!
//! HTTP 入口与 CLI `lookup` 共用。补全默认时区，调用解析引擎，
//! 解析过程中的 panic 兜底为 `UNKNOWN`，调用方永远拿到一个结果。

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::services::resolver::{CountryStatus, Resolution, Resolver};
use crate::storage::RangeStore;

/// 未配置时的默认时区
pub const DEFAULT_TIMEZONE: &str = "UTC";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupRequest {
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl LookupRequest {
    pub fn new(ip: Option<String>, timezone: Option<String>) -> Self {
        Self { ip, timezone }
    }
}

/// `{ip, timezone, country, status}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupOutcome {
    pub ip: Option<String>,
    pub timezone: String,
    pub country: String,
    pub status: CountryStatus,
}

#[derive(Clone)]
pub struct LookupService {
    resolver: Arc<Resolver>,
    default_timezone: String,
}

impl LookupService {
    pub fn new(resolver: Resolver, default_timezone: impl Into<String>) -> Self {
        let default_timezone = default_timezone.into();
        Self {
            resolver: Arc::new(resolver),
            default_timezone: if default_timezone.trim().is_empty() {
                DEFAULT_TIMEZONE.to_string()
            } else {
                default_timezone
            },
        }
    }

    /// 使用默认观察者和 UTC 默认时区
    pub fn from_store(store: Arc<dyn RangeStore>) -> Self {
        Self::new(Resolver::new(store), DEFAULT_TIMEZONE)
    }

    pub fn default_timezone(&self) -> &str {
        &self.default_timezone
    }

    pub async fn check(&self, request: LookupRequest) -> LookupOutcome {
        let ip = request
            .ip
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let timezone = request
            .timezone
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.default_timezone.clone());

        let resolution = AssertUnwindSafe(self.resolver.resolve(ip.as_deref(), &timezone))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                error!("Resolution panicked for ip {:?}, timezone {}", ip, timezone);
                Resolution::unknown()
            });

        LookupOutcome {
            ip,
            timezone,
            country: resolution.country,
            status: resolution.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Result;
    use crate::storage::{MemoryRangeStore, RangeRecord, RowProgress, WriteMode, WriteSummary};
    use async_trait::async_trait;

    struct ExplodingStore;

    #[async_trait]
    impl RangeStore for ExplodingStore {
        async fn find_containing(&self, _ip: u32) -> Result<Option<RangeRecord>> {
            panic!("store exploded");
        }

        async fn write(
            &self,
            _records: &[RangeRecord],
            _mode: WriteMode,
            _progress: &RowProgress<'_>,
        ) -> Result<WriteSummary> {
            unreachable!()
        }

        async fn count(&self) -> Result<u64> {
            Ok(0)
        }

        fn name(&self) -> &'static str {
            "exploding"
        }
    }

    fn service() -> LookupService {
        let store = MemoryRangeStore::from_records(vec![RangeRecord::new(
            134_744_064,
            134_744_319,
            "US",
        )]);
        LookupService::from_store(Arc::new(store))
    }

    #[tokio::test]
    async fn test_check_success() {
        let outcome = service()
            .check(LookupRequest::new(Some("8.8.8.8".into()), Some("Asia/Tokyo".into())))
            .await;
        assert_eq!(outcome.country, "US");
        assert_eq!(outcome.status, CountryStatus::Success);
        assert_eq!(outcome.ip.as_deref(), Some("8.8.8.8"));
        assert_eq!(outcome.timezone, "Asia/Tokyo");
    }

    #[tokio::test]
    async fn test_timezone_defaults_to_utc() {
        let outcome = service()
            .check(LookupRequest::new(Some("10.0.0.1".into()), Some("  ".into())))
            .await;
        assert_eq!(outcome.timezone, "UTC");
        assert_eq!(outcome.country, "Unknown");
        assert_eq!(outcome.status, CountryStatus::NotFound);
    }

    #[tokio::test]
    async fn test_configured_default_timezone() {
        let store = Arc::new(MemoryRangeStore::new());
        let service = LookupService::new(Resolver::new(store), "Europe/Rome");
        let outcome = service.check(LookupRequest::default()).await;
        assert_eq!(outcome.timezone, "Europe/Rome");
        assert_eq!(outcome.country, "IT");
        assert_eq!(outcome.status, CountryStatus::IpNotInRange);
        assert_eq!(outcome.ip, None);
    }

    #[tokio::test]
    async fn test_panic_during_resolution_yields_unknown() {
        let service = LookupService::from_store(Arc::new(ExplodingStore));
        let outcome = service
            .check(LookupRequest::new(Some("8.8.8.8".into()), Some("America/New_York".into())))
            .await;
        assert_eq!(outcome.status, CountryStatus::Unknown);
        assert_eq!(outcome.country, "Unknown");
    }

    #[test]
    fn test_outcome_json_shape() {
        let outcome = LookupOutcome {
            ip: Some("1.1.1.1".into()),
            timezone: "UTC".into(),
            country: "AU".into(),
            status: CountryStatus::Success,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "SUCCESS");
        assert_eq!(json["country"], "AU");
        assert_eq!(json["ip"], "1.1.1.1");
    }
}
