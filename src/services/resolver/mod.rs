//! IP → 国家解析引擎
//!
//! 分层策略：IP 段匹配 → 时区回退 → `"Unknown"`。
//! 每层的结果用 `Tier` 显式表示，`resolve` 本身从不返回错误。

pub mod timezone;

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use tracing::{debug, info, warn};

use crate::storage::{RangeRecord, RangeStore};
use crate::utils::ip::{ip_to_numeric, is_loopback_literal};

pub use timezone::{UNKNOWN_COUNTRY, country_for_timezone, timezone_to_country};

/// 对外的查询状态
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CountryStatus {
    Success,
    IpNotInRange,
    NotFound,
    #[default]
    Unknown,
}

/// 走到时区回退的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// 请求未携带可用 IP
    MissingAddress,
    /// 127.0.0.1 / ::1
    Loopback,
    MalformedAddress(String),
    StoreFailure(String),
    NoMatch,
}

impl FallbackReason {
    /// 缺失或本地地址不视为查找失败
    pub fn status(&self) -> CountryStatus {
        match self {
            Self::MissingAddress | Self::Loopback => CountryStatus::IpNotInRange,
            Self::MalformedAddress(_) | Self::StoreFailure(_) | Self::NoMatch => {
                CountryStatus::NotFound
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tier {
    Success,
    Fallback(FallbackReason),
    Unknown,
}

impl Tier {
    pub fn status(&self) -> CountryStatus {
        match self {
            Self::Success => CountryStatus::Success,
            Self::Fallback(reason) => reason.status(),
            Self::Unknown => CountryStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub country: String,
    pub status: CountryStatus,
    pub tier: Tier,
    /// 仅 `Tier::Success` 时存在
    pub record: Option<RangeRecord>,
}

impl Resolution {
    fn from_tier(country: impl Into<String>, tier: Tier, record: Option<RangeRecord>) -> Self {
        Self {
            country: country.into(),
            status: tier.status(),
            tier,
            record,
        }
    }

    /// 两层都没有结果
    pub fn unknown() -> Self {
        Self::from_tier(UNKNOWN_COUNTRY, Tier::Unknown, None)
    }
}

#[derive(Debug, Clone)]
pub enum ResolveEvent<'a> {
    Matched {
        ip: &'a str,
        record: &'a RangeRecord,
    },
    Fallback {
        ip: Option<&'a str>,
        timezone: &'a str,
        reason: &'a FallbackReason,
        country: &'a str,
    },
}

pub trait ResolveObserver: Send + Sync {
    fn on_event(&self, event: &ResolveEvent<'_>);
}

/// 转发到 tracing（默认）
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingResolveObserver;

impl ResolveObserver for TracingResolveObserver {
    fn on_event(&self, event: &ResolveEvent<'_>) {
        match event {
            ResolveEvent::Matched { ip, record } => debug!(
                "IP {} matched range {}-{} ({})",
                ip, record.first_ip, record.last_ip, record.country
            ),
            ResolveEvent::Fallback {
                ip,
                timezone,
                reason,
                country,
            } => match reason {
                FallbackReason::MissingAddress | FallbackReason::Loopback => info!(
                    "Local IP or missing IP detected ({:?}), using timezone {} -> {}",
                    ip, timezone, country
                ),
                FallbackReason::MalformedAddress(msg) | FallbackReason::StoreFailure(msg) => {
                    warn!(
                        "IP to country failed for {:?}, switching to timezone {} -> {}: {}",
                        ip, timezone, country, msg
                    )
                }
                FallbackReason::NoMatch => warn!(
                    "IP {:?} not in any range, switching to timezone {} -> {}",
                    ip, timezone, country
                ),
            },
        }
    }
}

pub struct Resolver {
    store: Arc<dyn RangeStore>,
    observer: Arc<dyn ResolveObserver>,
}

impl Resolver {
    pub fn new(store: Arc<dyn RangeStore>) -> Self {
        Self::with_observer(store, Arc::new(TracingResolveObserver))
    }

    pub fn with_observer(store: Arc<dyn RangeStore>, observer: Arc<dyn ResolveObserver>) -> Self {
        Self { store, observer }
    }

    pub async fn resolve(&self, ip: Option<&str>, timezone: &str) -> Resolution {
        let ip = ip.map(str::trim).filter(|s| !s.is_empty());

        let literal = match ip {
            None => return self.fallback(None, timezone, FallbackReason::MissingAddress),
            Some(literal) if is_loopback_literal(literal) => {
                return self.fallback(ip, timezone, FallbackReason::Loopback);
            }
            Some(literal) => literal,
        };

        let numeric = match ip_to_numeric(literal) {
            Ok(numeric) => numeric,
            Err(e) => {
                return self.fallback(
                    ip,
                    timezone,
                    FallbackReason::MalformedAddress(e.message().to_string()),
                );
            }
        };

        match self.store.find_containing(numeric).await {
            Ok(Some(record)) => {
                self.notify(&ResolveEvent::Matched {
                    ip: literal,
                    record: &record,
                });
                Resolution::from_tier(record.country.clone(), Tier::Success, Some(record))
            }
            Ok(None) => self.fallback(ip, timezone, FallbackReason::NoMatch),
            Err(e) => self.fallback(ip, timezone, FallbackReason::StoreFailure(e.to_string())),
        }
    }

    fn fallback(&self, ip: Option<&str>, timezone: &str, reason: FallbackReason) -> Resolution {
        let country = timezone_to_country(timezone);
        self.notify(&ResolveEvent::Fallback {
            ip,
            timezone,
            reason: &reason,
            country,
        });
        Resolution::from_tier(country, Tier::Fallback(reason), None)
    }

    fn notify(&self, event: &ResolveEvent<'_>) {
        let observer = self.observer.as_ref();
        if catch_unwind(AssertUnwindSafe(|| observer.on_event(event))).is_err() {
            warn!("Resolve observer panicked; event dropped");
        }
    }
}
