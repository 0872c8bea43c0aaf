use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::api::middleware::AuthGate;
use crate::config::get_config;
use crate::services::{LookupService, Resolver};
use crate::storage::{RangeStore, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<dyn RangeStore>,
    pub lookup_service: LookupService,
    pub auth_gate: Arc<AuthGate>,
}

/// 准备服务器启动的上下文
/// 包括存储（含迁移）、查询服务和鉴权配置
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = get_config();

    let storage = StorageFactory::create(&config)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.name());

    match storage.count().await {
        Ok(0) => warn!(
            "Range table is empty; every lookup will fall back to timezone. Run `ipcountry seed` to load {}",
            config.ingestion.csv_path
        ),
        Ok(count) => info!("{} IP ranges available", count),
        Err(e) => warn!("Failed to count IP ranges (non-fatal): {}", e),
    }

    let lookup_service = LookupService::new(
        Resolver::new(storage.clone()),
        config.lookup.default_timezone.clone(),
    );

    let auth_gate = Arc::new(AuthGate::new(&config.auth));
    if auth_gate.is_enabled() {
        if config.auth.shared_key.is_empty() || config.auth.jwt_secret.is_empty() {
            warn!("Authorization enabled but shared_key or jwt_secret is empty; all requests will be rejected");
        }
        info!("Authorization enabled for /check-ip");
    } else {
        warn!("Authorization disabled for /check-ip");
    }

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        storage,
        lookup_service,
        auth_gate,
    })
}
