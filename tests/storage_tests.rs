//! Storage backend tests
//!
//! Tests for SeaOrmRangeStore using temporary SQLite databases.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use ipcountry::config::DatabaseConfig;
use ipcountry::errors::IpCountryError;
use ipcountry::services::IngestionPipeline;
use ipcountry::storage::backend::{infer_backend_from_url, normalize_backend_name};
use ipcountry::storage::{RangeRecord, RangeStore, SeaOrmRangeStore, WriteMode};
use tempfile::TempDir;

/// 创建临时 SQLite 数据库的存储实例
async fn create_temp_storage(batch_size: usize) -> (SeaOrmRangeStore, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        ..DatabaseConfig::default()
    };

    let storage = SeaOrmRangeStore::new(&config, batch_size)
        .await
        .expect("Failed to create storage");

    (storage, temp_dir)
}

fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create csv");
    file.write_all(content.as_bytes()).expect("Failed to write csv");
    path
}

fn detailed(first_ip: u32, last_ip: u32, country: &str, city: &str) -> RangeRecord {
    let mut record = RangeRecord::new(first_ip, last_ip, country);
    record.city = Some(city.to_string());
    record.timezone = Some("Europe/Berlin".to_string());
    record.latitude = Some(52.52);
    record.longitude = Some(13.40);
    record
}

// =============================================================================
// URL 推断和规范化测试
// =============================================================================

#[cfg(test)]
mod url_inference_tests {
    use super::*;

    #[test]
    fn test_infer_backends() {
        assert_eq!(infer_backend_from_url("sqlite://ranges.db").unwrap(), "sqlite");
        assert_eq!(
            infer_backend_from_url("postgres://u:p@localhost/db").unwrap(),
            "postgres"
        );
        assert_eq!(
            infer_backend_from_url("postgresql://u:p@localhost/db").unwrap(),
            "postgres"
        );
        assert_eq!(
            infer_backend_from_url("mysql://u:p@localhost/db").unwrap(),
            "mysql"
        );
    }

    #[test]
    fn test_infer_unknown_scheme_fails() {
        assert!(infer_backend_from_url("redis://localhost").is_err());
    }

    #[test]
    fn test_normalize_aliases() {
        assert_eq!(normalize_backend_name("postgres"), "postgres");
        assert_eq!(normalize_backend_name("mariadb"), "mysql");
        assert_eq!(normalize_backend_name("sqlite"), "sqlite");
    }
}

// =============================================================================
// 区间查询
// =============================================================================

#[cfg(test)]
mod containment_tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_store() {
        let (storage, _dir) = create_temp_storage(500).await;
        assert_eq!(storage.backend_name(), "sqlite");
        assert_eq!(storage.count().await.unwrap(), 0);
        assert!(storage.load_all().await.unwrap().is_empty());
        assert!(storage.find_containing(16_777_216).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_bounds_are_inclusive() {
        let (storage, _dir) = create_temp_storage(500).await;
        storage
            .write(
                &[
                    RangeRecord::new(16_777_216, 16_777_471, "AU"),
                    RangeRecord::new(16_777_472, 16_778_239, "CN"),
                ],
                WriteMode::Replace,
                &|_| {},
            )
            .await
            .unwrap();

        for ip in [16_777_216, 16_777_300, 16_777_471] {
            let hit = storage.find_containing(ip).await.unwrap().unwrap();
            assert_eq!(hit.country, "AU", "ip {}", ip);
        }
        assert_eq!(
            storage.find_containing(16_777_472).await.unwrap().unwrap().country,
            "CN"
        );
        assert!(storage.find_containing(16_777_215).await.unwrap().is_none());
        assert!(storage.find_containing(16_778_240).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_full_u32_range_round_trips() {
        let (storage, _dir) = create_temp_storage(500).await;
        storage
            .write(
                &[RangeRecord::new(u32::MAX - 10, u32::MAX, "ZZ")],
                WriteMode::Replace,
                &|_| {},
            )
            .await
            .unwrap();

        let hit = storage.find_containing(u32::MAX).await.unwrap().unwrap();
        assert_eq!(hit.key(), (u32::MAX - 10, u32::MAX));
    }

    #[tokio::test]
    async fn test_optional_fields_persist() {
        let (storage, _dir) = create_temp_storage(500).await;
        storage
            .write(
                &[detailed(100, 200, "DE", "Berlin")],
                WriteMode::Replace,
                &|_| {},
            )
            .await
            .unwrap();

        let hit = storage.find_containing(150).await.unwrap().unwrap();
        assert_eq!(hit, detailed(100, 200, "DE", "Berlin"));
    }
}

// =============================================================================
// 写入模式
// =============================================================================

#[cfg(test)]
mod write_mode_tests {
    use super::*;

    #[tokio::test]
    async fn test_replace_discards_previous_rows() {
        let (storage, _dir) = create_temp_storage(500).await;
        storage
            .write(
                &[RangeRecord::new(1, 10, "US"), RangeRecord::new(11, 20, "CA")],
                WriteMode::Replace,
                &|_| {},
            )
            .await
            .unwrap();

        let summary = storage
            .write(&[RangeRecord::new(100, 200, "JP")], WriteMode::Replace, &|_| {})
            .await
            .unwrap();

        assert_eq!(summary.records_after, 1);
        assert!(storage.find_containing(5).await.unwrap().is_none());
        assert_eq!(storage.find_containing(150).await.unwrap().unwrap().country, "JP");
    }

    #[tokio::test]
    async fn test_replace_across_multiple_batches() {
        let (storage, _dir) = create_temp_storage(3).await;
        let records: Vec<RangeRecord> = (0..10u32)
            .map(|i| RangeRecord::new(i * 100, i * 100 + 99, "BR"))
            .collect();

        let summary = storage
            .write(&records, WriteMode::Replace, &|_| {})
            .await
            .unwrap();

        assert_eq!(summary.rows_applied, 10);
        assert_eq!(summary.records_after, 10);
        assert!(storage.find_containing(999).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_replace_keeps_first_duplicate() {
        let (storage, _dir) = create_temp_storage(500).await;
        let summary = storage
            .write(
                &[RangeRecord::new(1, 10, "US"), RangeRecord::new(1, 10, "MX")],
                WriteMode::Replace,
                &|_| {},
            )
            .await
            .unwrap();

        assert_eq!(summary.records_after, 1);
        assert_eq!(storage.find_containing(5).await.unwrap().unwrap().country, "US");
    }

    #[tokio::test]
    async fn test_update_is_idempotent() {
        let (storage, _dir) = create_temp_storage(500).await;
        let records = vec![
            detailed(1, 10, "DE", "Berlin"),
            detailed(11, 20, "DE", "Hamburg"),
        ];

        storage
            .write(&records, WriteMode::Update, &|_| {})
            .await
            .unwrap();
        let summary = storage
            .write(&records, WriteMode::Update, &|_| {})
            .await
            .unwrap();

        assert_eq!(summary.records_after, 2);
        assert_eq!(storage.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_overwrites_and_inserts() {
        let (storage, _dir) = create_temp_storage(500).await;
        storage
            .write(&[detailed(1, 10, "DE", "Berlin")], WriteMode::Replace, &|_| {})
            .await
            .unwrap();

        storage
            .write(
                &[detailed(1, 10, "DE", "Munich"), RangeRecord::new(50, 60, "IT")],
                WriteMode::Update,
                &|_| {},
            )
            .await
            .unwrap();

        assert_eq!(storage.count().await.unwrap(), 2);
        let hit = storage.find_containing(5).await.unwrap().unwrap();
        assert_eq!(hit.city.as_deref(), Some("Munich"));
        assert_eq!(storage.find_containing(55).await.unwrap().unwrap().country, "IT");
    }

    #[tokio::test]
    async fn test_update_keeps_last_duplicate() {
        let (storage, _dir) = create_temp_storage(500).await;
        storage
            .write(
                &[detailed(1, 10, "DE", "Berlin"), detailed(1, 10, "DE", "Bonn")],
                WriteMode::Update,
                &|_| {},
            )
            .await
            .unwrap();

        let hit = storage.find_containing(1).await.unwrap().unwrap();
        assert_eq!(hit.city.as_deref(), Some("Bonn"));
    }

    #[tokio::test]
    async fn test_progress_reported_per_row() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let (storage, _dir) = create_temp_storage(2).await;
        let calls = AtomicUsize::new(0);
        let records: Vec<RangeRecord> = (0..5u32)
            .map(|i| RangeRecord::new(i * 10, i * 10 + 9, "NL"))
            .collect();

        storage
            .write(&records, WriteMode::Replace, &|_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }
}

// =============================================================================
// 重载隔离与回滚
// =============================================================================

#[cfg(test)]
mod reload_isolation_tests {
    use super::*;
    use sea_orm::{ConnectionTrait, Database};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn generation(count: u32, country: &str) -> Vec<RangeRecord> {
        (0..count)
            .map(|i| RangeRecord::new(i * 1_000, i * 1_000 + 999, country))
            .collect()
    }

    /// 另开连接安装触发器：插入指定国家代码时中止语句
    async fn reject_country(dir: &TempDir, country: &str) {
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let db = Database::connect(url).await.unwrap();
        db.execute_unprepared(&format!(
            "CREATE TRIGGER reject_{c} BEFORE INSERT ON ip_country \
             WHEN NEW.country = '{c}' BEGIN SELECT RAISE(ABORT, 'rejected {c}'); END;",
            c = country
        ))
        .await
        .unwrap();
        db.close().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_reader_sees_old_or_new_table_during_replace() {
        let (storage, _dir) = create_temp_storage(25).await;
        let storage = Arc::new(storage);
        storage
            .write(&generation(100, "AA"), WriteMode::Replace, &|_| {})
            .await
            .unwrap();

        let done = Arc::new(AtomicBool::new(false));
        let mut readers = Vec::new();
        for _ in 0..3 {
            let storage = storage.clone();
            let done = done.clone();
            readers.push(tokio::spawn(async move {
                let mut reads = 0usize;
                while !done.load(Ordering::Acquire) {
                    let count = storage.count().await.unwrap();
                    assert!(count == 100 || count == 250, "partial count {}", count);

                    let hit = storage.find_containing(50_500).await.unwrap();
                    let country = hit.map(|r| r.country).expect("range 50 exists in both tables");
                    assert!(country == "AA" || country == "BB", "country {}", country);

                    reads += 1;
                    tokio::task::yield_now().await;
                }
                reads
            }));
        }

        for round in 0..10 {
            let next = if round % 2 == 0 {
                generation(250, "BB")
            } else {
                generation(100, "AA")
            };
            storage
                .write(&next, WriteMode::Replace, &|_| {})
                .await
                .unwrap();
        }
        done.store(true, Ordering::Release);

        for reader in readers {
            assert!(reader.await.unwrap() > 0);
        }
        assert_eq!(storage.count().await.unwrap(), 100);
    }

    #[tokio::test]
    async fn test_failed_replace_rolls_back() {
        let (storage, dir) = create_temp_storage(2).await;
        storage
            .write(&generation(5, "AA"), WriteMode::Replace, &|_| {})
            .await
            .unwrap();
        reject_country(&dir, "XX").await;

        // 前两个批次已在事务中写入，第三个批次失败
        let mut next = generation(4, "BB");
        next.push(RangeRecord::new(900_000, 900_999, "XX"));
        let err = storage
            .write(&next, WriteMode::Replace, &|_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, IpCountryError::StoreFailure(_)));
        assert_eq!(storage.count().await.unwrap(), 5);
        let hit = storage.find_containing(1_500).await.unwrap().unwrap();
        assert_eq!(hit.country, "AA");
    }

    #[tokio::test]
    async fn test_failed_update_rolls_back() {
        let (storage, dir) = create_temp_storage(500).await;
        storage
            .write(&generation(3, "AA"), WriteMode::Replace, &|_| {})
            .await
            .unwrap();
        reject_country(&dir, "XX").await;

        let next = vec![
            RangeRecord::new(0, 999, "CC"),
            RangeRecord::new(700_000, 700_999, "DD"),
            RangeRecord::new(800_000, 800_999, "XX"),
        ];
        let err = storage
            .write(&next, WriteMode::Update, &|_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, IpCountryError::StoreFailure(_)));
        assert_eq!(storage.count().await.unwrap(), 3);
        assert_eq!(storage.find_containing(500).await.unwrap().unwrap().country, "AA");
        assert!(storage.find_containing(700_500).await.unwrap().is_none());
    }
}

// =============================================================================
// CSV 导入（SQLite）
// =============================================================================

#[cfg(test)]
mod ingestion_tests {
    use super::*;

    const SEED: &str = "\
first_ip,last_ip,country,region,subregion,city,postcode,latitude,longitude,timezone
1.0.0.0,1.0.0.255,AU,Oceania,Australia and New Zealand,Sydney,2000,-33.86,151.20,Australia/Sydney
1.0.1.0,1.0.3.255,CN,Asia,Eastern Asia,Fuzhou,,26.06,119.30,Asia/Shanghai
8.8.8.0,8.8.8.255,US,Americas,Northern America,Mountain View,94043,37.40,-122.08,America/Los_Angeles
";

    #[tokio::test]
    async fn test_seed_then_resolve() {
        let (storage, dir) = create_temp_storage(500).await;
        let store: Arc<dyn RangeStore> = Arc::new(storage);
        let path = write_csv(&dir, "seed.csv", SEED);

        let report = IngestionPipeline::new(store.clone())
            .run(&path, WriteMode::Replace)
            .await
            .unwrap();

        assert_eq!(report.total_rows, 3);
        assert_eq!(report.records_after, 3);
        let hit = store.find_containing(134_744_072).await.unwrap().unwrap();
        assert_eq!(hit.country, "US");
        assert_eq!(hit.city.as_deref(), Some("Mountain View"));
    }

    #[tokio::test]
    async fn test_update_seed_twice_keeps_row_count() {
        let (storage, dir) = create_temp_storage(500).await;
        let store: Arc<dyn RangeStore> = Arc::new(storage);
        let path = write_csv(&dir, "seed.csv", SEED);
        let pipeline = IngestionPipeline::new(store.clone());

        pipeline.run(&path, WriteMode::Update).await.unwrap();
        let report = pipeline.run(&path, WriteMode::Update).await.unwrap();

        assert_eq!(report.records_after, 3);
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_malformed_row_aborts_and_keeps_previous_data() {
        let (storage, dir) = create_temp_storage(500).await;
        let store: Arc<dyn RangeStore> = Arc::new(storage);
        let pipeline = IngestionPipeline::new(store.clone());

        let good = write_csv(&dir, "good.csv", SEED);
        pipeline.run(&good, WriteMode::Replace).await.unwrap();

        let bad = write_csv(
            &dir,
            "bad.csv",
            "9.9.9.0,9.9.9.255,CH\n999.999.999.999,1.0.0.0,XX\n",
        );
        let err = pipeline.run(&bad, WriteMode::Replace).await.unwrap_err();

        assert!(matches!(err, IpCountryError::MalformedAddress(_)));
        assert!(err.message().contains("Row 2"));
        assert!(err.message().contains("999.999.999.999"));
        assert_eq!(store.count().await.unwrap(), 3);
        assert!(store.find_containing(151_587_072).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_row_order_does_not_change_result() {
        let (first, dir_a) = create_temp_storage(500).await;
        let (second, dir_b) = create_temp_storage(500).await;
        let first: Arc<dyn RangeStore> = Arc::new(first);
        let second: Arc<dyn RangeStore> = Arc::new(second);

        let forward = write_csv(&dir_a, "f.csv", "1.0.0.0,1.0.0.255,AU\n2.0.0.0,2.0.0.255,FR\n");
        let reversed = write_csv(&dir_b, "r.csv", "2.0.0.0,2.0.0.255,FR\n1.0.0.0,1.0.0.255,AU\n");

        IngestionPipeline::new(first.clone())
            .run(&forward, WriteMode::Replace)
            .await
            .unwrap();
        IngestionPipeline::new(second.clone())
            .run(&reversed, WriteMode::Replace)
            .await
            .unwrap();

        for ip in [16_777_216u32, 16_777_471, 33_554_432, 33_554_687] {
            assert_eq!(
                first.find_containing(ip).await.unwrap(),
                second.find_containing(ip).await.unwrap()
            );
        }
    }

    #[tokio::test]
    async fn test_table_contents_independent_of_row_order() {
        let (first, dir_a) = create_temp_storage(500).await;
        let (second, _dir_b) = create_temp_storage(500).await;
        let first = Arc::new(first);
        let second = Arc::new(second);

        let forward = write_csv(&dir_a, "f.csv", "1.0.0.0,1.0.0.255,AU\n2.0.0.0,2.0.0.255,FR\n");
        let reversed = write_csv(&dir_a, "r.csv", "2.0.0.0,2.0.0.255,FR\n1.0.0.0,1.0.0.255,AU\n");

        IngestionPipeline::new(first.clone())
            .run(&forward, WriteMode::Update)
            .await
            .unwrap();
        IngestionPipeline::new(second.clone())
            .run(&reversed, WriteMode::Update)
            .await
            .unwrap();

        let a = first.load_all().await.unwrap();
        let b = second.load_all().await.unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a, b);
        assert_eq!(a[0].country, "AU");
    }

    #[tokio::test]
    async fn test_missing_file_reports_source_unavailable() {
        let (storage, dir) = create_temp_storage(500).await;
        let store: Arc<dyn RangeStore> = Arc::new(storage);

        let err = IngestionPipeline::new(store)
            .run(&dir.path().join("absent.csv"), WriteMode::Replace)
            .await
            .unwrap_err();
        assert!(matches!(err, IpCountryError::SourceUnavailable(_)));
    }
}
