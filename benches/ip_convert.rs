//! IP 字面量转换性能基准测试

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use ipcountry::services::ingestion::validate_range_row;
use ipcountry::utils::csv_handler::{RawRangeRow, read_range_csv_from_reader};
use ipcountry::utils::ip::ip_to_numeric;

fn bench_ip_to_numeric(c: &mut Criterion) {
    let mut group = c.benchmark_group("ip_convert/ip_to_numeric");
    group.throughput(Throughput::Elements(1));

    group.bench_function("dotted", |b| {
        b.iter(|| ip_to_numeric(std::hint::black_box("203.0.113.42")));
    });

    group.bench_function("numeric", |b| {
        b.iter(|| ip_to_numeric(std::hint::black_box("3405803818")));
    });

    group.bench_function("malformed", |b| {
        b.iter(|| ip_to_numeric(std::hint::black_box("999.999.999.999")));
    });

    group.finish();
}

fn bench_validate_row(c: &mut Criterion) {
    let row = RawRangeRow {
        line: 2,
        first_ip: "1.0.0.0".to_string(),
        last_ip: "1.0.0.255".to_string(),
        country: "AU".to_string(),
        region: Some("Oceania".to_string()),
        city: Some("Sydney".to_string()),
        latitude: Some("-33.86".to_string()),
        longitude: Some("151.20".to_string()),
        timezone: Some("Australia/Sydney".to_string()),
        ..RawRangeRow::default()
    };

    c.bench_function("ip_convert/validate_range_row", |b| {
        b.iter(|| validate_range_row(std::hint::black_box(row.clone())));
    });
}

fn bench_read_csv(c: &mut Criterion) {
    let mut data = String::from(
        "first_ip,last_ip,country,region,subregion,city,postcode,latitude,longitude,timezone\n",
    );
    for i in 0..10_000u32 {
        let first = 16_777_216 + i * 256;
        data.push_str(&format!(
            "{},{},US,Americas,Northern America,Ashburn,20147,39.04,-77.48,America/New_York\n",
            first,
            first + 255
        ));
    }

    let mut group = c.benchmark_group("ip_convert/read_csv");
    group.throughput(Throughput::Elements(10_000));
    group.sample_size(20);
    group.bench_function("modern_10k", |b| {
        b.iter(|| read_range_csv_from_reader(std::hint::black_box(data.as_bytes())));
    });
    group.finish();
}

criterion_group!(benches, bench_ip_to_numeric, bench_validate_row, bench_read_csv);
criterion_main!(benches);
