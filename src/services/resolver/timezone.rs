//! IANA 时区 → ISO 3166-1 alpha-2 国家代码
//!
//! 只收录可唯一归属到单个国家的时区。`UTC`/`Etc/*` 等不映射。

use std::collections::HashMap;

use once_cell::sync::Lazy;

static TIMEZONE_COUNTRIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        // Africa
        ("Africa/Abidjan", "CI"),
        ("Africa/Accra", "GH"),
        ("Africa/Addis_Ababa", "ET"),
        ("Africa/Algiers", "DZ"),
        ("Africa/Cairo", "EG"),
        ("Africa/Casablanca", "MA"),
        ("Africa/Dakar", "SN"),
        ("Africa/Dar_es_Salaam", "TZ"),
        ("Africa/Johannesburg", "ZA"),
        ("Africa/Kampala", "UG"),
        ("Africa/Khartoum", "SD"),
        ("Africa/Kinshasa", "CD"),
        ("Africa/Lagos", "NG"),
        ("Africa/Luanda", "AO"),
        ("Africa/Maputo", "MZ"),
        ("Africa/Nairobi", "KE"),
        ("Africa/Tripoli", "LY"),
        ("Africa/Tunis", "TN"),
        ("Africa/Windhoek", "NA"),
        // America
        ("America/Anchorage", "US"),
        ("America/Argentina/Buenos_Aires", "AR"),
        ("America/Asuncion", "PY"),
        ("America/Bogota", "CO"),
        ("America/Caracas", "VE"),
        ("America/Chicago", "US"),
        ("America/Costa_Rica", "CR"),
        ("America/Denver", "US"),
        ("America/Edmonton", "CA"),
        ("America/El_Salvador", "SV"),
        ("America/Guatemala", "GT"),
        ("America/Guayaquil", "EC"),
        ("America/Halifax", "CA"),
        ("America/Havana", "CU"),
        ("America/Jamaica", "JM"),
        ("America/La_Paz", "BO"),
        ("America/Lima", "PE"),
        ("America/Los_Angeles", "US"),
        ("America/Managua", "NI"),
        ("America/Mexico_City", "MX"),
        ("America/Monterrey", "MX"),
        ("America/Montevideo", "UY"),
        ("America/New_York", "US"),
        ("America/Panama", "PA"),
        ("America/Phoenix", "US"),
        ("America/Puerto_Rico", "PR"),
        ("America/Regina", "CA"),
        ("America/Santiago", "CL"),
        ("America/Santo_Domingo", "DO"),
        ("America/Sao_Paulo", "BR"),
        ("America/St_Johns", "CA"),
        ("America/Tegucigalpa", "HN"),
        ("America/Tijuana", "MX"),
        ("America/Toronto", "CA"),
        ("America/Vancouver", "CA"),
        ("America/Winnipeg", "CA"),
        ("Pacific/Honolulu", "US"),
        // Asia
        ("Asia/Almaty", "KZ"),
        ("Asia/Amman", "JO"),
        ("Asia/Baghdad", "IQ"),
        ("Asia/Baku", "AZ"),
        ("Asia/Bangkok", "TH"),
        ("Asia/Beirut", "LB"),
        ("Asia/Colombo", "LK"),
        ("Asia/Damascus", "SY"),
        ("Asia/Dhaka", "BD"),
        ("Asia/Dubai", "AE"),
        ("Asia/Ho_Chi_Minh", "VN"),
        ("Asia/Hong_Kong", "HK"),
        ("Asia/Jakarta", "ID"),
        ("Asia/Jerusalem", "IL"),
        ("Asia/Kabul", "AF"),
        ("Asia/Karachi", "PK"),
        ("Asia/Kathmandu", "NP"),
        ("Asia/Kolkata", "IN"),
        ("Asia/Calcutta", "IN"),
        ("Asia/Kuala_Lumpur", "MY"),
        ("Asia/Kuwait", "KW"),
        ("Asia/Macau", "MO"),
        ("Asia/Manila", "PH"),
        ("Asia/Muscat", "OM"),
        ("Asia/Qatar", "QA"),
        ("Asia/Riyadh", "SA"),
        ("Asia/Seoul", "KR"),
        ("Asia/Shanghai", "CN"),
        ("Asia/Singapore", "SG"),
        ("Asia/Taipei", "TW"),
        ("Asia/Tashkent", "UZ"),
        ("Asia/Tbilisi", "GE"),
        ("Asia/Tehran", "IR"),
        ("Asia/Tokyo", "JP"),
        ("Asia/Ulaanbaatar", "MN"),
        ("Asia/Yangon", "MM"),
        ("Asia/Yekaterinburg", "RU"),
        ("Asia/Novosibirsk", "RU"),
        ("Asia/Vladivostok", "RU"),
        ("Asia/Yerevan", "AM"),
        // Atlantic
        ("Atlantic/Reykjavik", "IS"),
        ("Atlantic/Azores", "PT"),
        ("Atlantic/Canary", "ES"),
        // Australia / Pacific
        ("Australia/Adelaide", "AU"),
        ("Australia/Brisbane", "AU"),
        ("Australia/Darwin", "AU"),
        ("Australia/Hobart", "AU"),
        ("Australia/Melbourne", "AU"),
        ("Australia/Perth", "AU"),
        ("Australia/Sydney", "AU"),
        ("Pacific/Auckland", "NZ"),
        ("Pacific/Fiji", "FJ"),
        ("Pacific/Guam", "GU"),
        ("Pacific/Port_Moresby", "PG"),
        // Europe
        ("Europe/Amsterdam", "NL"),
        ("Europe/Athens", "GR"),
        ("Europe/Belgrade", "RS"),
        ("Europe/Berlin", "DE"),
        ("Europe/Bratislava", "SK"),
        ("Europe/Brussels", "BE"),
        ("Europe/Bucharest", "RO"),
        ("Europe/Budapest", "HU"),
        ("Europe/Chisinau", "MD"),
        ("Europe/Copenhagen", "DK"),
        ("Europe/Dublin", "IE"),
        ("Europe/Helsinki", "FI"),
        ("Europe/Istanbul", "TR"),
        ("Europe/Kiev", "UA"),
        ("Europe/Kyiv", "UA"),
        ("Europe/Lisbon", "PT"),
        ("Europe/Ljubljana", "SI"),
        ("Europe/London", "GB"),
        ("Europe/Luxembourg", "LU"),
        ("Europe/Madrid", "ES"),
        ("Europe/Minsk", "BY"),
        ("Europe/Moscow", "RU"),
        ("Europe/Oslo", "NO"),
        ("Europe/Paris", "FR"),
        ("Europe/Prague", "CZ"),
        ("Europe/Riga", "LV"),
        ("Europe/Rome", "IT"),
        ("Europe/Sofia", "BG"),
        ("Europe/Stockholm", "SE"),
        ("Europe/Tallinn", "EE"),
        ("Europe/Vienna", "AT"),
        ("Europe/Vilnius", "LT"),
        ("Europe/Warsaw", "PL"),
        ("Europe/Zagreb", "HR"),
        ("Europe/Zurich", "CH"),
    ]
    .into_iter()
    .collect()
});

/// 未映射时返回的国家值
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// 时区对应的国家代码
pub fn country_for_timezone(timezone: &str) -> Option<&'static str> {
    TIMEZONE_COUNTRIES.get(timezone.trim()).copied()
}

/// 时区对应的国家代码，未映射时为 `"Unknown"`
pub fn timezone_to_country(timezone: &str) -> &'static str {
    country_for_timezone(timezone).unwrap_or(UNKNOWN_COUNTRY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_timezones() {
        assert_eq!(timezone_to_country("America/New_York"), "US");
        assert_eq!(timezone_to_country("Europe/Berlin"), "DE");
        assert_eq!(timezone_to_country("Asia/Tokyo"), "JP");
        assert_eq!(timezone_to_country(" Australia/Sydney "), "AU");
    }

    #[test]
    fn test_unmapped_timezones() {
        assert_eq!(timezone_to_country("UTC"), UNKNOWN_COUNTRY);
        assert_eq!(timezone_to_country("Etc/GMT+3"), UNKNOWN_COUNTRY);
        assert_eq!(timezone_to_country(""), UNKNOWN_COUNTRY);
        assert_eq!(country_for_timezone("Mars/Olympus_Mons"), None);
    }

    #[test]
    fn test_codes_are_alpha2() {
        for (tz, code) in TIMEZONE_COUNTRIES.iter() {
            assert_eq!(code.len(), 2, "{}", tz);
            assert!(code.bytes().all(|b| b.is_ascii_uppercase()), "{}", tz);
        }
    }
}
