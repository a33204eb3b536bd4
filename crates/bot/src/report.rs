use std::fmt;

use chrono::{DateTime, Utc};

use interface::{OpenInterestSnapshot, ProviderId};

pub const TITLE: &str = "Crypto Open Interest";

#[derive(Debug, Clone, PartialEq)]
pub struct ReportField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// 채팅에 표시할 OI 요약
#[derive(Debug, Clone, PartialEq)]
pub struct OpenInterestReport {
    pub title: String,
    pub fields: Vec<ReportField>,
    pub footer: String,
    pub timestamp: DateTime<Utc>,
}

/// USD 금액을 단위(b/m/k)에 맞춰 표시합니다.
///
/// - `>= 1e9`: `$39.8b`
/// - `>= 1e6`: `$12.3m`
/// - `>= 1e3`: `$4.5k`
/// - 그 외: `$999.00`
///
/// 반올림은 표준 포매터를 따릅니다 (정확한 이진값 기준, 동률은 짝수 쪽).
pub fn format_usd(amount: f64) -> String {
    if amount >= 1e9 {
        format!("${:.1}b", amount / 1e9)
    } else if amount >= 1e6 {
        format!("${:.1}m", amount / 1e6)
    } else if amount >= 1e3 {
        format!("${:.1}k", amount / 1e3)
    } else {
        format!("${:.2}", amount)
    }
}

pub fn format_report(
    snapshot: &OpenInterestSnapshot,
    source: ProviderId,
    timestamp: DateTime<Utc>,
) -> OpenInterestReport {
    let field = |name: &str, amount: f64| ReportField {
        name: name.to_string(),
        value: format_usd(amount),
        inline: true,
    };

    OpenInterestReport {
        title: TITLE.to_string(),
        fields: vec![
            field("BTC OI", snapshot.btc),
            field("ETH OI", snapshot.eth),
            field("Alt OI", snapshot.alt),
        ],
        footer: format!(
            "Total OI: {} | Data: {}",
            format_usd(snapshot.total),
            source.attribution()
        ),
        timestamp,
    }
}

/// 현재 시각으로 리포트를 만듭니다.
pub fn format(snapshot: &OpenInterestSnapshot, source: ProviderId) -> OpenInterestReport {
    format_report(snapshot, source, Utc::now())
}

impl fmt::Display for OpenInterestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for field in &self.fields {
            writeln!(f, "{}: {}", field.name, field.value)?;
        }
        writeln!(f, "{}", self.footer)?;
        write!(f, "{}", self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use interface::FALLBACK_SNAPSHOT;

    #[test]
    fn test_format_usd_unit_boundaries() {
        assert_eq!(format_usd(999.0), "$999.00");
        assert_eq!(format_usd(1_000.0), "$1.0k");
        assert_eq!(format_usd(999_999.0), "$1000.0k");
        assert_eq!(format_usd(1_000_000.0), "$1.0m");
        assert_eq!(format_usd(999_999_999.0), "$1000.0m");
        assert_eq!(format_usd(1_000_000_000.0), "$1.0b");
    }

    #[test]
    fn test_format_usd_small_amounts() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(12.5), "$12.50");
        assert_eq!(format_usd(1.5e12), "$1500.0b");
    }

    #[test]
    fn test_format_usd_ties_round_to_even() {
        // 0.125, 0.625, 1.25e9는 이진수로 정확히 표현되는 동률 값
        assert_eq!(format_usd(0.125), "$0.12");
        assert_eq!(format_usd(0.625), "$0.62");
        assert_eq!(format_usd(0.375), "$0.38");
        assert_eq!(format_usd(1.25e9), "$1.2b");
    }

    #[test]
    fn test_format_stamps_current_time() {
        let before = Utc::now();
        let report = format(&FALLBACK_SNAPSHOT, ProviderId::CoinGlass);
        let after = Utc::now();

        assert!(report.timestamp >= before && report.timestamp <= after);
        assert_eq!(
            report,
            format_report(&FALLBACK_SNAPSHOT, ProviderId::CoinGlass, report.timestamp)
        );
    }

    #[test]
    fn test_format_report_fixture() {
        let snapshot = OpenInterestSnapshot::from_totals(39.8e9, 25.5e9, 95.5e9);
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let report = format_report(&snapshot, ProviderId::CoinGlass, ts);

        assert_eq!(report.title, TITLE);
        let values: Vec<&str> = report.fields.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, vec!["$39.8b", "$25.5b", "$30.2b"]);
        let names: Vec<&str> = report.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["BTC OI", "ETH OI", "Alt OI"]);
        assert!(report.fields.iter().all(|f| f.inline));
        assert_eq!(report.footer, "Total OI: $95.5b | Data: CoinGlass");
        assert_eq!(report.timestamp, ts);
    }

    #[test]
    fn test_fallback_report_matches_fixture() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let live = format_report(
            &OpenInterestSnapshot::from_totals(39.8e9, 25.5e9, 95.5e9),
            ProviderId::CoinGlass,
            ts,
        );
        let fallback = format_report(&FALLBACK_SNAPSHOT, ProviderId::CoinGlass, ts);
        assert_eq!(live, fallback);
    }

    #[test]
    fn test_report_display() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let report = format_report(&FALLBACK_SNAPSHOT, ProviderId::CoinGlass, ts);

        assert_eq!(
            report.to_string(),
            "Crypto Open Interest\n\
             BTC OI: $39.8b\n\
             ETH OI: $25.5b\n\
             Alt OI: $30.2b\n\
             Total OI: $95.5b | Data: CoinGlass\n\
             2024-03-01 12:00:00 UTC"
        );
    }
}
