use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{lenient_f64, CoinGlassClient};
use crate::{ExchangeError, OpenInterestProvider};
use interface::{OpenInterestSnapshot, ProviderId};

pub const OPEN_INTEREST_PATH: &str = "/public/v2/open_interest";
pub const OPEN_INTEREST_HISTORY_PATH: &str = "/public/v2/open_interest_history";

#[derive(Debug, Deserialize)]
struct SymbolOpenInterest {
    #[serde(rename = "openInterest")]
    open_interest: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenInterestPoint {
    /// 샘플 시각 (ms), 숫자 또는 숫자 문자열
    t: Option<Value>,
    #[serde(rename = "openInterest")]
    open_interest: Option<Value>,
}

impl OpenInterestPoint {
    /// 읽을 수 없는 timestamp는 None
    fn timestamp(&self) -> Option<f64> {
        let parsed = match &self.t {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|t| t.is_finite())
    }
}

/// 가장 최근 샘플을 고릅니다.
/// 모든 항목에 timestamp가 있으면 가장 큰 것, 아니면 마지막 항목
pub(crate) fn latest_point(points: &[OpenInterestPoint]) -> Option<&OpenInterestPoint> {
    let timestamps: Option<Vec<f64>> = points.iter().map(|p| p.timestamp()).collect();

    match timestamps {
        // max_by는 같은 값이면 뒤쪽 항목을 돌려줌
        Some(timestamps) => points
            .iter()
            .zip(timestamps)
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(p, _)| p),
        None => points.last(),
    }
}

impl CoinGlassClient {
    /// 심볼(예: BTCUSDT)의 미결제약정 (USD)
    pub async fn fetch_symbol_open_interest(&self, symbol: &str) -> Result<f64, ExchangeError> {
        let data: Option<SymbolOpenInterest> = self
            .get_data(OPEN_INTEREST_PATH, &[("symbol", symbol)])
            .await?;

        let oi = lenient_f64(data.as_ref().and_then(|d| d.open_interest.as_ref()));
        debug!("CoinGlass {} open interest: {}", symbol, oi);
        Ok(oi)
    }

    /// 시장 전체 미결제약정 시계열에서 가장 최근 값 (USD)
    pub async fn fetch_total_open_interest(&self) -> Result<f64, ExchangeError> {
        let points: Option<Vec<OpenInterestPoint>> = self
            .get_data(
                OPEN_INTEREST_HISTORY_PATH,
                &[("interval", self.config.history_interval.as_str())],
            )
            .await?;
        let points = points.unwrap_or_default();

        let oi = lenient_f64(
            latest_point(&points).and_then(|p| p.open_interest.as_ref()),
        );
        debug!(
            "CoinGlass total open interest: {} ({} samples)",
            oi,
            points.len()
        );
        Ok(oi)
    }
}

#[async_trait]
impl OpenInterestProvider for CoinGlassClient {
    fn id(&self) -> ProviderId {
        ProviderId::CoinGlass
    }

    async fn fetch_snapshot(&self) -> Result<OpenInterestSnapshot, ExchangeError> {
        // 세 요청은 서로 독립적이라 동시에 보냄
        let (btc, eth, total) = tokio::try_join!(
            self.fetch_symbol_open_interest(&self.config.btc_symbol),
            self.fetch_symbol_open_interest(&self.config.eth_symbol),
            self.fetch_total_open_interest(),
        )?;

        Ok(OpenInterestSnapshot::from_totals(btc, eth, total))
    }
}
