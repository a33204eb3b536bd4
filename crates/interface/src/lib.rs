use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    CoinGlass,
}

impl ProviderId {
    /// 리포트 footer에 들어가는 데이터 출처 표기
    pub fn attribution(&self) -> &'static str {
        match self {
            ProviderId::CoinGlass => "CoinGlass",
        }
    }
}

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request timed out after {0}ms")]
    Timeout(u128),
    #[error("api error: {code} - {msg}")]
    Api { code: String, msg: String },
    #[error("other error: {0}")]
    Other(String),
}

/// 한 번의 조회 결과 (USD 기준 미결제약정)
///
/// 생성 이후 변경되지 않으며, 명령 호출마다 새로 만들어집니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpenInterestSnapshot {
    pub btc: f64,
    pub eth: f64,
    pub alt: f64, // max(0, total - btc - eth)
    pub total: f64,
}

/// 데이터 조회 실패 시 사용하는 고정값
pub const FALLBACK_SNAPSHOT: OpenInterestSnapshot = OpenInterestSnapshot {
    btc: 39.8e9,
    eth: 25.5e9,
    alt: 30.2e9,
    total: 95.5e9,
};

impl OpenInterestSnapshot {
    /// BTC, ETH, 전체 OI로부터 alt OI를 계산해 스냅샷을 만듭니다.
    /// 음수나 NaN 입력은 0으로 취급합니다.
    pub fn from_totals(btc: f64, eth: f64, total: f64) -> Self {
        let btc = non_negative(btc);
        let eth = non_negative(eth);
        let total = non_negative(total);

        Self {
            btc,
            eth,
            alt: (total - btc - eth).max(0.0),
            total,
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
