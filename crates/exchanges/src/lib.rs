use async_trait::async_trait;
use tracing::{debug, warn};

pub use interface::{ExchangeError, OpenInterestSnapshot, ProviderId, FALLBACK_SNAPSHOT};

pub mod coinglass;

#[async_trait]
pub trait OpenInterestProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// BTC, ETH, 전체 OI를 조회해 스냅샷을 만듭니다.
    /// 하나라도 실패하면 에러를 그대로 돌려줍니다.
    async fn fetch_snapshot(&self) -> Result<OpenInterestSnapshot, ExchangeError>;
}

/// 미결제약정 스냅샷을 가져옵니다.
/// 네트워크/파싱 오류가 나면 부분 결과를 버리고 `FALLBACK_SNAPSHOT`을 반환합니다.
pub async fn fetch_open_interest(provider: &dyn OpenInterestProvider) -> OpenInterestSnapshot {
    match provider.fetch_snapshot().await {
        Ok(snapshot) => {
            debug!("open interest from {:?}: {:?}", provider.id(), snapshot);
            snapshot
        }
        Err(e) => {
            warn!(
                "open interest fetch error from {:?}: {}. 고정값으로 대체합니다",
                provider.id(),
                e
            );
            FALLBACK_SNAPSHOT
        }
    }
}

// Convenience re-exports
pub use coinglass::{CoinGlassClient, CoinGlassConfig};
