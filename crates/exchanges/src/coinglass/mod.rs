use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::ExchangeError;

pub mod open_interest;

pub const BASE_URL: &str = "https://open-api.coinglass.com";
pub const API_KEY_HEADER: &str = "CG-API-KEY";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct CoinGlassConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub btc_symbol: String,
    pub eth_symbol: String,
    /// 전체 OI 시계열 조회 간격 (예: "4h")
    pub history_interval: String,
    pub timeout: Duration,
}

impl Default for CoinGlassConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            api_key: None,
            btc_symbol: "BTCUSDT".to_string(),
            eth_symbol: "ETHUSDT".to_string(),
            history_interval: "4h".to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

#[derive(Clone)]
pub struct CoinGlassClient {
    pub(crate) http: reqwest::Client,
    pub(crate) config: CoinGlassConfig,
}

impl CoinGlassClient {
    pub fn new() -> Self {
        Self::with_config(CoinGlassConfig::default())
    }

    pub fn with_config(config: CoinGlassConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &CoinGlassConfig {
        &self.config
    }

    /// GET 요청 후 CoinGlass 응답 envelope을 벗겨 `data`를 돌려줍니다.
    /// 요청마다 `config.timeout`이 적용됩니다.
    pub(crate) async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, ExchangeError> {
        let url = format!("{}{path}", self.config.base_url.trim_end_matches('/'));
        let mut request = self.http.get(url).query(query);
        if let Some(key) = &self.config.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let send = async {
            let response = request.send().await?.error_for_status()?;
            response.json::<CoinGlassResponse<T>>().await
        };

        let response = match tokio::time::timeout(self.config.timeout, send).await {
            Ok(result) => result?,
            Err(_) => return Err(ExchangeError::Timeout(self.config.timeout.as_millis())),
        };

        if !response.is_success() {
            return Err(ExchangeError::Api {
                code: match response.code {
                    Some(Value::String(code)) => code,
                    Some(code) => code.to_string(),
                    None => String::new(),
                },
                msg: response.msg.unwrap_or_default(),
            });
        }

        Ok(response.data)
    }
}

impl Default for CoinGlassClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CoinGlassResponse<T> {
    code: Option<Value>,
    msg: Option<String>,
    data: Option<T>,
}

impl<T> CoinGlassResponse<T> {
    /// code가 없으면 성공으로 봅니다. "0" 또는 0 이외는 API 에러
    fn is_success(&self) -> bool {
        match &self.code {
            None | Some(Value::Null) => true,
            Some(Value::String(code)) => code == "0",
            Some(Value::Number(code)) => code.as_i64() == Some(0),
            Some(_) => false,
        }
    }
}

/// 숫자 또는 숫자 문자열을 f64로 읽습니다.
/// 없거나, 숫자가 아니거나, 음수/NaN이면 0.0
pub(crate) fn lenient_f64(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_lenient_f64() {
        assert_eq!(lenient_f64(Some(&json!(39.8e9))), 39.8e9);
        assert_eq!(lenient_f64(Some(&json!("25500000000"))), 25.5e9);
        assert_eq!(lenient_f64(Some(&json!(" 12.5 "))), 12.5);
        assert_eq!(lenient_f64(Some(&json!("n/a"))), 0.0);
        assert_eq!(lenient_f64(Some(&json!(null))), 0.0);
        assert_eq!(lenient_f64(Some(&json!({ "usd": 1 }))), 0.0);
        assert_eq!(lenient_f64(Some(&json!(-3))), 0.0);
        assert_eq!(lenient_f64(None), 0.0);
    }

    #[test]
    fn test_response_code() {
        let ok: CoinGlassResponse<Value> =
            serde_json::from_value(json!({ "code": "0", "data": 1 })).unwrap();
        assert!(ok.is_success());

        let numeric: CoinGlassResponse<Value> =
            serde_json::from_value(json!({ "code": 0 })).unwrap();
        assert!(numeric.is_success());
        assert!(numeric.data.is_none());

        let missing: CoinGlassResponse<Value> = serde_json::from_value(json!({})).unwrap();
        assert!(missing.is_success());

        let err: CoinGlassResponse<Value> =
            serde_json::from_value(json!({ "code": "50001", "msg": "rate limit" })).unwrap();
        assert!(!err.is_success());
    }

    #[test]
    fn test_default_config() {
        let client = CoinGlassClient::new();
        assert_eq!(client.config().base_url, BASE_URL);
        assert_eq!(client.config().timeout, Duration::from_secs(10));
        assert_eq!(client.config().btc_symbol, "BTCUSDT");
        assert_eq!(client.config().eth_symbol, "ETHUSDT");
        assert!(client.config().api_key.is_none());
    }
}
