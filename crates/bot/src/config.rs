use std::{fmt, path::PathBuf};

use thiserror::Error;

use exchanges::CoinGlassConfig;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("DISCORD_TOKEN is not set")]
    MissingToken,
}

#[derive(Clone)]
pub struct Config {
    discord_token: Option<String>,
    pub coinglass: CoinGlassConfig,
    pub log_dir: PathBuf,
}

impl Config {
    /// `.env`를 읽은 뒤 환경변수로 설정을 만듭니다.
    /// 이미 설정된 환경변수는 `.env` 값으로 덮어쓰지 않습니다.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut coinglass = CoinGlassConfig::default();
        if let Some(base_url) = var("COINGLASS_BASE_URL") {
            coinglass.base_url = base_url;
        }
        coinglass.api_key = var("COINGLASS_API_KEY");
        if let Some(interval) = var("OI_HISTORY_INTERVAL") {
            coinglass.history_interval = interval;
        }

        Self {
            discord_token: var("DISCORD_TOKEN"),
            coinglass,
            log_dir: var("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("logs")),
        }
    }

    /// 봇 실행에 필요한 토큰. 없으면 시작할 수 없음
    pub fn discord_token(&self) -> Result<&str, ConfigError> {
        self.discord_token.as_deref().ok_or(ConfigError::MissingToken)
    }
}

// token은 로그에 남기지 않음
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("discord_token", &self.discord_token.as_ref().map(|_| "<redacted>"))
            .field("coinglass_base_url", &self.coinglass.base_url)
            .field("coinglass_api_key", &self.coinglass.api_key.as_ref().map(|_| "<redacted>"))
            .field("history_interval", &self.coinglass.history_interval)
            .field("log_dir", &self.log_dir)
            .finish()
    }
}
