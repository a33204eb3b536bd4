use std::{fs::OpenOptions, io, path::Path};

use chrono::Local;
use tracing_appender::non_blocking;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Tracing guards를 보관하는 구조체
/// 이 구조체가 drop되기 전까지 로깅이 계속 작동합니다
pub struct TracingGuards {
    _file: WorkerGuard,
    _stdout: WorkerGuard,
}

/// Tracing 초기화
/// 파일 로깅과 stdout 로깅을 모두 설정합니다
pub fn init_tracing(log_dir: &Path) -> io::Result<TracingGuards> {
    // 1) 파일 appender
    let (file_writer, file_guard) = daily_file_appender(log_dir, "oi-bot")?;

    // 2) stdout도 non-blocking
    let (stdout_writer, stdout_guard) = non_blocking(io::stdout());

    // 3) EnvFilter, RUST_LOG가 없으면 info
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // 파일 로깅: INFO 레벨 이상만 기록
    let file_filter = EnvFilter::new("info");

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer)
                .with_filter(file_filter),
        )
        .with(fmt::layer().with_writer(stdout_writer).with_ansi(true))
        .init();

    Ok(TracingGuards {
        _file: file_guard,
        _stdout: stdout_guard,
    })
}

/// `logs/oi-bot.2025-11-29.log` 형식의 파일 이름
fn log_file_name(prefix: &str) -> String {
    let date = Local::now().format("%Y-%m-%d").to_string();
    format!("{prefix}.{date}.log")
}

/// 날짜별 로그 파일 생성
fn daily_file_appender(log_dir: &Path, prefix: &str) -> io::Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(log_dir)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(log_file_name(prefix)))?;

    Ok(non_blocking(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name() {
        let name = log_file_name("oi-bot");
        assert!(name.starts_with("oi-bot."));
        assert!(name.ends_with(".log"));
        // oi-bot.YYYY-MM-DD.log
        assert_eq!(name.len(), "oi-bot.".len() + 10 + ".log".len());
    }

    #[test]
    fn test_daily_file_appender_creates_dir() {
        let dir = std::env::temp_dir().join(format!("oi-bot-logs-{}", std::process::id()));
        let (_writer, _guard) = daily_file_appender(&dir, "test").unwrap();
        assert!(dir.join(log_file_name("test")).exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
