use std::sync::Arc;

use poise::serenity_prelude as serenity;
use tracing::{error, info};

use crate::command::{self, Data};
use exchanges::OpenInterestProvider;

/// Discord 연결을 소유하는 봇
/// `new`에서 framework/client를 만들고 `run`이 끝나면 연결이 정리됩니다.
pub struct Bot {
    client: serenity::Client,
}

impl Bot {
    pub async fn new(token: &str, provider: Arc<dyn OpenInterestProvider>) -> eyre::Result<Self> {
        let framework = poise::Framework::builder()
            .options(poise::FrameworkOptions {
                commands: vec![command::open_interest()],
                on_error: |error| Box::pin(command::on_error(error)),
                ..Default::default()
            })
            .setup(move |ctx, ready, framework| {
                Box::pin(async move {
                    info!("Discord 연결 완료: {}", ready.user.name);

                    // 전역 명령 등록 (이미 등록돼 있으면 덮어씀)
                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                    info!(
                        "명령 {}개 전역 등록 완료",
                        framework.options().commands.len()
                    );

                    Ok(Data { provider })
                })
            })
            .build();

        let intents = serenity::GatewayIntents::non_privileged();
        let client = serenity::ClientBuilder::new(token, intents)
            .framework(framework)
            .await?;

        Ok(Self { client })
    }

    /// gateway에 연결하고 Ctrl-C가 들어오면 모든 shard를 종료합니다.
    pub async fn run(mut self) -> eyre::Result<()> {
        let shard_manager = self.client.shard_manager.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("received Ctrl-C, shutting down");
                    shard_manager.shutdown_all().await;
                }
                Err(e) => error!("failed to listen for Ctrl-C: {:?}", e),
            }
        });

        // 일시적인 gateway 끊김은 shard runner가 재연결함.
        // start()가 에러로 끝나는 건 잘못된 토큰, 허용되지 않은 intents 같은 복구 불가 상황
        if let Err(e) = self.client.start().await {
            error!("Discord client error: {:?}", e);
            return Err(e.into());
        }

        Ok(())
    }
}
