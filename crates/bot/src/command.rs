use std::sync::Arc;

use poise::serenity_prelude as serenity;
use tracing::{error, info};

use crate::report::{self, OpenInterestReport};
use exchanges::{fetch_open_interest, OpenInterestProvider};

pub const ERROR_REPLY: &str = "Error fetching open interest data. Please try again later.";
const EMBED_COLOUR: u32 = 0xF7931A;

pub struct Data {
    pub provider: Arc<dyn OpenInterestProvider>,
}

pub type Error = eyre::Report;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Show BTC, ETH and altcoin open interest
#[poise::command(slash_command, rename = "oi")]
pub async fn open_interest(ctx: Context<'_>) -> Result<(), Error> {
    // 조회가 interaction 응답 제한시간보다 길 수 있어 먼저 defer
    ctx.defer().await?;

    let report = build_report(ctx.data().provider.as_ref()).await;
    ctx.send(poise::CreateReply::default().embed(report_embed(&report)))
        .await?;

    info!("/oi 응답 완료: {}", ctx.author().name);
    Ok(())
}

/// 조회 후 포맷. 조회 실패는 fetcher 안에서 fallback으로 처리됨
pub async fn build_report(provider: &dyn OpenInterestProvider) -> OpenInterestReport {
    let snapshot = fetch_open_interest(provider).await;
    report::format(&snapshot, provider.id())
}

pub fn report_embed(report: &OpenInterestReport) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .title(&report.title)
        .colour(EMBED_COLOUR)
        .fields(
            report
                .fields
                .iter()
                .map(|f| (f.name.clone(), f.value.clone(), f.inline)),
        )
        .footer(serenity::CreateEmbedFooter::new(&report.footer));

    if let Ok(ts) = serenity::Timestamp::from_unix_timestamp(report.timestamp.timestamp()) {
        embed = embed.timestamp(ts);
    }

    embed
}

/// 명령 처리 중 에러는 사용자에게 텍스트로 알리고 로그만 남김
pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("command `{}` failed: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(ERROR_REPLY).await {
                error!("failed to send error reply: {:?}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("error while handling framework error: {:?}", e);
            }
        }
    }
}
