use std::sync::Arc;

use color_eyre::eyre;
use structopt::StructOpt;
use tracing::info;

use exchanges::{CoinGlassClient, OpenInterestProvider};
use oi_bot::{command, logger, Bot, Config};

#[derive(Debug, StructOpt)]
#[structopt(name = "oi-bot", about = "BTC/ETH/알트 미결제약정 Discord 봇")]
struct Opt {
    #[structopt(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Discord 봇 실행 (기본값)
    Run,
    /// 한 번 조회해서 리포트를 stdout에 출력
    Snapshot,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // init error reporting
    color_eyre::install()?;

    let opt = Opt::from_args();
    let config = Config::from_env();

    // init logging
    let _guards = logger::init_tracing(&config.log_dir)?;

    let provider: Arc<dyn OpenInterestProvider> =
        Arc::new(CoinGlassClient::with_config(config.coinglass.clone()));

    match opt.command.unwrap_or(Command::Run) {
        Command::Run => run_bot(&config, provider).await,
        Command::Snapshot => print_snapshot(provider).await,
    }
}

async fn run_bot(config: &Config, provider: Arc<dyn OpenInterestProvider>) -> eyre::Result<()> {
    // 토큰이 없으면 시작하지 않음
    let token = config.discord_token()?;

    info!("봇 시작 중... {:?}", config);

    let bot = Bot::new(token, provider).await?;
    bot.run().await
}

async fn print_snapshot(provider: Arc<dyn OpenInterestProvider>) -> eyre::Result<()> {
    let report = command::build_report(provider.as_ref()).await;
    println!("{report}");
    Ok(())
}
