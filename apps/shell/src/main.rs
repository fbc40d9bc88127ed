use callkit_logger::{LevelFilter, Logger};
use callkit_shell::cli::Cli;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let _logger = Logger::builder().name(env!("CARGO_PKG_NAME")).level(level).init()?;

    callkit_shell::run(cli).await
}
