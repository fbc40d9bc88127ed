use anyhow::Context;
use callkit::domain::config::ApiConfig;
use callkit::kernel::config::load_config;
use callkit_logger::{LevelFilter, Logger};
use callkit_server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg: ApiConfig =
        load_config(None::<&str>).context("Critical: Configuration is malformed")?;

    let _log = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .level(cfg.logging.level.parse().unwrap_or(LevelFilter::INFO))
        .maybe_path(cfg.logging.dir.clone())
        .json(cfg.logging.json)
        .init()?;

    Server::builder().config(cfg).build()?.run().await
}
