use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use uno_server::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("uno_server=debug".parse()?)
            .add_directive("uno_ai=debug".parse()?))
        .init();

    let config = ServerConfig::from_env()?;
    info!("Uno AI 服务启动中...");

    uno_server::run(config).await
}
