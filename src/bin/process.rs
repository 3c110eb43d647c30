use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};

use unirepo::data::DefaultRepository;
use unirepo::service::{render, Subscription, Subscriptions};
use unirepo::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. 初始化环境变量和日志
    unirepo::init_env();
    shared::init_logs();

    // 2. 加载配置
    let cfg = AppConfig::load()?;
    info!(
        gate_probability = cfg.gate_probability,
        seed = ?cfg.seed,
        pinned_source = ?cfg.pinned_source,
        "configuration loaded"
    );

    // 3. 组装仓库并订阅一次
    let repository = Arc::new(DefaultRepository::from_config(&cfg)?);
    let mut subscriptions = Subscriptions::new();
    Subscription::spawn(repository).store_in(&mut subscriptions);

    for result in subscriptions.drain().await {
        match result {
            Ok(report) => println!("{}", render(&report, cfg.output_json)?),
            Err(e) => {
                error!("subscription failed: {}", e);
                return Err(e.into());
            }
        }
    }

    Ok(())
}
