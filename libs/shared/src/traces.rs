use std::env;
use std::sync::Once;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{
    filter::EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Registry,
};

static INIT: Once = Once::new();

/// Tracing 配置结构
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// 服务名称
    pub service_name: String,
    /// 服务环境 (dev, staging, prod)
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 是否启用控制台输出
    pub console_output: bool,
    /// 是否启用JSON格式
    pub json_format: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "unirepo".to_string()),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            console_output: env::var("CONSOLE_OUTPUT")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            json_format: env::var("JSON_FORMAT")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        }
    }
}

/// 统一的 tracing 初始化入口
pub fn init_tracing() -> Result<()> {
    init_tracing_with_config(TracingConfig::default())
}

/// 使用自定义配置初始化 tracing
pub fn init_tracing_with_config(config: TracingConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?;
    let registry = Registry::default().with(env_filter);

    // 日志写到 stderr，stdout 只留给结果输出
    if config.console_output {
        if config.json_format {
            let fmt_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_span_events(FmtSpan::CLOSE)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_target(false)
                .with_level(true)
                .with_thread_ids(true);

            registry.with(fmt_layer).try_init()?;
        } else {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_target(false)
                .with_level(true);

            registry.with(fmt_layer).try_init()?;
        }
    } else {
        registry.try_init()?;
    }

    info!(
        service_name = %config.service_name,
        environment = %config.environment,
        log_level = %config.log_level,
        "Tracing initialized successfully"
    );

    Ok(())
}

/// 只初始化一次，测试里可以重复调用
pub fn init_logs() {
    INIT.call_once(|| {
        if let Err(e) = init_tracing() {
            error!("Failed to initialize tracing: {}", e);
        }
    });
}
