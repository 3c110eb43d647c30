use std::env;

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::SharedError;

pub const DEFAULT_GATE_PROBABILITY: f64 = 0.5;
pub const DEFAULT_FALLBACK_MESSAGE: &str =
    "Ha ocurrido un error inesperado. Por favor, inténtelo de nuevo más tarde.";
pub const DEFAULT_CONFIG_FILE: &str = "unirepo";
const ENV_PREFIX: &str = "UNIREPO";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 短路概率 (0.0-1.0)，命中时直接返回 not available
    pub gate_probability: f64,
    /// 随机数种子，设置后结果可复现
    #[serde(default)]
    pub seed: Option<u64>,
    /// 未显式映射的错误使用的提示信息
    pub fallback_message: String,
    /// 固定数据源 (local | network | core)，不走随机选择
    #[serde(default)]
    pub pinned_source: Option<String>,
    /// 以 JSON 输出结果
    pub output_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gate_probability: DEFAULT_GATE_PROBABILITY,
            seed: None,
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            pinned_source: None,
            output_json: false,
        }
    }
}

impl AppConfig {
    /// 加载顺序：默认值 -> 配置文件 (可选) -> UNIREPO_* 环境变量
    pub fn load() -> Result<Self, SharedError> {
        let path = env::var("UNIREPO_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let settings = Self::defaults()?
            .add_source(File::with_name(&path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let cfg: AppConfig = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// 从 TOML 文本加载，未给出的字段取默认值
    pub fn from_toml_str(raw: &str) -> Result<Self, SharedError> {
        let settings = Self::defaults()?
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()?;

        let cfg: AppConfig = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), SharedError> {
        if !(0.0..=1.0).contains(&self.gate_probability) {
            return Err(SharedError::ValidationError(format!(
                "gate_probability must be within [0, 1], got {}",
                self.gate_probability
            )));
        }
        if self.fallback_message.trim().is_empty() {
            return Err(SharedError::ValidationError(
                "fallback_message cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, SharedError> {
        let builder = Config::builder()
            .set_default("gate_probability", DEFAULT_GATE_PROBABILITY)?
            .set_default("fallback_message", DEFAULT_FALLBACK_MESSAGE)?
            .set_default("output_json", false)?;
        Ok(builder)
    }
}
