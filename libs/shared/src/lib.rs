pub mod config;
pub mod error;
pub mod traces;

pub use self::config::AppConfig;
pub use self::error::SharedError;
pub use self::traces::{init_logs, init_tracing};

/// 初始化环境变量
pub fn init_env() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Warning: Could not load .env file: {}", e);
    }
}
