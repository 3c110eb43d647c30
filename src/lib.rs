pub mod biz;
pub mod data;
pub mod error;
pub mod service;

use error::AppError;

pub use shared::{init_env, AppConfig};

pub type Result<T> = std::result::Result<T, AppError>;
