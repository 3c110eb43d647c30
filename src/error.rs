use serde::{Deserialize, Serialize};
use shared::config::DEFAULT_FALLBACK_MESSAGE;
use shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkDataError {
    #[error("client error {code}: {message}")]
    Client { code: u16, message: String },

    #[error("unauthorized")]
    Unauthorized,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageDataError {
    #[error("storage is empty")]
    Empty,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreDataError {
    #[error("record not found")]
    NotFound,

    #[error("store is empty")]
    Empty,
}

/// 数据源错误，按来源区分
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("network: {0}")]
    Network(#[from] NetworkDataError),

    #[error("storage: {0}")]
    Storage(#[from] StorageDataError),

    #[error("core: {0}")]
    Core(#[from] CoreDataError),

    #[error("unknown: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for SourceError {
    fn from(err: anyhow::Error) -> Self {
        SourceError::Unknown(err.to_string())
    }
}

/// 对外暴露的统一错误
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RepositoryError {
    #[error("no data: {message}")]
    NoData { message: String },

    #[error("not available")]
    NotAvailable,

    #[error("not found")]
    NoFound,

    #[error("not authorized")]
    NotAuthorized,
}

impl RepositoryError {
    /// 将数据源错误映射为统一错误，没有自带信息的错误使用 `fallback_message`
    pub fn from_source(err: SourceError, fallback_message: &str) -> Self {
        match err {
            SourceError::Network(NetworkDataError::Client { code, message }) => match code {
                401 | 403 => RepositoryError::NotAuthorized,
                404 => RepositoryError::NoData { message },
                500 => RepositoryError::NotAvailable,
                _ => RepositoryError::NoFound,
            },
            SourceError::Network(NetworkDataError::Unauthorized) => RepositoryError::NoData {
                message: fallback_message.to_string(),
            },
            SourceError::Storage(StorageDataError::Empty) => RepositoryError::NoFound,
            SourceError::Core(CoreDataError::NotFound | CoreDataError::Empty) => {
                RepositoryError::NotAvailable
            }
            SourceError::Unknown(_) => RepositoryError::NotAvailable,
        }
    }
}

impl From<SourceError> for RepositoryError {
    fn from(err: SourceError) -> Self {
        RepositoryError::from_source(err, DEFAULT_FALLBACK_MESSAGE)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("subscription {0} was cancelled")]
    Cancelled(uuid::Uuid),
}

impl From<SharedError> for AppError {
    fn from(err: SharedError) -> Self {
        match err {
            SharedError::ConfigurationError(msg) | SharedError::ValidationError(msg) => {
                AppError::ConfigError(msg)
            }
            SharedError::InternalError(msg) => AppError::InternalError(msg),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(err.to_string())
    }
}
