mod core_source;
mod local;
mod network;
mod repository;

use std::future::Future;

use crate::error::SourceError;

pub use core_source::CoreDataSource;
pub use local::LocalDataSource;
pub use network::NetworkDataSource;
pub use repository::{DefaultRepository, RepositoryImpl};

/// 单次异步结果的数据源
pub trait DataSource: Send + Sync + std::fmt::Debug {
    type Error: Into<SourceError> + Send;

    fn process(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
