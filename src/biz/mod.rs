mod selector;

use std::future::Future;

use crate::error::RepositoryError;

pub use selector::{PinnedSelector, RandomSelector, SourceKind, SourceSelector};

/// 聚合多个数据源，对外只暴露统一错误
pub trait Repository: Send + Sync + std::fmt::Debug {
    fn process(&self) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
