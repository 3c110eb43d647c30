use tracing::{debug, instrument};

use super::DataSource;
use crate::error::StorageDataError;

/// 本地存储数据源
#[derive(Debug, Clone, Default)]
pub struct LocalDataSource {}

impl LocalDataSource {
    pub fn new() -> Self {
        Self {}
    }
}

impl DataSource for LocalDataSource {
    type Error = StorageDataError;

    #[instrument(skip(self))]
    async fn process(&self) -> Result<(), StorageDataError> {
        debug!("local storage is empty");
        Err(StorageDataError::Empty)
    }
}
