use tracing::{debug, instrument};

use super::DataSource;
use crate::error::CoreDataError;

#[derive(Debug, Clone)]
pub struct CoreDataSource {
    failure: CoreDataError,
}

impl CoreDataSource {
    pub fn new() -> Self {
        Self::failing_with(CoreDataError::NotFound)
    }

    pub fn failing_with(failure: CoreDataError) -> Self {
        Self { failure }
    }
}

impl Default for CoreDataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSource for CoreDataSource {
    type Error = CoreDataError;

    #[instrument(skip(self))]
    async fn process(&self) -> Result<(), CoreDataError> {
        debug!(error = %self.failure, "core source failing");
        Err(self.failure.clone())
    }
}
