use tracing::{debug, instrument};

use super::DataSource;
use crate::error::NetworkDataError;

#[derive(Debug, Clone)]
pub struct NetworkDataSource {
    failure: NetworkDataError,
}

impl NetworkDataSource {
    pub fn new() -> Self {
        Self::failing_with(NetworkDataError::Client {
            code: 404,
            message: "not found".to_string(),
        })
    }

    pub fn failing_with(failure: NetworkDataError) -> Self {
        Self { failure }
    }
}

impl Default for NetworkDataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSource for NetworkDataSource {
    type Error = NetworkDataError;

    #[instrument(skip(self))]
    async fn process(&self) -> Result<(), NetworkDataError> {
        debug!(error = %self.failure, "network source failing");
        Err(self.failure.clone())
    }
}
