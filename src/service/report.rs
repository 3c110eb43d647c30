use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AppError, RepositoryError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Finished,
    Failed { error: RepositoryError },
}

impl From<Result<(), RepositoryError>> for Outcome {
    fn from(result: Result<(), RepositoryError>) -> Self {
        match result {
            Ok(()) => Outcome::Finished,
            Err(error) => Outcome::Failed { error },
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Finished => f.write_str("finished"),
            Outcome::Failed { error } => write!(f, "{}", error),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub subscription_id: Uuid,
    pub outcome: Outcome,
    pub completed_at: DateTime<Utc>,
}

impl Report {
    pub fn new(subscription_id: Uuid, outcome: Outcome) -> Self {
        Self {
            subscription_id,
            outcome,
            completed_at: Utc::now(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }
}

/// 渲染一行控制台输出，并按结果记日志
pub fn render(report: &Report, json: bool) -> Result<String, AppError> {
    if report.is_failure() {
        warn!(subscription_id = %report.subscription_id, outcome = %report.outcome, "process failed");
    } else {
        info!(subscription_id = %report.subscription_id, "process finished");
    }

    if json {
        serde_json::to_string(report).map_err(|e| AppError::InternalError(e.to_string()))
    } else {
        Ok(report.outcome.to_string())
    }
}
