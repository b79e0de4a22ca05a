use chrono::{DateTime, Local};
use serde::Serialize;

use crate::fetch_error::FetchError;

/// Outcome of a single fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchResult {
    Success { price: String },
    Failure { reason: String },
}

impl FetchResult {
    pub fn success(price: impl Into<String>) -> Self {
        FetchResult::Success {
            price: price.into(),
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        FetchResult::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }

    pub fn price(&self) -> Option<&str> {
        match self {
            FetchResult::Success { price } => Some(price),
            FetchResult::Failure { .. } => None,
        }
    }
}

impl From<Result<String, FetchError>> for FetchResult {
    fn from(result: Result<String, FetchError>) -> Self {
        match result {
            Ok(price) => FetchResult::Success { price },
            Err(e) => FetchResult::Failure {
                reason: e.to_string(),
            },
        }
    }
}

/// What started a fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Startup,
    Timer,
    Manual,
}

/// A completed fetch attempt, as handed to the display controller.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshEvent {
    pub result: FetchResult,
    /// Wall-clock completion time of the attempt.
    pub timestamp: DateTime<Local>,
    pub trigger: Trigger,
    /// Assigned when the attempt was triggered; strictly increasing per scheduler.
    pub generation: u64,
}

impl RefreshEvent {
    pub fn new(result: FetchResult, trigger: Trigger, generation: u64) -> Self {
        Self {
            result,
            timestamp: Local::now(),
            trigger,
            generation,
        }
    }
}

/// Commands raised by the display collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Refresh,
    Quit,
}
