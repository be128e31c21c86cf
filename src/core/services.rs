//! External collaborators the dialogue calls out to: a source of writing
//! prompts and a grader for submissions.

use crate::core::curriculum::{Language, Level};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("Service call timed out after {0:?}")]
    Timeout(Duration),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected service response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait PromptSource: Send + Sync {
    async fn get_prompt(&self, language: Language, level: Level) -> Result<String, ServiceError>;
}

#[async_trait]
pub trait GradingService: Send + Sync {
    async fn grade(
        &self,
        language: Language,
        level: Level,
        prompt: &str,
        submission: &str,
    ) -> Result<String, ServiceError>;
}

/// Bounds an external call; an elapsed deadline becomes `ServiceError::Timeout`.
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ServiceError::Timeout(limit)),
    }
}
