//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use async_trait::async_trait;

use crate::api::{QueryService, ServiceError};
use crate::core::config::{CliOverrides, QueryDeskConfig, resolve_with_env};
use crate::core::state::App;

/// A query service that answers every query the same way, without network I/O.
pub enum ScriptedQueryService {
    Answer(String),
    Fail(ServiceError),
    /// Never completes; for cancellation tests.
    Hang,
}

impl ScriptedQueryService {
    pub fn answering(text: &str) -> Self {
        Self::Answer(text.to_string())
    }

    pub fn failing(error: ServiceError) -> Self {
        Self::Fail(error)
    }

    pub fn never_answering() -> Self {
        Self::Hang
    }
}

#[async_trait]
impl QueryService for ScriptedQueryService {
    async fn query(&self, _query: &str) -> Result<String, ServiceError> {
        match self {
            Self::Answer(text) => Ok(text.clone()),
            Self::Fail(error) => Err(error.clone()),
            Self::Hang => std::future::pending().await,
        }
    }

    async fn health(&self) -> Result<String, ServiceError> {
        Ok("scripted".to_string())
    }
}

/// Creates a test App from the built-in defaults, ignoring the process environment.
pub fn test_app() -> App {
    App::from_config(&resolve_with_env(
        &QueryDeskConfig::default(),
        &CliOverrides::default(),
        |_| None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_uses_built_in_base_url() {
        assert_eq!(test_app().base_url, crate::core::config::DEFAULT_BASE_URL);
    }
}
