use std::fmt;

use async_trait::async_trait;

use crate::core::staging::FileHandle;

/// Errors that can occur talking to the backend.
/// The UI collapses every variant into the same error response; the variant
/// only ends up in the log.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Backend answered with a non-success status.
    Status { status: u16, body: String },
    /// Body was not the expected JSON shape.
    Parse(String),
    /// The backend action has no client implementation yet.
    NotImplemented(&'static str),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Network(msg) => write!(f, "network error: {msg}"),
            ServiceError::Status { status, body } => {
                write!(f, "backend error (HTTP {status}): {body}")
            }
            ServiceError::Parse(msg) => write!(f, "parse error: {msg}"),
            ServiceError::NotImplemented(action) => write!(f, "{action} is not implemented yet"),
        }
    }
}

impl std::error::Error for ServiceError {}

/// Answers free-text queries.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Sends `query` and returns the response text unchanged.
    async fn query(&self, query: &str) -> Result<String, ServiceError>;

    /// Checks that the backend is reachable. Returns its status message.
    async fn health(&self) -> Result<String, ServiceError>;
}

/// Backend actions on staged files.
#[async_trait]
pub trait FileActions: Send + Sync {
    /// Sends the staged files to the backend.
    async fn upload(&self, files: &[FileHandle]) -> Result<(), ServiceError>;

    /// Asks the backend to categorize the user's files.
    async fn organize(&self) -> Result<(), ServiceError>;
}

/// Placeholder until the backend grows upload/organize endpoints the client can call.
pub struct UnimplementedFileActions;

#[async_trait]
impl FileActions for UnimplementedFileActions {
    async fn upload(&self, _files: &[FileHandle]) -> Result<(), ServiceError> {
        Err(ServiceError::NotImplemented("Upload Files"))
    }

    async fn organize(&self) -> Result<(), ServiceError> {
        Err(ServiceError::NotImplemented("Organize Files"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status_and_body() {
        let err = ServiceError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "backend error (HTTP 502): bad gateway");
    }

    #[test]
    fn unimplemented_actions_report_their_name() {
        let actions = UnimplementedFileActions;
        let upload = tokio_test::block_on(actions.upload(&[]));
        let organize = tokio_test::block_on(actions.organize());

        assert_eq!(upload, Err(ServiceError::NotImplemented("Upload Files")));
        assert_eq!(
            organize.unwrap_err().to_string(),
            "Organize Files is not implemented yet"
        );
    }
}
