use async_graphql::ErrorExtensions;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not a valid ObjectID: {0}")]
    InvalidId(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::InvalidId(_) => "BAD_USER_INPUT",
            ServiceError::InvalidCredentials => "UNAUTHENTICATED",
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::Conflict(_) => "CONFLICT",
            ServiceError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Logs persistence failures for `operation`; client errors pass through silently.
    pub fn logged(self, operation: &'static str) -> Self {
        if let ServiceError::Internal(detail) = &self {
            error!(operation, error = %detail, "persistence operation failed");
        }
        self
    }
}

impl ErrorExtensions for ServiceError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, ext| ext.set("code", self.code()))
    }
}
