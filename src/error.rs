use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{db::RepoError, validation::ValidationError};

/// Wire-level status codes, serialized the way Connect clients expect them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Code {
    InvalidArgument,
    Unauthenticated,
    NotFound,
    AlreadyExists,
    Internal,
}

impl Code {
    pub fn http_status(self) -> StatusCode {
        match self {
            Code::InvalidArgument => StatusCode::BAD_REQUEST,
            Code::Unauthenticated => StatusCode::UNAUTHORIZED,
            Code::NotFound => StatusCode::NOT_FOUND,
            Code::AlreadyExists => StatusCode::CONFLICT,
            Code::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: Code,
    pub message: String,
}

impl RpcError {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(Code::InvalidArgument, message)
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(Code::Unauthenticated, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Code::NotFound, message)
    }

    /// Generic failure; the cause stays in the logs.
    pub fn internal() -> Self {
        Self::new(Code::Internal, "internal error")
    }

    /// Maps a repository failure, logging anything that is not a caller error.
    pub fn from_repo(op: &'static str, entity: &'static str, e: RepoError) -> Self {
        match e {
            RepoError::NotFound => Self::not_found(format!("{entity} not found")),
            RepoError::Conflict(constraint) => {
                tracing::warn!(%op, %constraint, "write conflict");
                Self::new(Code::AlreadyExists, format!("{entity} already exists"))
            }
            RepoError::Database(e) => {
                error!(error = %e, %op, "repository call failed");
                Self::internal()
            }
        }
    }
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for RpcError {}

impl From<ValidationError> for RpcError {
    fn from(e: ValidationError) -> Self {
        Self::invalid_argument(e.to_string())
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        (self.code.http_status(), Json(self)).into_response()
    }
}
