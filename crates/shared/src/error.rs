use std::fmt;

use thiserror::Error;

use crate::domain::UserId;

/// Remote call the dashboard was performing when a [`RemoteError`] surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchUsers,
    AddUser,
    UpdateUser,
    DeleteUser,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchUsers => f.write_str("fetch users"),
            Self::AddUser => f.write_str("add user"),
            Self::UpdateUser => f.write_str("update user"),
            Self::DeleteUser => f.write_str("delete user"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The service answered with a non-2xx status.
    #[error("{}", message.as_deref().unwrap_or("Server Error"))]
    Server {
        status: u16,
        message: Option<String>,
    },
    #[error("No response from server")]
    NoResponse,
    /// The request could not be built, or a successful body could not be read.
    #[error("{0}")]
    Request(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("{0}")]
    Validation(String),
    #[error("User with this email already exists")]
    DuplicateEmail { email: String },
    #[error("User not found")]
    NotFound { id: Option<UserId> },
    #[error("Failed to {operation}: {source}")]
    Remote {
        operation: Operation,
        #[source]
        source: RemoteError,
    },
}

impl DashboardError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn remote(operation: Operation, source: RemoteError) -> Self {
        Self::Remote { operation, source }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;
