//! Shared error types for the services crate.

use reqwest::StatusCode;
use thiserror::Error;

use course_core::model::CredentialsError;
use course_core::quiz::QuizError;
use storage::StorageError;
use storage::sqlite::SqliteInitError;

/// Failures of a remote call, by taxonomy.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Network or transport failure.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response.
    #[error("request failed with status {status}")]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    /// Body was not JSON or did not match the expected schema.
    #[error("unexpected response shape: {0}")]
    Decode(String),

    /// Server rejected the request on a domain rule (e.g. already answered).
    #[error("rejected by server: {message}")]
    Domain { message: String },

    #[error("cannot build request url: {0}")]
    Url(String),
}

impl ApiError {
    /// Short text suitable for an inline error message.
    #[must_use]
    pub fn user_message(&self) -> String {
        if self.is_unauthorized() {
            return "Your session has expired. Please sign in again.".into();
        }
        match self {
            ApiError::Transport(_) => "Could not reach the server. Check your connection.".into(),
            ApiError::Status {
                message: Some(message),
                ..
            }
            | ApiError::Domain { message } => message.clone(),
            ApiError::Status { .. } | ApiError::Decode(_) | ApiError::Url(_) => {
                "The server returned an unexpected response.".into()
            }
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Errors emitted while reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid API base url {raw:?}: {reason}")]
    InvalidBaseUrl { raw: String, reason: String },
    #[error("invalid request timeout {raw:?}")]
    InvalidTimeout { raw: String },
}

/// Errors emitted by `SessionContext`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Credentials(#[from] CredentialsError),
    #[error("identity token is missing")]
    MissingIdentityToken,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("cannot serialize user: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SessionError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Credentials(err) => err.to_string(),
            SessionError::MissingIdentityToken => "Google sign-in did not return a token.".into(),
            SessionError::Api(err) => err.user_message(),
            SessionError::Storage(_) | SessionError::Serialize(_) => {
                "Could not save your session on this device.".into()
            }
        }
    }
}

/// Errors emitted by `QuizFlowService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizFlowError {
    #[error("topic has no quiz")]
    NoQuiz,
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl QuizFlowError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            QuizFlowError::NoQuiz => "This topic has no quiz.".into(),
            QuizFlowError::Quiz(err) => err.to_string(),
            QuizFlowError::Api(err) => err.user_message(),
        }
    }
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("course has no topics")]
    NoTopics,
    #[error("topic not found in course")]
    TopicNotFound,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl CatalogError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::NoTopics => "This course has no topics yet.".into(),
            CatalogError::TopicNotFound => "That topic is not part of this course.".into(),
            CatalogError::Api(err) => err.user_message(),
        }
    }
}

/// Errors emitted by `CodeRunnerService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodeRunError {
    #[error("nothing to run")]
    EmptySource,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl CodeRunError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            CodeRunError::EmptySource => "Write some code before running.".into(),
            CodeRunError::Api(err) => err.user_message(),
        }
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
}
