//! Remote learning API boundary.

mod http;
pub mod schema;

use async_trait::async_trait;
use serde::Serialize;

use course_core::model::{
    AnswerFeedback, CompileResult, Course, CourseId, Language, QuestionId, Quiz, QuizId, TopicId,
    User, UserProgress,
};

use crate::error::ApiError;

pub use http::HttpLearningApi;

/// One answer as sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmission {
    pub question_id: QuestionId,
    pub selected_option: usize,
    pub quiz_id: QuizId,
}

/// Bearer token and user returned by every auth call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub language: Language,
    pub source_code: String,
    pub stdin: String,
}

/// Operations offered by the learning backend.
#[async_trait]
pub trait LearningApi: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status, or decode failures.
    async fn get_all_courses(&self) -> Result<Vec<Course>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport, status, or decode failures.
    async fn get_course(&self, course_id: &CourseId) -> Result<Course, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport, status, or decode failures.
    async fn get_quiz(&self, course_id: &CourseId, topic_id: &TopicId) -> Result<Quiz, ApiError>;

    /// Submit exactly one answer. Never retried.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Domain` when the server rejects the answer on a
    /// quiz rule, and other `ApiError` variants on transport failures.
    async fn submit_quiz_answer(
        &self,
        course_id: &CourseId,
        topic_id: &TopicId,
        submission: &AnswerSubmission,
    ) -> Result<AnswerFeedback, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport, status, or decode failures.
    async fn get_user_progress(&self) -> Result<UserProgress, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport, status, or decode failures.
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport, status, or decode failures.
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport, status, or decode failures.
    async fn google_login(&self, id_token: &str) -> Result<AuthSession, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport, status, or decode failures.
    async fn compile_code(&self, request: &CompileRequest) -> Result<CompileResult, ApiError>;
}
