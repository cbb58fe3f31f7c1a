#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod catalog;
pub mod code_runner;
pub mod config;
pub mod error;
pub mod quiz_flow;
pub mod session;

pub use course_core::Clock;

pub use api::{AnswerSubmission, AuthSession, CompileRequest, HttpLearningApi, LearningApi};
pub use app_services::AppServices;
pub use catalog::{CatalogService, TopicCursor};
pub use code_runner::{CodeRunnerService, EditorSession, EditorState, RunOutcome, build_srcdoc};
pub use config::ApiConfig;
pub use error::{
    ApiError, AppServicesError, CatalogError, CodeRunError, ConfigError, QuizFlowError,
    SessionError,
};
pub use quiz_flow::{QuizFlowService, QuizSession};
pub use session::{AuthAction, AuthKind, AuthState, SessionContext, TokenHandle, reduce};
