use dioxus::prelude::*;
use services::{CatalogError, CodeRunError, QuizFlowError, SessionError};

const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// Failure shown inline by a screen, always with a way back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    Message(String),
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            ViewError::Unknown => GENERIC_MESSAGE,
            ViewError::Message(message) => message,
        }
    }
}

impl From<CatalogError> for ViewError {
    fn from(err: CatalogError) -> Self {
        ViewError::Message(err.user_message())
    }
}

impl From<QuizFlowError> for ViewError {
    fn from(err: QuizFlowError) -> Self {
        ViewError::Message(err.user_message())
    }
}

impl From<CodeRunError> for ViewError {
    fn from(err: CodeRunError) -> Self {
        ViewError::Message(err.user_message())
    }
}

impl From<SessionError> for ViewError {
    fn from(err: SessionError) -> Self {
        ViewError::Message(err.user_message())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(err.clone()),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
