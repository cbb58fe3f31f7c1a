mod auth;
mod catalog;
mod code_editor;
mod course;
mod login;
mod quiz;
mod state;

#[cfg(test)]
pub(crate) mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use auth::use_auth_state;
pub use catalog::CatalogView;
pub use code_editor::EditorView;
pub use course::{CourseView, TopicView};
pub use login::LoginView;
pub use quiz::QuizView;
pub use state::{ViewError, ViewState, view_state_from_resource};
