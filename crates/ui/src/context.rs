use std::sync::Arc;

use services::{CatalogService, CodeRunnerService, QuizFlowService, SessionContext};

pub trait UiApp: Send + Sync {
    fn app_name(&self) -> &str;

    fn session(&self) -> Arc<SessionContext>;
    fn catalog(&self) -> Arc<CatalogService>;
    fn quiz_flow(&self) -> Arc<QuizFlowService>;
    fn code_runner(&self) -> Arc<CodeRunnerService>;
}

#[derive(Clone)]
pub struct AppContext {
    app_name: String,

    session: Arc<SessionContext>,
    catalog: Arc<CatalogService>,
    quiz_flow: Arc<QuizFlowService>,
    code_runner: Arc<CodeRunnerService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            app_name: app.app_name().to_owned(),
            session: app.session(),
            catalog: app.catalog(),
            quiz_flow: app.quiz_flow(),
            code_runner: app.code_runner(),
        }
    }

    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    #[must_use]
    pub fn session(&self) -> Arc<SessionContext> {
        Arc::clone(&self.session)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn quiz_flow(&self) -> Arc<QuizFlowService> {
        Arc::clone(&self.quiz_flow)
    }

    #[must_use]
    pub fn code_runner(&self) -> Arc<CodeRunnerService> {
        Arc::clone(&self.code_runner)
    }
}

// Provided by the composition root in `crates/app`.

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
