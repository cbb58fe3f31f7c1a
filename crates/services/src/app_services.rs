use std::sync::Arc;

use storage::{KeyValueStore, Storage};

use crate::Clock;
use crate::api::{HttpLearningApi, LearningApi};
use crate::catalog::CatalogService;
use crate::code_runner::CodeRunnerService;
use crate::config::ApiConfig;
use crate::error::AppServicesError;
use crate::quiz_flow::QuizFlowService;
use crate::session::{SessionContext, TokenHandle};

/// Assembles app-facing services around one API client and one session.
#[derive(Clone)]
pub struct AppServices {
    session: Arc<SessionContext>,
    catalog: Arc<CatalogService>,
    quiz_flow: Arc<QuizFlowService>,
    code_runner: Arc<CodeRunnerService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP API, then
    /// restore any saved session.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage, the HTTP client, or session
    /// restore fails.
    pub async fn new_sqlite(
        db_url: &str,
        config: &ApiConfig,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let token = TokenHandle::default();
        let api: Arc<dyn LearningApi> = Arc::new(HttpLearningApi::new(config, token.clone())?);
        tracing::info!(base_url = %config.base_url(), "api client ready");

        let services = Self::from_parts(storage.kv, api, token, clock);
        services.session.restore().await?;
        Ok(services)
    }

    /// Wire services from already-built parts. Does not restore the session.
    #[must_use]
    pub fn from_parts(
        store: Arc<dyn KeyValueStore>,
        api: Arc<dyn LearningApi>,
        token: TokenHandle,
        clock: Clock,
    ) -> Self {
        let session = Arc::new(SessionContext::new(store, Arc::clone(&api), token));
        let catalog = Arc::new(CatalogService::new(Arc::clone(&api)));
        let quiz_flow = Arc::new(QuizFlowService::new(Arc::clone(&api)).with_clock(clock));
        let code_runner = Arc::new(CodeRunnerService::new(api));
        Self {
            session,
            catalog,
            quiz_flow,
            code_runner,
        }
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
